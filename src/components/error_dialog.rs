//! Error Dialog Component
//!
//! Modal for a failed request. Title, icon and wording come from the error
//! catalog; buttons come from the caller or from the defaults for the error
//! type.

use leptos::prelude::*;
use rest_resource::ApiError;

use crate::error_catalog::{default_actions, error_config, ActionKind, ErrorAction};
use crate::route::{use_navigator, Route};

#[component]
pub fn ErrorDialog(
    /// `None` hides the dialog
    #[prop(into)]
    error: Signal<Option<ApiError>>,
    #[prop(into)] on_close: Callback<()>,
    /// Called for `Retry`; without it Retry closes the dialog
    #[prop(optional, into)]
    on_retry: Option<Callback<()>>,
    /// Replaces the default buttons
    #[prop(optional)]
    actions: Option<Vec<ErrorAction>>,
) -> impl IntoView {
    let navigator = use_navigator();
    let actions = StoredValue::new(actions);

    let run = move |kind: ActionKind| match kind {
        ActionKind::Close => on_close.run(()),
        ActionKind::Retry => {
            on_close.run(());
            if let Some(retry) = on_retry {
                retry.run(());
            }
        }
        ActionKind::Refresh => {
            if let Some(window) = web_sys::window() {
                let _ = window.location().reload();
            }
        }
        ActionKind::SignIn => {
            on_close.run(());
            navigator.navigate(Route::Login);
        }
        ActionKind::ResetPassword => {
            on_close.run(());
            navigator.navigate(Route::ForgotPassword);
        }
    };

    move || {
        error.get().map(|err| {
            let config = error_config(&err.code);
            let buttons = actions
                .get_value()
                .unwrap_or_else(|| default_actions(config.error_type));
            let fields = err.field_errors();

            view! {
                <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                    <div
                        class=format!("modal error-dialog error-{}", config.color)
                        role="alertdialog"
                        on:click=|ev| ev.stop_propagation()
                    >
                        <div class="error-dialog-header">
                            <span class="error-icon">{config.icon}</span>
                            <h2>{config.title}</h2>
                        </div>
                        <p class="error-message">{err.message.clone()}</p>
                        <p class="error-description">{config.description}</p>
                        {(!fields.is_empty()).then(|| view! {
                            <ul class="error-fields">
                                {fields
                                    .into_iter()
                                    .map(|(field, messages)| view! {
                                        <li><strong>{field}</strong>": " {messages.join(", ")}</li>
                                    })
                                    .collect_view()}
                            </ul>
                        })}
                        <div class="modal-actions">
                            {buttons
                                .into_iter()
                                .map(|action| {
                                    let kind = action.kind;
                                    let class = if action.primary { "btn btn-primary" } else { "btn btn-secondary" };
                                    view! {
                                        <button type="button" class=class on:click=move |_| run(kind)>
                                            {action.label}
                                        </button>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>
                </div>
            }
        })
    }
}
