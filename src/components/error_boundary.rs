//! App Error Boundary
//!
//! Catches errors rendered anywhere below it and shows a recovery page
//! instead of a blank screen.

use leptos::prelude::*;

use crate::route::{use_navigator, Route};

fn error_messages(errors: &ArcRwSignal<Errors>) -> Vec<String> {
    errors.get().into_iter().map(|(_, e)| e.to_string()).collect()
}

#[component]
pub fn AppErrorBoundary(children: Children) -> impl IntoView {
    let navigator = use_navigator();

    view! {
        <ErrorBoundary fallback=move |errors| {
            tracing::error!("[APP] render error: {:?}", error_messages(&errors));

            let retry_errors = errors.clone();
            let home_errors = errors.clone();

            view! {
                <div class="error-page">
                    <h1>"Something went wrong"</h1>
                    <p>"This page ran into a problem. You can try again or head back to the dashboard."</p>
                    <div class="error-page-actions">
                        <button
                            type="button"
                            class="btn btn-primary"
                            on:click=move |_| retry_errors.set(Errors::default())
                        >
                            "Try again"
                        </button>
                        <button
                            type="button"
                            class="btn btn-secondary"
                            on:click=move |_| {
                                home_errors.set(Errors::default());
                                navigator.navigate(Route::Dashboard);
                            }
                        >
                            "Go home"
                        </button>
                        <button
                            type="button"
                            class="btn btn-link"
                            on:click=move |_| {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                        >
                            "Reload"
                        </button>
                    </div>
                    {cfg!(debug_assertions).then(move || view! {
                        <details class="error-details">
                            <summary>"Details"</summary>
                            <ul>
                                {move || {
                                    error_messages(&errors)
                                        .into_iter()
                                        .map(|m| view! { <li><code>{m}</code></li> })
                                        .collect_view()
                                }}
                            </ul>
                        </details>
                    })}
                </div>
            }
        }>
            {children()}
        </ErrorBoundary>
    }
}
