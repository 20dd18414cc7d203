//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::ApiError;

use crate::components::{ErrorDialog, NavLink};
use crate::context::use_app_context;
use crate::models::LoginForm;
use crate::route::{use_navigator, Route};
use crate::services::auth;
use crate::store::{store_sign_in, use_app_store};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let navigator = use_navigator();

    let remembered = ctx.api().session().remembered_email();
    let form = RwSignal::new(LoginForm {
        remember: remembered.is_some(),
        email: remembered.unwrap_or_default(),
        ..LoginForm::default()
    });
    let (submitting, set_submitting) = signal(false);
    let (error, set_error) = signal::<Option<ApiError>>(None);
    let (missing, set_missing) = signal(false);

    let submit = move || {
        let current = form.get_untracked();
        if current.email.trim().is_empty() || current.password.is_empty() {
            set_missing.set(true);
            return;
        }
        set_missing.set(false);
        set_submitting.set(true);
        let api = ctx.api();
        spawn_local(async move {
            match auth::login(&api, &current).await {
                Ok(user) => {
                    store_sign_in(&store, user);
                    navigator.replace(Route::Dashboard);
                }
                Err(e) => {
                    tracing::warn!("[AUTH] login failed: {}", e);
                    form.try_update(|f| f.password.clear());
                    set_error.try_set(Some(e));
                }
            }
            set_submitting.try_set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form
                class="auth-card"
                on:submit=move |ev| {
                    ev.prevent_default();
                    submit();
                }
            >
                <h1>"Sign in"</h1>
                <label class="form-field">
                    <span class="field-label">"Email"</span>
                    <input
                        type="email"
                        autocomplete="username"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                </label>
                <label class="form-field">
                    <span class="field-label">"Password"</span>
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                </label>
                <label class="checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || form.with(|f| f.remember)
                        on:change=move |ev| form.update(|f| f.remember = event_target_checked(&ev))
                    />
                    "Remember me"
                </label>
                <Show when=move || missing.get()>
                    <p class="field-error">"Enter your email and password"</p>
                </Show>
                <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in…" } else { "Sign in" }}
                </button>
                <NavLink route=Route::ForgotPassword class="auth-link">"Forgot your password?"</NavLink>
            </form>
            <ErrorDialog error=error on_close=move |_| set_error.set(None) on_retry=Callback::new(move |_| submit()) />
        </div>
    }
}
