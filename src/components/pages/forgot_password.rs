//! Forgot Password Page

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::NavLink;
use crate::context::use_app_context;
use crate::models::looks_like_email;
use crate::route::Route;
use crate::services::auth;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let ctx = use_app_context();
    let (email, set_email) = signal(ctx.api().session().remembered_email().unwrap_or_default());
    let (sending, set_sending) = signal(false);
    let (sent, set_sent) = signal::<Option<String>>(None);
    let (error, set_error) = signal::<Option<String>>(None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let address = email.get_untracked();
        if !looks_like_email(&address) {
            set_error.set(Some("Enter a valid email address".to_string()));
            return;
        }
        set_error.set(None);
        set_sending.set(true);
        let api = ctx.api();
        spawn_local(async move {
            match auth::forgot_password(&api, &address).await {
                Ok(message) => {
                    set_sent.try_set(Some(message));
                }
                Err(e) => {
                    set_error.try_set(Some(e.message));
                }
            }
            set_sending.try_set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Reset password"</h1>
                {move || match sent.get() {
                    Some(message) => view! { <p class="auth-notice">{message}</p> }.into_any(),
                    None => view! {
                        <p>"We'll email you a link to choose a new password."</p>
                        <label class="form-field">
                            <span class="field-label">"Email"</span>
                            <input
                                type="email"
                                prop:value=move || email.get()
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                            />
                        </label>
                        {move || error.get().map(|e| view! { <p class="field-error">{e}</p> })}
                        <button type="submit" class="btn btn-primary" disabled=move || sending.get()>
                            {move || if sending.get() { "Sending…" } else { "Send reset link" }}
                        </button>
                    }
                    .into_any(),
                }}
                <NavLink route=Route::Login class="auth-link">"Back to sign in"</NavLink>
            </form>
        </div>
    }
}
