//! Toast Host Component

use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_app_context().toasts;

    view! {
        <div class="toast-host" role="status" aria-live="polite">
            <For
                each=move || toasts.items().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    view! {
                        <div class=toast.level.class()>
                            <span class="toast-message">{toast.message.clone()}</span>
                            <button type="button" class="toast-close" on:click=move |_| toasts.dismiss(id)>
                                "×"
                            </button>
                        </div>
                    }
                }
            />
        </div>
    }
}
