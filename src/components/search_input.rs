//! Search Input Component
//!
//! Text box that reports its value only after typing pauses.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use rest_resource::Debouncer;

#[component]
pub fn SearchInput(
    /// Current term held by the list (shown on mount)
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_search: Callback<String>,
    #[prop(into, default = "Search…".to_string())] placeholder: String,
    delay_ms: u32,
) -> impl IntoView {
    let (text, set_text) = signal(value.get_untracked());
    let debouncer = StoredValue::new(Debouncer::<String>::new());

    on_cleanup(move || {
        debouncer.try_update_value(|d| d.cancel());
    });

    let on_input = move |ev| {
        let term = event_target_value(&ev);
        set_text.set(term.clone());
        let Some(ticket) = debouncer.try_update_value(|d| d.push(term)) else {
            return;
        };
        spawn_local(async move {
            TimeoutFuture::new(delay_ms).await;
            if let Some(term) = debouncer.try_update_value(|d| d.take(ticket)).flatten() {
                on_search.run(term);
            }
        });
    };

    let clear = move |_| {
        debouncer.try_update_value(|d| d.cancel());
        set_text.set(String::new());
        on_search.run(String::new());
    };

    view! {
        <div class="search-input">
            <input
                type="search"
                placeholder=placeholder
                prop:value=move || text.get()
                on:input=on_input
            />
            <Show when=move || !text.get().is_empty()>
                <button type="button" class="search-clear" title="Clear" on:click=clear>"×"</button>
            </Show>
        </div>
    }
}
