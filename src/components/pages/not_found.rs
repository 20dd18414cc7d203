use leptos::prelude::*;

use crate::components::NavLink;
use crate::route::Route;

#[component]
pub fn NotFoundPage(path: String) -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"Page not found"</h1>
            <p>"Nothing lives at " <code>{path}</code> "."</p>
            <NavLink route=Route::Dashboard class="btn btn-primary">"Back to dashboard"</NavLink>
        </section>
    }
}
