//! App Shell
//!
//! Sidebar navigation, signed-in user chip and the page area.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_app_context;
use crate::route::{use_navigator, Route};
use crate::services::auth;
use crate::store::{store_sign_out, store_toggle_nav, use_app_store, AppStateStoreFields};

const NAV_ITEMS: [(&str, Route); 5] = [
    ("Dashboard", Route::Dashboard),
    ("Customers", Route::Customers),
    ("Quotes", Route::Quotes),
    ("Jobs", Route::Jobs),
    ("Employees", Route::Employees),
];

/// In-app link: pushes history instead of reloading the page.
#[component]
pub fn NavLink(
    route: Route,
    #[prop(into, default = String::new())] class: String,
    children: Children,
) -> impl IntoView {
    let navigator = use_navigator();
    let href = route.path();

    view! {
        <a
            href=href
            class=class
            on:click=move |ev| {
                ev.prevent_default();
                navigator.navigate(route.clone());
            }
        >
            {children()}
        </a>
    }
}

#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let ctx = use_app_context();
    let store = use_app_store();
    let navigator = use_navigator();
    let route = navigator.route();

    let initials = move || store.user().get().map(|u| u.initials()).unwrap_or_default();
    let user_name = move || store.user().get().map(|u| u.name).unwrap_or_default();
    let (signing_out, set_signing_out) = signal(false);

    let sign_out = move |_| {
        if signing_out.get_untracked() {
            return;
        }
        set_signing_out.set(true);
        let api = ctx.api();
        spawn_local(async move {
            auth::logout(&api).await;
            store_sign_out(&store);
            set_signing_out.try_set(false);
            navigator.replace(Route::Login);
        });
    };

    view! {
        <div class="app-shell" class:nav-open=move || store.nav_open().get()>
            <header class="topbar">
                <button
                    type="button"
                    class="nav-toggle"
                    aria-label="Toggle navigation"
                    on:click=move |_| store_toggle_nav(&store)
                >
                    "☰"
                </button>
                <span class="brand">"FieldOps"</span>
                <div class="user-chip" title=user_name>
                    <span class="avatar">{initials}</span>
                    <button
                        type="button"
                        class="btn btn-link"
                        disabled=move || signing_out.get()
                        on:click=sign_out
                    >
                        "Sign out"
                    </button>
                </div>
            </header>
            <nav class="sidebar">
                <ul>
                    {NAV_ITEMS
                        .into_iter()
                        .map(|(label, target)| {
                            let section = target.clone();
                            let active = move || route.with(|r| r.section().as_ref() == Some(&section));
                            view! {
                                <li class:active=active>
                                    <NavLink route=target>{label}</NavLink>
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </nav>
            <main class="page">{children()}</main>
        </div>
    }
}
