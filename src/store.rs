//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::User;

/// Session-level state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user, once known
    pub user: Option<User>,
    pub authenticated: bool,
    /// Mobile nav drawer open
    pub nav_open: bool,
}

impl AppState {
    pub fn new(user: Option<User>, authenticated: bool) -> Self {
        Self {
            user,
            authenticated,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_sign_in(store: &AppStore, user: Option<User>) {
    *store.user().write() = user;
    store.authenticated().set(true);
}

pub fn store_sign_out(store: &AppStore) {
    *store.user().write() = None;
    store.authenticated().set(false);
}

pub fn store_toggle_nav(store: &AppStore) {
    store.nav_open().update(|open| *open = !*open);
}
