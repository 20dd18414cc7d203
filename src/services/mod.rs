//! API Services
//!
//! Thin async wrappers over [`ApiClient`] for the endpoints that are not
//! plain CRUD. CRUD itself goes through `ResourceService`. Every function is
//! generic over the transport so tests can script responses.

pub mod auth;
pub mod clients;
pub mod dashboard;
pub mod employees;
pub mod jobs;
pub mod quotes;

use std::rc::Rc;

use rest_resource::{ApiClient, ReqwestTransport, ResourceService, SessionContext, SessionStorage};

use crate::config::AppConfig;
use crate::models::{Client, Employee, Job, Quote};

/// Client used by the running app
pub type Api = ApiClient<ReqwestTransport>;

pub type ClientService = ResourceService<Client, ReqwestTransport>;
pub type JobService = ResourceService<Job, ReqwestTransport>;
pub type QuoteService = ResourceService<Quote, ReqwestTransport>;
pub type EmployeeService = ResourceService<Employee, ReqwestTransport>;

/// `window.localStorage`; silently does nothing when storage is unavailable
/// (private mode, sandboxed iframes).
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!("[STORAGE] could not persist {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Session hydrated from `localStorage` and an API client bound to it.
pub fn build_api(config: &AppConfig) -> Api {
    let session = SessionContext::new(Rc::new(BrowserStorage));
    tracing::info!(
        "[API] base {} (session {})",
        config.api_base_url,
        if session.is_authenticated() { "restored" } else { "empty" }
    );
    ApiClient::new(ReqwestTransport::new(), config.api_base_url.clone(), session)
}
