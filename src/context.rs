//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;
use rest_resource::{ReqwestTransport, ResourceService, RestResource};

use crate::config::AppConfig;
use crate::controllers::Toasts;
use crate::services::Api;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<AppConfig>,
    /// The API client holds `Rc`s, so it lives in local storage
    api: StoredValue<Api, LocalStorage>,
    pub toasts: Toasts,
}

impl AppContext {
    pub fn new(config: AppConfig, api: Api, toasts: Toasts) -> Self {
        Self {
            config: StoredValue::new(config),
            api: StoredValue::new_local(api),
            toasts,
        }
    }

    pub fn config(&self) -> AppConfig {
        self.config.get_value()
    }

    pub fn api(&self) -> Api {
        self.api.get_value()
    }

    /// CRUD service for one resource type
    pub fn service<R: RestResource>(&self) -> ResourceService<R, ReqwestTransport> {
        ResourceService::new(self.api())
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
