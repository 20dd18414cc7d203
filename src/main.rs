//! FieldOps Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod controllers;
mod error_catalog;
mod markdown;
mod models;
mod route;
mod services;
mod store;
mod transform;

use app::App;
use config::{page_origin, AppConfig};
use console_logger::LoggerConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load(page_origin().as_deref());
    if let Err(e) = console_logger::init(LoggerConfig::default().with_level_name(&config.log_level)) {
        leptos::logging::warn!("logger already installed: {}", e);
    }
    tracing::info!("[APP] starting, api at {}", config.api_base_url);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
