//! Application Configuration
//!
//! Values are baked in at build time (`FIELDOPS_*` env vars read by
//! `option_env!`); the API URL falls back to the page origin at runtime.

use rest_resource::UploadRules;

const MB: u64 = 1024 * 1024;

pub const DEFAULT_API_PATH: &str = "/api/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Absolute API base, e.g. `https://app.example.com/api/v1`
    pub api_base_url: String,
    pub per_page: u32,
    pub search_debounce_ms: u32,
    /// Delay before the list is refetched after a create/update/delete
    pub refresh_delay_ms: u32,
    pub toast_duration_ms: u32,
    pub log_level: String,
    pub logo_upload: UploadRules,
    pub attachment_upload: UploadRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: format!("http://localhost:8000{}", DEFAULT_API_PATH),
            per_page: 10,
            search_debounce_ms: 400,
            refresh_delay_ms: 500,
            toast_duration_ms: 4000,
            log_level: "info".to_string(),
            logo_upload: UploadRules::new(
                2 * MB,
                &["image/jpeg", "image/png", "image/webp", "image/svg+xml"],
            ),
            attachment_upload: UploadRules::new(
                10 * MB,
                &[
                    "image/*",
                    "application/pdf",
                    "application/msword",
                    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                    "application/vnd.ms-excel",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                    "text/plain",
                    "text/csv",
                ],
            ),
        }
    }
}

impl AppConfig {
    /// Build-time overrides on top of defaults; `origin` is the page origin.
    pub fn load(origin: Option<&str>) -> Self {
        Self::from_values(
            option_env!("FIELDOPS_API_URL"),
            option_env!("FIELDOPS_PER_PAGE"),
            option_env!("FIELDOPS_LOG"),
            origin,
        )
    }

    fn from_values(
        api_url: Option<&str>,
        per_page: Option<&str>,
        log_level: Option<&str>,
        origin: Option<&str>,
    ) -> Self {
        let mut config = Self::default();

        match (api_url.filter(|u| !u.is_empty()), origin) {
            (Some(url), _) if url.starts_with("http") => config.api_base_url = url.to_string(),
            (Some(path), Some(origin)) => {
                config.api_base_url = format!("{}/{}", origin.trim_end_matches('/'), path.trim_start_matches('/'))
            }
            (None, Some(origin)) => {
                config.api_base_url = format!("{}{}", origin.trim_end_matches('/'), DEFAULT_API_PATH)
            }
            _ => {}
        }

        if let Some(n) = per_page.and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0) {
            config.per_page = n;
        }
        if let Some(level) = log_level.filter(|l| !l.is_empty()) {
            config.log_level = level.to_string();
        }
        config
    }
}

/// `window.location.origin`, if running in a browser
pub fn page_origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_fallback() {
        let config = AppConfig::from_values(None, None, None, Some("https://crew.example.com/"));
        assert_eq!(config.api_base_url, "https://crew.example.com/api/v1");
    }

    #[test]
    fn test_relative_api_path_joins_origin() {
        let config = AppConfig::from_values(Some("/backend/api/v1"), None, None, Some("https://crew.example.com"));
        assert_eq!(config.api_base_url, "https://crew.example.com/backend/api/v1");
    }

    #[test]
    fn test_absolute_url_and_per_page_override() {
        let config = AppConfig::from_values(Some("https://api.example.com/api/v1"), Some("25"), Some("debug"), None);
        assert_eq!(config.api_base_url, "https://api.example.com/api/v1");
        assert_eq!(config.per_page, 25);
        assert_eq!(config.log_level, "debug");

        let bad = AppConfig::from_values(None, Some("zero"), None, None);
        assert_eq!(bad.per_page, 10);
    }
}
