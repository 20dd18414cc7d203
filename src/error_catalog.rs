//! Error Catalog
//!
//! Static lookup from an error code to the title, icon, color and wording the
//! error dialog shows, plus the recovery buttons offered by default for each
//! kind of error.

use rest_resource::ErrorCode;

/// Dialog category; drives the default actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    Auth,
    Permission,
    Network,
    Validation,
    NotFound,
    Conflict,
    RateLimit,
    Server,
    Generic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorConfig {
    pub title: &'static str,
    pub icon: &'static str,
    /// CSS modifier: `danger`, `warning` or `info`
    pub color: &'static str,
    pub error_type: ErrorType,
    pub description: &'static str,
}

const fn config(
    title: &'static str,
    icon: &'static str,
    color: &'static str,
    error_type: ErrorType,
    description: &'static str,
) -> ErrorConfig {
    ErrorConfig { title, icon, color, error_type, description }
}

pub const GENERIC_ERROR: ErrorConfig = config(
    "Something Went Wrong",
    "⚠",
    "danger",
    ErrorType::Generic,
    "An unexpected error occurred. Please try again.",
);

pub fn error_config(code: &ErrorCode) -> ErrorConfig {
    match code {
        ErrorCode::Http(400) => config("Bad Request", "⚠", "warning", ErrorType::Validation, "The request could not be processed. Check your input and try again."),
        ErrorCode::Http(401) => config("Authentication Required", "🔒", "warning", ErrorType::Auth, "Your session has expired or you are not signed in."),
        ErrorCode::Http(403) => config("Access Denied", "⛔", "danger", ErrorType::Permission, "You do not have permission to perform this action."),
        ErrorCode::Http(404) => config("Not Found", "🔍", "info", ErrorType::NotFound, "The requested record could not be found. It may have been removed."),
        ErrorCode::Http(405) => config("Method Not Allowed", "⚠", "warning", ErrorType::Generic, "This action is not supported."),
        ErrorCode::Http(408) => config("Request Timeout", "⏱", "warning", ErrorType::Network, "The server took too long to respond."),
        ErrorCode::Http(409) => config("Conflict", "⚠", "warning", ErrorType::Conflict, "The record was changed by someone else. Reload and try again."),
        ErrorCode::Http(413) => config("File Too Large", "📁", "warning", ErrorType::Validation, "The uploaded file exceeds the allowed size."),
        ErrorCode::Http(422) => config("Validation Error", "✎", "warning", ErrorType::Validation, "Some fields need your attention."),
        ErrorCode::Http(429) => config("Too Many Requests", "⏳", "warning", ErrorType::RateLimit, "You are sending requests too quickly. Wait a moment and try again."),
        ErrorCode::Http(500) => config("Server Error", "🛠", "danger", ErrorType::Server, "The server encountered an error. Our team has been notified."),
        ErrorCode::Http(502) => config("Bad Gateway", "🛠", "danger", ErrorType::Server, "The server is temporarily unreachable."),
        ErrorCode::Http(503) => config("Service Unavailable", "🛠", "danger", ErrorType::Server, "The service is down for maintenance. Try again shortly."),
        ErrorCode::Http(504) => config("Gateway Timeout", "⏱", "danger", ErrorType::Server, "The server did not respond in time."),
        ErrorCode::NetworkError => config("Connection Problem", "📡", "danger", ErrorType::Network, "Unable to reach the server. Check your internet connection."),
        ErrorCode::Timeout => config("Request Timed Out", "⏱", "warning", ErrorType::Network, "The request took too long. Check your connection and try again."),
        ErrorCode::CorsError => config("Connection Blocked", "🚫", "danger", ErrorType::Network, "The browser blocked the request to the server."),
        ErrorCode::Rejected => config("Request Not Completed", "⚠", "warning", ErrorType::Generic, "The server could not complete this request."),
        _ => GENERIC_ERROR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    ResetPassword,
    SignIn,
    Retry,
    Refresh,
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorAction {
    pub label: String,
    pub kind: ActionKind,
    pub primary: bool,
}

impl ErrorAction {
    pub fn new(label: &str, kind: ActionKind, primary: bool) -> Self {
        Self { label: label.to_string(), kind, primary }
    }
}

pub fn default_actions(error_type: ErrorType) -> Vec<ErrorAction> {
    match error_type {
        ErrorType::Auth => vec![
            ErrorAction::new("Reset Password", ActionKind::ResetPassword, false),
            ErrorAction::new("Sign In", ActionKind::SignIn, true),
            ErrorAction::new("Close", ActionKind::Close, false),
        ],
        ErrorType::Network => vec![
            ErrorAction::new("Retry", ActionKind::Retry, true),
            ErrorAction::new("Refresh Page", ActionKind::Refresh, false),
            ErrorAction::new("Close", ActionKind::Close, false),
        ],
        _ => vec![
            ErrorAction::new("Try Again", ActionKind::Retry, true),
            ErrorAction::new("Close", ActionKind::Close, false),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(actions: &[ErrorAction]) -> Vec<&str> {
        actions.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn test_not_found_uses_default_actions() {
        let config = error_config(&ErrorCode::Http(404));
        assert_eq!(config.title, "Not Found");
        assert_eq!(labels(&default_actions(config.error_type)), vec!["Try Again", "Close"]);
    }

    #[test]
    fn test_auth_and_network_actions() {
        let auth = error_config(&ErrorCode::Http(401));
        assert_eq!(labels(&default_actions(auth.error_type)), vec!["Reset Password", "Sign In", "Close"]);

        for code in [ErrorCode::NetworkError, ErrorCode::Timeout, ErrorCode::CorsError, ErrorCode::Http(408)] {
            let config = error_config(&code);
            assert_eq!(config.error_type, ErrorType::Network, "{}", code);
            assert_eq!(default_actions(config.error_type)[0].kind, ActionKind::Retry);
        }
    }

    #[test]
    fn test_unknown_codes_fall_back_to_generic() {
        assert_eq!(error_config(&ErrorCode::Http(418)), GENERIC_ERROR);
        assert_eq!(error_config(&ErrorCode::Decode), GENERIC_ERROR);
    }

    #[test]
    fn test_rejected_envelope_has_its_own_entry() {
        let config = error_config(&ErrorCode::Rejected);
        assert_ne!(config, GENERIC_ERROR);
        assert_eq!(config.title, "Request Not Completed");
    }

    #[test]
    fn test_every_catalogued_status_has_a_title() {
        for status in [400, 401, 403, 404, 405, 408, 409, 413, 422, 429, 500, 502, 503, 504] {
            let config = error_config(&ErrorCode::Http(status));
            assert_ne!(config, GENERIC_ERROR, "{}", status);
            assert!(!config.title.is_empty());
        }
    }
}
