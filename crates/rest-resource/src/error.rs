//! API Errors
//!
//! Every failure a caller can observe is normalized into [`ApiError`]:
//! a display message, a code (HTTP status or a synthetic transport code) and
//! the server's error body when one was returned.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error code carried by an [`ApiError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Http(u16),
    NetworkError,
    Timeout,
    CorsError,
    /// Response arrived but could not be decoded
    Decode,
    /// A 2xx response whose envelope reported `success: false`
    Rejected,
}

impl ErrorCode {
    pub fn status(&self) -> Option<u16> {
        match self {
            ErrorCode::Http(status) => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ErrorCode::NetworkError | ErrorCode::Timeout | ErrorCode::CorsError
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Http(status) => write!(f, "{}", status),
            ErrorCode::NetworkError => f.write_str("NETWORK_ERROR"),
            ErrorCode::Timeout => f.write_str("TIMEOUT"),
            ErrorCode::CorsError => f.write_str("CORS_ERROR"),
            ErrorCode::Decode => f.write_str("DECODE_ERROR"),
            ErrorCode::Rejected => f.write_str("REJECTED"),
        }
    }
}

/// Coarse error taxonomy used by the UI to pick wording and recovery actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    RateLimit,
    Server,
    Transport,
    Other,
}

/// Error body as returned by the backend for non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    /// Field-keyed validation messages (422)
    #[serde(default)]
    pub errors: BTreeMap<String, Vec<String>>,
}

/// Normalized error surfaced by every client call
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub code: ErrorCode,
    pub response: Option<ErrorBody>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            response: None,
        }
    }

    /// Build from a non-2xx response, preferring the server's message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .and_then(|b| b.message.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| default_status_message(status).to_string());
        Self {
            message,
            code: ErrorCode::Http(status),
            response: parsed,
        }
    }

    pub fn decode(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::Decode, format!("Unexpected response from server: {}", err))
    }

    pub fn status(&self) -> Option<u16> {
        self.code.status()
    }

    pub fn kind(&self) -> ErrorKind {
        match self.code {
            ErrorCode::Http(422) => ErrorKind::Validation,
            ErrorCode::Http(401) | ErrorCode::Http(403) => ErrorKind::Auth,
            ErrorCode::Http(404) => ErrorKind::NotFound,
            ErrorCode::Http(429) => ErrorKind::RateLimit,
            ErrorCode::Http(status) if status >= 500 => ErrorKind::Server,
            code if code.is_transport() => ErrorKind::Transport,
            _ => ErrorKind::Other,
        }
    }

    /// Validation messages keyed by field name; empty unless the server sent them.
    pub fn field_errors(&self) -> BTreeMap<String, Vec<String>> {
        self.response
            .as_ref()
            .map(|b| b.errors.clone())
            .unwrap_or_default()
    }

    /// First validation message for a single field
    pub fn field_error(&self, field: &str) -> Option<String> {
        self.response
            .as_ref()
            .and_then(|b| b.errors.get(field))
            .and_then(|msgs| msgs.first().cloned())
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        let code = match err {
            TransportError::Network(_) => ErrorCode::NetworkError,
            TransportError::Timeout(_) => ErrorCode::Timeout,
            TransportError::Cors(_) => ErrorCode::CorsError,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Failure below HTTP: the request never produced a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Request timed out: {0}")]
    Timeout(String),
    #[error("Cross-origin request blocked: {0}")]
    Cors(String),
}

impl TransportError {
    /// Classify a transport failure from its message text.
    ///
    /// Browsers report fetch failures as opaque strings, so there is no
    /// structured code to inspect.
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();
        if lower.contains("timeout") || lower.contains("timed out") {
            TransportError::Timeout(message)
        } else if lower.contains("cors") || lower.contains("cross-origin") {
            TransportError::Cors(message)
        } else {
            TransportError::Network(message)
        }
    }
}

fn default_status_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Your session has expired. Please sign in again.",
        403 => "You do not have permission to perform this action",
        404 => "The requested resource was not found",
        409 => "The resource was modified by someone else",
        413 => "The uploaded file is too large",
        422 => "Some fields are invalid",
        429 => "Too many requests. Please slow down.",
        500..=599 => "The server encountered an error",
        _ => "Request failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_uses_server_message_and_field_errors() {
        let body = r#"{"success":false,"message":"The given data was invalid.","errors":{"email":["The email has already been taken."]}}"#;
        let err = ApiError::from_response(422, body);

        assert_eq!(err.message, "The given data was invalid.");
        assert_eq!(err.code, ErrorCode::Http(422));
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(
            err.field_error("email").as_deref(),
            Some("The email has already been taken.")
        );
        assert!(err.field_error("name").is_none());
    }

    #[test]
    fn test_from_response_without_json_body() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.kind(), ErrorKind::Server);
        assert_eq!(err.message, "The server encountered an error");
        assert!(err.response.is_none());
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(ApiError::new(ErrorCode::Http(401), "x").kind(), ErrorKind::Auth);
        assert_eq!(ApiError::new(ErrorCode::Http(403), "x").kind(), ErrorKind::Auth);
        assert_eq!(ApiError::new(ErrorCode::Http(404), "x").kind(), ErrorKind::NotFound);
        assert_eq!(ApiError::new(ErrorCode::Http(429), "x").kind(), ErrorKind::RateLimit);
        assert_eq!(ApiError::new(ErrorCode::Http(409), "x").kind(), ErrorKind::Other);
        assert_eq!(ApiError::new(ErrorCode::Timeout, "x").kind(), ErrorKind::Transport);
        assert_eq!(ApiError::new(ErrorCode::Decode, "x").kind(), ErrorKind::Other);
    }

    #[test]
    fn test_transport_error_heuristics() {
        assert!(matches!(
            TransportError::from_message("operation timed out"),
            TransportError::Timeout(_)
        ));
        assert!(matches!(
            TransportError::from_message("Blocked by CORS policy"),
            TransportError::Cors(_)
        ));
        assert!(matches!(
            TransportError::from_message("TypeError: Failed to fetch"),
            TransportError::Network(_)
        ));

        let api: ApiError = TransportError::from_message("request timeout").into();
        assert_eq!(api.code, ErrorCode::Timeout);
        assert_eq!(api.code.to_string(), "TIMEOUT");
    }
}
