//! Client error types

use http::StatusCode;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::table::TransitionError;
use thiserror::Error;

/// Message for transport failures (connect, timeout)
pub const NETWORK_MESSAGE: &str = "Không thể kết nối đến server. Vui lòng kiểm tra kết nối mạng.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with an error status not covered below
    #[error("API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    /// Server rejected the request body (400/422)
    #[error("Validation error: {message}")]
    Validation { message: String, body: Option<Value> },

    /// Credentials rejected, or still 401 after a token refresh
    #[error("Authentication required: {0}")]
    Unauthorized(String),

    /// Refresh failed or no refresh token; tokens have been cleared
    #[error("Session expired")]
    SessionExpired,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local rule failure (empty cart, invalid form, ...)
    #[error(transparent)]
    App(#[from] AppError),

    /// Table status change not allowed
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Build the error for a failed response
    pub fn from_response(status: StatusCode, text: &str) -> Self {
        let body = serde_json::from_str::<Value>(text).ok();
        let message = extract_message(status, body.as_ref());
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Self::Validation { message, body }
            }
            StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            StatusCode::FORBIDDEN => Self::Forbidden(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Api {
                status,
                message,
                body,
            },
        }
    }

    /// HTTP status behind this error, if it came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Validation { .. } => Some(StatusCode::BAD_REQUEST),
            Self::Unauthorized(_) | Self::SessionExpired => Some(StatusCode::UNAUTHORIZED),
            Self::Forbidden(_) => Some(StatusCode::FORBIDDEN),
            Self::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }

    /// Error code classification
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::SessionExpired => ErrorCode::SessionExpired,
            Self::Unauthorized(_) => ErrorCode::NotAuthenticated,
            Self::App(e) => e.code,
            Self::Transition(_) => ErrorCode::InvalidTableTransition,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidRequest,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::InternalError,
            other => other
                .status()
                .map(ErrorCode::from_status)
                .unwrap_or(ErrorCode::Unknown),
        }
    }

    /// Replace an error that came from a `status` response with `code`
    ///
    /// Used where an endpoint gives a status a more specific meaning, e.g. a
    /// 403 on table delete means the table still has guests.
    pub fn remap(self, status: StatusCode, code: ErrorCode) -> Self {
        if matches!(self, Self::SessionExpired) || self.status() != Some(status) {
            return self;
        }
        let mut err = AppError::new(code).with_detail("status", status.as_u16());
        if let Some(message) = self.server_message() {
            err = err.with_detail("server_message", message);
        }
        Self::App(err)
    }

    /// Whether the session is gone and the user must log in again
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::SessionExpired | Self::Unauthorized(_))
    }

    /// The message extracted from the server payload, when there is one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::Validation { message, .. }
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => Some(message),
            _ => None,
        }
    }

    /// Vietnamese message for display
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => NETWORK_MESSAGE.to_string(),
            Self::Validation { message, body } => {
                let raw = body
                    .as_ref()
                    .map(Value::to_string)
                    .unwrap_or_else(|| message.clone());
                format!("Dữ liệu không hợp lệ: {}", raw)
            }
            Self::Unauthorized(_) | Self::SessionExpired => {
                ErrorCode::SessionExpired.message().to_string()
            }
            Self::Forbidden(_) => ErrorCode::PermissionDenied.message().to_string(),
            Self::NotFound(_) => ErrorCode::NotFound.message().to_string(),
            Self::Api { status, .. } if *status == StatusCode::INTERNAL_SERVER_ERROR => {
                ErrorCode::InternalError.message().to_string()
            }
            Self::Api { status, body, .. } => {
                let detail = body
                    .as_ref()
                    .and_then(|b| b.get("detail"))
                    .and_then(Value::as_str)
                    .unwrap_or("Không xác định");
                format!("Lỗi server ({}): {}", status.as_u16(), detail)
            }
            Self::App(e) => e.message.clone(),
            Self::Transition(e) => e.user_message().to_string(),
            other => other.code().message().to_string(),
        }
    }
}

/// Pull a readable message out of an error payload
///
/// Precedence: `errors` object (all messages joined with ", "), `detail`,
/// `message`, then any field → list-of-strings entries. Falls back to
/// `Server error: {status}`.
pub fn extract_message(status: StatusCode, body: Option<&Value>) -> String {
    let fallback = || format!("Server error: {}", status.as_u16());
    let Some(Value::Object(map)) = body else {
        return fallback();
    };

    if let Some(Value::Object(errors)) = map.get("errors") {
        let joined = join_messages(errors.values());
        if !joined.is_empty() {
            return joined;
        }
    }
    for key in ["detail", "message"] {
        if let Some(Value::String(s)) = map.get(key) {
            if !s.trim().is_empty() {
                return s.clone();
            }
        }
    }
    let joined = join_messages(map.values().filter(|v| v.is_array()));
    if joined.is_empty() { fallback() } else { joined }
}

fn join_messages<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Array(items) => out.extend(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string),
            ),
            _ => {}
        }
    }
    out.join(", ")
}
