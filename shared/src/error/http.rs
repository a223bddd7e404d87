//! Classifying backend HTTP statuses as error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Classify a backend status code
    ///
    /// Used when the response body carries no structured code.
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            200..=299 => Self::Success,
            400 | 422 => Self::ValidationFailed,
            401 => Self::SessionExpired,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            409 => Self::AlreadyExists,
            408 | 504 => Self::TimeoutError,
            502 | 503 => Self::NetworkError,
            500..=599 => Self::InternalError,
            _ => Self::Unknown,
        }
    }
}
