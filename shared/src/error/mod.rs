//! Unified error system for the back-office
//!
//! - [`ErrorCode`]: standardized codes, each with a Vietnamese user message
//! - [`ErrorCategory`]: back-office area a code belongs to
//! - [`AppError`]: error with code, message and optional details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::EmptySelection);
//! assert_eq!(err.message, "Vui lòng chọn ít nhất một món");
//!
//! let err = AppError::validation("Số điện thoại không hợp lệ (10-11 số)")
//!     .with_detail("field", "phone");
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
