//! Shared types for the Bistro back-office
//!
//! Data models mirrored from the REST backend, error codes with their
//! Vietnamese user messages, list envelopes, and the client-side logic that
//! does not need the network: the order cart, the table status workflow,
//! money formatting and form validation.

pub mod cart;
pub mod client;
pub mod error;
pub mod models;
pub mod money;
pub mod response;
pub mod table;
pub mod util;
pub mod validation;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use cart::{CartLine, MergePolicy, OrderCart};
pub use error::{AppError, AppResult, ErrorCode};
pub use response::{ListResponse, Page, PageRequest, Pagination};
pub use table::{TableEvent, TransitionError};
