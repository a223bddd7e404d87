//! Data models
//!
//! Mirrors of the backend's JSON records. IDs are `i64`, money is
//! `rust_decimal::Decimal`, dates are `chrono::NaiveDate`.

pub mod bill;
pub mod customer;
pub mod dashboard;
pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod reservation;
pub mod staff;
pub mod user;

// Re-exports
pub use bill::*;
pub use customer::*;
pub use dashboard::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
pub use reservation::*;
pub use staff::*;
pub use user::*;
