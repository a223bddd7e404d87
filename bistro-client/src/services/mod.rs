//! One service per backend resource
//!
//! Services are thin: build the request, send it through the shared
//! [`HttpClient`](crate::http::HttpClient), map the few endpoint-specific
//! errors. All of them clone cheaply.

/// Implements `Clone` and `new` for a service holding `http: Arc<C>`
macro_rules! service {
    ($name:ident) => {
        impl<C> Clone for $name<C> {
            fn clone(&self) -> Self {
                Self {
                    http: std::sync::Arc::clone(&self.http),
                }
            }
        }

        impl<C> $name<C> {
            pub fn new(http: std::sync::Arc<C>) -> Self {
                Self { http }
            }
        }
    };
}
pub(crate) use service;

pub mod account;
pub mod billing;
pub mod customer;
pub mod dashboard;
pub mod menu;
pub mod reservation;
pub mod staff;
pub mod table;

pub use account::AccountService;
pub use billing::BillingService;
pub use customer::CustomerService;
pub use dashboard::DashboardService;
pub use menu::MenuService;
pub use reservation::ReservationService;
pub use staff::StaffService;
pub use table::TableService;

/// `tables/3/orders/`-style path below a collection
pub(crate) fn item_path(collection: &str, id: i64, action: Option<&str>) -> String {
    match action {
        Some(action) => format!("{}/{}/{}/", collection, id, action),
        None => format!("{}/{}/", collection, id),
    }
}
