//! Which part of the back-office an error code belongs to

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Back-office area an [`ErrorCode`] comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    General,
    /// Login, tokens and the session
    Auth,
    Permission,
    Reservation,
    /// Item selection and orders placed on a table
    Order,
    Billing,
    Menu,
    /// Floor plan and table status
    Table,
    Staff,
    /// Customers and loyalty points
    Customer,
    /// Server, network and client configuration
    System,
}

impl ErrorCategory {
    /// Machine name, used as a log field
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Reservation => "reservation",
            Self::Order => "order",
            Self::Billing => "billing",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::Staff => "staff",
            Self::Customer => "customer",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Back-office area this code belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Success
            | Self::Unknown
            | Self::ValidationFailed
            | Self::NotFound
            | Self::AlreadyExists
            | Self::InvalidRequest
            | Self::RequiredField => ErrorCategory::General,

            Self::NotAuthenticated | Self::SessionExpired | Self::TokenPairMissing => {
                ErrorCategory::Auth
            }

            Self::PermissionDenied => ErrorCategory::Permission,

            Self::ReservationNotFound => ErrorCategory::Reservation,

            Self::EmptySelection | Self::InvalidQuantity | Self::OrderAddFailed => {
                ErrorCategory::Order
            }

            Self::BillNotFound | Self::BillCreateFailed => ErrorCategory::Billing,

            Self::MenuItemNotFound | Self::MenuLoadFailed => ErrorCategory::Menu,

            Self::TableNotFound | Self::TableOccupied | Self::InvalidTableTransition => {
                ErrorCategory::Table
            }

            Self::StaffNotFound => ErrorCategory::Staff,

            Self::CustomerNotFound | Self::LoyaltyHistoryUnavailable => ErrorCategory::Customer,

            Self::InternalError | Self::NetworkError | Self::TimeoutError | Self::ConfigError => {
                ErrorCategory::System
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::SessionExpired.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::EmptySelection.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::OrderAddFailed.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::BillCreateFailed.category(), ErrorCategory::Billing);
        assert_eq!(ErrorCode::TableOccupied.category(), ErrorCategory::Table);
        assert_eq!(ErrorCode::NetworkError.category().name(), "system");
    }

    #[test]
    fn test_staff_and_customers_are_separate() {
        assert_eq!(ErrorCode::StaffNotFound.category(), ErrorCategory::Staff);
        assert_eq!(
            ErrorCode::LoyaltyHistoryUnavailable.category(),
            ErrorCategory::Customer
        );
        assert_eq!(ErrorCode::CustomerNotFound.category().name(), "customer");
    }
}
