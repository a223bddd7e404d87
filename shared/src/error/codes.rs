//! Error codes for the back-office client
//!
//! Codes are grouped by the leading digit:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Reservation errors
//! - 4xxx: Order (selection cart) errors
//! - 5xxx: Billing errors
//! - 6xxx: Menu errors
//! - 7xxx: Table errors
//! - 8xxx: People errors (80xx staff, 81xx customers)
//! - 9xxx: System / transport errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as its `u16` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed (400 from the backend, or a local check)
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// No access token available
    NotAuthenticated = 1001,
    /// Access token expired and could not be refreshed
    SessionExpired = 1005,
    /// Login response did not carry both tokens
    TokenPairMissing = 1009,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 3xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 3001,

    // ==================== 4xxx: Order ====================
    /// Nothing selected
    EmptySelection = 4001,
    /// Quantity must be positive
    InvalidQuantity = 4002,
    /// Adding items to a table failed
    OrderAddFailed = 4003,

    // ==================== 5xxx: Billing ====================
    /// Bill not found
    BillNotFound = 5001,
    /// Bill creation failed
    BillCreateFailed = 5002,

    // ==================== 6xxx: Menu ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Menu list could not be loaded
    MenuLoadFailed = 6002,

    // ==================== 7xxx: Table ====================
    /// Table not found
    TableNotFound = 7001,
    /// Table still has guests
    TableOccupied = 7002,
    /// Status change not allowed from the current status
    InvalidTableTransition = 7003,

    // ==================== 8xxx: People ====================
    /// Staff member not found
    StaffNotFound = 8001,
    /// Customer not found
    CustomerNotFound = 8101,
    /// Loyalty history endpoint not configured on the backend
    LoyaltyHistoryUnavailable = 8102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Server could not be reached
    NetworkError = 9003,
    /// Request timed out
    TimeoutError = 9004,
    /// Client misconfiguration
    ConfigError = 9005,
}

/// Error returned when converting an unknown `u16` into [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl ErrorCode {
    /// Numeric value of the code
    pub fn code(&self) -> u16 {
        *self as u16
    }

    /// Whether this code means success
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// User-facing message shown by the back-office (Vietnamese)
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Thành công",
            Self::Unknown => "Đã xảy ra lỗi không xác định.",
            Self::ValidationFailed => "Dữ liệu không hợp lệ",
            Self::NotFound => "Không tìm thấy dữ liệu yêu cầu.",
            Self::AlreadyExists => "Dữ liệu đã tồn tại",
            Self::InvalidRequest => "Yêu cầu không hợp lệ",
            Self::RequiredField => "Thiếu thông tin bắt buộc",

            Self::NotAuthenticated => "Vui lòng đăng nhập",
            Self::SessionExpired => "Phiên đăng nhập đã hết hạn. Vui lòng đăng nhập lại.",
            Self::TokenPairMissing => "Phản hồi đăng nhập không hợp lệ",

            Self::PermissionDenied => "Bạn không có quyền thực hiện hành động này.",

            Self::ReservationNotFound => "Không tìm thấy đặt bàn",

            Self::EmptySelection => "Vui lòng chọn ít nhất một món",
            Self::InvalidQuantity => "Số lượng không hợp lệ",
            Self::OrderAddFailed => "Không thể thêm món. Vui lòng thử lại sau.",

            Self::BillNotFound => "Không tìm thấy hóa đơn",
            Self::BillCreateFailed => "Không thể tạo hóa đơn",

            Self::MenuItemNotFound => "Không tìm thấy món ăn",
            Self::MenuLoadFailed => "Không thể tải danh sách món ăn",

            Self::TableNotFound => "Không tìm thấy bàn",
            Self::TableOccupied => "Không thể xóa bàn đang có khách",
            Self::InvalidTableTransition => "Không thể cập nhật trạng thái bàn",

            Self::StaffNotFound => "Không tìm thấy nhân viên",
            Self::CustomerNotFound => "Không tìm thấy khách hàng",
            Self::LoyaltyHistoryUnavailable => "Lịch sử tích điểm chưa được cấu hình",

            Self::InternalError => "Lỗi server. Vui lòng thử lại sau.",
            Self::NetworkError => {
                "Không thể kết nối đến server. Vui lòng kiểm tra kết nối mạng."
            }
            Self::TimeoutError => "Máy chủ phản hồi quá lâu. Vui lòng thử lại.",
            Self::ConfigError => "Cấu hình không hợp lệ",
        }
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),

            1001 => Ok(ErrorCode::NotAuthenticated),
            1005 => Ok(ErrorCode::SessionExpired),
            1009 => Ok(ErrorCode::TokenPairMissing),

            2001 => Ok(ErrorCode::PermissionDenied),

            3001 => Ok(ErrorCode::ReservationNotFound),

            4001 => Ok(ErrorCode::EmptySelection),
            4002 => Ok(ErrorCode::InvalidQuantity),
            4003 => Ok(ErrorCode::OrderAddFailed),

            5001 => Ok(ErrorCode::BillNotFound),
            5002 => Ok(ErrorCode::BillCreateFailed),

            6001 => Ok(ErrorCode::MenuItemNotFound),
            6002 => Ok(ErrorCode::MenuLoadFailed),

            7001 => Ok(ErrorCode::TableNotFound),
            7002 => Ok(ErrorCode::TableOccupied),
            7003 => Ok(ErrorCode::InvalidTableTransition),

            8001 => Ok(ErrorCode::StaffNotFound),
            8101 => Ok(ErrorCode::CustomerNotFound),
            8102 => Ok(ErrorCode::LoyaltyHistoryUnavailable),

            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9004 => Ok(ErrorCode::TimeoutError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
