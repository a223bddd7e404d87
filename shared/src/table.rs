//! Table status workflow
//!
//! ```text
//!              OrderAdded            OrderAdded
//!  available ───────────────► occupied ◄──────┐
//!      ▲  │                      │  └──────────┘
//!      │  │ ToggleReservation    │ BillCreated
//!      │  ▼                      ▼
//!   reserved                 available
//! ```
//!
//! Every other (status, event) pair is a [`TransitionError`]. The check runs
//! locally, before any request is sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AppError, ErrorCode};
pub use crate::models::TableStatus;

/// Something that happened to a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableEvent {
    /// An order was added to the table
    OrderAdded,
    /// The table's orders were billed
    BillCreated,
    /// Staff toggled the reservation flag
    ToggleReservation,
}

impl fmt::Display for TableEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OrderAdded => "order_added",
            Self::BillCreated => "bill_created",
            Self::ToggleReservation => "toggle_reservation",
        })
    }
}

/// Rejected transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot apply {event} to a table that is {from}")]
pub struct TransitionError {
    pub from: TableStatus,
    pub event: TableEvent,
}

impl TransitionError {
    /// Message shown to staff
    pub fn user_message(&self) -> &'static str {
        match (self.from, self.event) {
            (TableStatus::Reserved, TableEvent::OrderAdded) => {
                "Bàn đã được đặt trước. Vui lòng hủy đặt bàn trước khi gọi món."
            }
            (_, TableEvent::BillCreated) => "Bàn chưa có món nào để thanh toán",
            (TableStatus::Occupied, TableEvent::ToggleReservation) => {
                "Không thể đặt trước bàn đang có khách"
            }
            _ => ErrorCode::InvalidTableTransition.message(),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::with_message(ErrorCode::InvalidTableTransition, err.user_message())
            .with_detail("from", err.from.as_str())
            .with_detail("event", err.event.to_string())
    }
}

impl TableStatus {
    /// Next status after `event`
    pub fn apply(self, event: TableEvent) -> Result<TableStatus, TransitionError> {
        use TableEvent::*;
        use TableStatus::*;

        match (self, event) {
            (Available, OrderAdded) | (Occupied, OrderAdded) => Ok(Occupied),
            (Occupied, BillCreated) => Ok(Available),
            (Available, ToggleReservation) => Ok(Reserved),
            (Reserved, ToggleReservation) => Ok(Available),
            (from, event) => Err(TransitionError { from, event }),
        }
    }

    /// Whether `event` is allowed from this status
    pub fn accepts(self, event: TableEvent) -> bool {
        self.apply(event).is_ok()
    }
}
