//! Reservation Model

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    pub id: i64,
    pub customer_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default = "default_guests")]
    pub guests: u32,
    #[serde(default)]
    pub table: Option<i64>,
    #[serde(default)]
    pub note: Option<String>,
}

fn default_guests() -> u32 {
    1
}

/// Create/update reservation payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReservationInput {
    pub customer_name: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub guests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_time_formats() {
        let r: Reservation = serde_json::from_str(
            r#"{"id": 1, "customer_name": "Chị Hoa", "date": "2024-06-01", "time": "19:30:00", "guests": 4}"#,
        )
        .unwrap();
        assert_eq!(r.time, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(r.guests, 4);
        assert!(r.table.is_none());
    }
}
