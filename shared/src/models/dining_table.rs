//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::util::lenient_i32;

/// Table status as stored by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    /// Wire value (`available`, `occupied`, `reserved`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Reserved => "reserved",
        }
    }

    /// Label shown to staff
    pub fn label(&self) -> &'static str {
        match self {
            Self::Available => "Trống",
            Self::Occupied => "Có khách",
            Self::Reserved => "Đã đặt",
        }
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "reserved" => Ok(Self::Reserved),
            other => Err(format!("unknown table status: {}", other)),
        }
    }
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiningTable {
    pub id: i64,
    pub name: String,
    /// Floor index; some endpoints send it as a string
    #[serde(deserialize_with = "lenient_i32")]
    pub floor: i32,
    #[serde(default)]
    pub capacity: i32,
    #[serde(default)]
    pub status: TableStatus,
}

impl DiningTable {
    /// Display name of the floor (`floor` is 0-based)
    pub fn floor_name(&self) -> String {
        floor_name(self.floor)
    }
}

/// `Tầng 1` for floor 0, and so on
pub fn floor_name(floor: i32) -> String {
    format!("Tầng {}", floor + 1)
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTable {
    pub name: String,
    pub floor: i32,
    pub capacity: i32,
    pub status: TableStatus,
}

impl NewTable {
    /// A new, available table
    pub fn new(name: impl Into<String>, floor: i32, capacity: i32) -> Self {
        Self {
            name: name.into(),
            floor,
            capacity,
            status: TableStatus::Available,
        }
    }
}

/// Status update payload (`PATCH /tables/{id}/`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_floor_as_string_or_number() {
        let a: DiningTable = serde_json::from_str(
            r#"{"id": 1, "name": "Bàn 1", "floor": "1", "capacity": 4, "status": "occupied"}"#,
        )
        .unwrap();
        let b: DiningTable =
            serde_json::from_str(r#"{"id": 2, "name": "Bàn 2", "floor": 1}"#).unwrap();
        assert_eq!(a.floor, b.floor);
        assert_eq!(a.status, TableStatus::Occupied);
        assert_eq!(b.status, TableStatus::Available);
        assert_eq!(a.floor_name(), "Tầng 2");
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("Reserved".parse::<TableStatus>(), Ok(TableStatus::Reserved));
        assert!("closed".parse::<TableStatus>().is_err());
        assert_eq!(TableStatus::Occupied.to_string(), "occupied");
        let json = serde_json::to_string(&TableStatusUpdate {
            status: TableStatus::Available,
        })
        .unwrap();
        assert_eq!(json, r#"{"status":"available"}"#);
    }
}
