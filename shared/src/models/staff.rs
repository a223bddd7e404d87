//! Staff Model

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Staff role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Manager,
    Cashier,
    Chef,
    #[default]
    Waiter,
    Janitor,
}

impl StaffRole {
    pub const ALL: [StaffRole; 5] = [
        Self::Manager,
        Self::Cashier,
        Self::Chef,
        Self::Waiter,
        Self::Janitor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Cashier => "cashier",
            Self::Chef => "chef",
            Self::Waiter => "waiter",
            Self::Janitor => "janitor",
        }
    }

    /// Vietnamese display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Manager => "Quản lý",
            Self::Cashier => "Thu ngân",
            Self::Chef => "Đầu bếp",
            Self::Waiter => "Phục vụ",
            Self::Janitor => "Vệ sinh",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown staff role: {}", s))
    }
}

/// Staff entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Staff {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    pub role: StaffRole,
    #[serde(default)]
    pub role_display: Option<String>,
    pub salary: Decimal,
    pub hire_date: NaiveDate,
}

impl Staff {
    /// Backend label when provided, otherwise the built-in one
    pub fn role_label(&self) -> &str {
        self.role_display
            .as_deref()
            .unwrap_or_else(|| self.role.display_name())
    }
}

/// Create/update staff payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StaffInput {
    #[validate(custom(function = "validation::staff_name"))]
    pub name: String,
    #[validate(custom(function = "validation::staff_phone"))]
    pub phone: String,
    pub role: StaffRole,
    #[validate(custom(function = "validation::salary"))]
    pub salary: Decimal,
    pub hire_date: NaiveDate,
}

impl From<&Staff> for StaffInput {
    fn from(staff: &Staff) -> Self {
        Self {
            name: staff.name.clone(),
            phone: staff.phone.clone(),
            role: staff.role,
            salary: staff.salary,
            hire_date: staff.hire_date,
        }
    }
}

/// Total monthly payroll
pub fn total_salaries(staff: &[Staff]) -> Decimal {
    staff.iter().map(|s| s.salary).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    #[test]
    fn test_role_display() {
        assert_eq!(StaffRole::Chef.display_name(), "Đầu bếp");
        assert_eq!("CASHIER".parse::<StaffRole>(), Ok(StaffRole::Cashier));
        assert!("barista".parse::<StaffRole>().is_err());
    }

    #[test]
    fn test_staff_from_json() {
        let staff: Staff = serde_json::from_str(
            r#"{"id": 2, "name": "Trần B", "phone": "0912345678", "role": "cashier",
                "salary": "8500000", "hire_date": "2022-08-15"}"#,
        )
        .unwrap();
        assert_eq!(staff.role_label(), "Thu ngân");
        assert_eq!(staff.salary, Decimal::from(8_500_000));
        assert_eq!(total_salaries(&[staff.clone(), staff]), Decimal::from(17_000_000));
    }

    #[test]
    fn test_staff_input_validation() {
        let mut input = StaffInput {
            name: "Lê C".into(),
            phone: "+84 901 234 567".into(),
            role: StaffRole::Chef,
            salary: Decimal::from(10_000_000),
            hire_date: NaiveDate::from_ymd_opt(2021, 11, 5).unwrap(),
        };
        assert!(check(&input).is_ok());

        input.salary = Decimal::from(500_000);
        input.name = " ".into();
        let err = check(&input).unwrap_err();
        let details = err.details.unwrap();
        assert_eq!(details["salary"], "Lương phải ít nhất 1,000,000 VNĐ");
        assert_eq!(details["name"], "Tên nhân viên không được để trống");
    }
}
