//! Bill Model

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::TableStatus;
use crate::money::line_total;
use crate::util::non_blank;

/// Spend required for one loyalty point
pub const POINTS_PER_VND: i64 = 100_000;

/// Bill line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BillItem {
    #[serde(alias = "menu_item")]
    pub menu_item_id: i64,
    #[serde(alias = "name")]
    pub item_name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl BillItem {
    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

/// Bill entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bill {
    pub id: i64,
    #[serde(default)]
    pub customer: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub items: Vec<BillItem>,
    pub total: Decimal,
    #[serde(default)]
    pub table_id: Option<i64>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub staff_name: Option<String>,
}

impl Bill {
    /// Customer name, or "walk-in guest" when absent
    pub fn customer_display(&self) -> &str {
        self.customer
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("Khách vãng lai")
    }

    /// Loyalty points this bill earns: one per 100.000 đ, rounded down
    pub fn loyalty_points_earned(&self) -> i64 {
        (self.total / Decimal::from(POINTS_PER_VND))
            .floor()
            .to_i64()
            .unwrap_or(0)
            .max(0)
    }

    /// Sum of the line subtotals
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(BillItem::subtotal).sum()
    }
}

/// Manual bill payload (`POST /bills/`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBill {
    pub customer: String,
    pub phone: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: Vec<BillItem>,
}

impl NewBill {
    /// Build a bill from its lines; `total` is computed from them
    pub fn new(
        customer: impl Into<String>,
        phone: impl Into<String>,
        date: NaiveDate,
        items: Vec<BillItem>,
    ) -> Self {
        let total = items.iter().map(BillItem::subtotal).sum();
        Self {
            customer: customer.into().trim().to_string(),
            phone: phone.into().trim().to_string(),
            date,
            total,
            items,
        }
    }
}

/// Partial bill update (`PATCH /bills/{id}/`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BillUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl BillUpdate {
    pub fn is_empty(&self) -> bool {
        self.customer.is_none() && self.phone.is_none() && self.date.is_none()
    }
}

/// Customer details attached to a bill created from a table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BillCustomer {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub date: Option<NaiveDate>,
}

impl BillCustomer {
    pub fn new(name: Option<&str>, phone: Option<&str>) -> Self {
        Self {
            name: non_blank(name),
            phone: non_blank(phone),
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Patch to apply after the bill exists, if any field is set
    pub fn as_update(&self) -> Option<BillUpdate> {
        let update = BillUpdate {
            customer: self.name.clone(),
            phone: self.phone.clone(),
            date: None,
        };
        (!update.is_empty()).then_some(update)
    }
}

/// `POST /tables/{id}/create_bill/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTableBillRequest {
    pub date: NaiveDate,
}

/// Response of `POST /tables/{id}/create_bill/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableBillReceipt {
    pub bill_id: i64,
    pub total_amount: Decimal,
    #[serde(default)]
    pub items_count: u32,
    #[serde(default)]
    pub table_status_new: Option<TableStatus>,
}

/// Revenue per month of a year, January first
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MonthlyRevenue(pub Vec<Decimal>);

impl MonthlyRevenue {
    /// Revenue of a 1-based month; missing months count as zero
    pub fn month(&self, month: u32) -> Decimal {
        month
            .checked_sub(1)
            .and_then(|i| self.0.get(i as usize))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.0.iter().copied().sum()
    }

    /// Whether any month has revenue
    pub fn has_data(&self) -> bool {
        self.0.iter().any(|v| *v > Decimal::ZERO)
    }
}
