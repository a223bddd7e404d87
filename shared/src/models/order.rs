//! Table order lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::line_total;

/// One line of an `add_order` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub menu_item_id: i64,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
}

impl OrderLine {
    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}

/// `POST /tables/{id}/add_order/` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddOrderRequest {
    pub items: Vec<OrderLine>,
}

/// An order already recorded against a table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableOrder {
    #[serde(default)]
    pub id: Option<i64>,
    /// Menu item id; older payloads call it `menu_item_id`
    #[serde(alias = "menu_item_id")]
    pub menu_item: i64,
    #[serde(alias = "item_name")]
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl TableOrder {
    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }
}
