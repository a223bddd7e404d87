//! Order selection cart
//!
//! The list of menu items being ordered for a table before it is sent with
//! `add_order`. Lines are kept in insertion order. Adding an item that is
//! already in the cart increments its quantity instead of adding a line.
//!
//! Which lines count as "the same item" depends on [`MergePolicy`]:
//! under [`MergePolicy::ByName`] (the default) a line matches when it has the
//! same menu item id *or* the same normalized name, so two menu entries
//! spelled `"Phở bò"` and `" phở BÒ"` collapse into one line.
//!
//! ```
//! use rust_decimal::Decimal;
//! use shared::cart::{CartLine, OrderCart};
//!
//! let mut cart = OrderCart::new();
//! cart.add(CartLine::new(1, "Phở bò", Decimal::from(45000)));
//! cart.add(CartLine::new(2, " phở BÒ ", Decimal::from(45000)));
//! assert_eq!(cart.lines().len(), 1);
//! assert_eq!(cart.total(), Decimal::from(90000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult, ErrorCode};
use crate::models::{MenuItem, OrderLine, TableOrder};
use crate::money::line_total;
pub use crate::util::normalize_name;

/// How cart lines are matched when an item is added
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergePolicy {
    /// Same menu item id or same normalized name
    #[default]
    ByName,
    /// Same menu item id only
    ById,
}

impl MergePolicy {
    fn matches(&self, line: &CartLine, menu_item_id: i64, key: &str) -> bool {
        match self {
            Self::ByName => line.menu_item_id == menu_item_id || line.key() == key,
            Self::ById => line.menu_item_id == menu_item_id,
        }
    }
}

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    /// A line with quantity 1
    pub fn new(menu_item_id: i64, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            menu_item_id,
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    pub fn subtotal(&self) -> Decimal {
        line_total(self.price, self.quantity)
    }

    fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

impl From<&MenuItem> for CartLine {
    fn from(item: &MenuItem) -> Self {
        Self::new(item.id, item.name.clone(), item.price)
    }
}

impl From<&TableOrder> for CartLine {
    fn from(order: &TableOrder) -> Self {
        Self {
            menu_item_id: order.menu_item,
            name: order.name.clone(),
            price: order.price,
            quantity: order.quantity,
        }
    }
}

impl From<CartLine> for OrderLine {
    fn from(line: CartLine) -> Self {
        Self {
            menu_item_id: line.menu_item_id,
            name: line.name,
            quantity: line.quantity,
            price: line.price,
        }
    }
}

/// In-memory selection of menu items for one table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCart {
    lines: Vec<CartLine>,
    policy: MergePolicy,
}

impl OrderCart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MergePolicy) -> Self {
        Self {
            lines: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Cart pre-filled with a table's recorded orders, merged by name
    pub fn from_table_orders(orders: &[TableOrder]) -> Self {
        Self {
            lines: merge_by_name(orders.iter().map(CartLine::from)),
            policy: MergePolicy::ByName,
        }
    }

    /// Add one unit of `item`
    pub fn add(&mut self, item: impl Into<CartLine>) {
        let mut line = item.into();
        line.quantity = 1;
        self.push(line);
    }

    /// Add `quantity` units of `item`
    pub fn add_with_quantity(&mut self, item: impl Into<CartLine>, quantity: u32) -> AppResult<()> {
        if quantity == 0 {
            return Err(AppError::new(ErrorCode::InvalidQuantity).with_detail("quantity", quantity));
        }
        let mut line = item.into();
        line.quantity = quantity;
        self.push(line);
        Ok(())
    }

    fn push(&mut self, line: CartLine) {
        let key = line.key();
        let policy = self.policy;
        match self
            .lines
            .iter_mut()
            .find(|l| policy.matches(l, line.menu_item_id, &key))
        {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Remove the line for `menu_item_id`; returns it if present
    pub fn remove(&mut self, menu_item_id: i64) -> Option<CartLine> {
        let pos = self.lines.iter().position(|l| l.menu_item_id == menu_item_id)?;
        Some(self.lines.remove(pos))
    }

    /// Set the quantity of a line; zero or less removes it
    ///
    /// Returns `false` when no line has this id.
    pub fn set_quantity(&mut self, menu_item_id: i64, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove(menu_item_id).is_some();
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.lines.iter_mut().find(|l| l.menu_item_id == menu_item_id) {
            Some(line) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Σ price × quantity
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Σ quantity, capped at `u32::MAX`
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |n, l| n.saturating_add(l.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// `add_order` payload
    ///
    /// Under [`MergePolicy::ByName`] lines are merged by name one last time;
    /// under [`MergePolicy::ById`] they are already unique by id.
    pub fn to_order_lines(&self) -> AppResult<Vec<OrderLine>> {
        if self.is_empty() {
            return Err(AppError::new(ErrorCode::EmptySelection));
        }
        let lines = match self.policy {
            MergePolicy::ByName => merge_by_name(self.lines.iter().cloned()),
            MergePolicy::ById => self.lines.clone(),
        };
        Ok(lines.into_iter().map(OrderLine::from).collect())
    }
}

/// Merge lines by normalized name
///
/// The first occurrence keeps its id, name and price; quantities are summed.
/// Output order is the order of first occurrence.
pub fn merge_by_name(lines: impl IntoIterator<Item = CartLine>) -> Vec<CartLine> {
    let mut merged: Vec<CartLine> = Vec::new();
    for line in lines {
        let key = line.key();
        match merged.iter_mut().find(|l| l.key() == key) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => merged.push(line),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: i64, name: &str, price: i64) -> CartLine {
        CartLine::new(id, name, Decimal::from(price))
    }

    #[test]
    fn test_add_same_name_merges() {
        let mut cart = OrderCart::new();
        cart.add(line(1, "Phở bò", 45000));
        cart.add(line(7, "  PHỞ BÒ", 50000));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.lines()[0].menu_item_id, 1);
        assert_eq!(cart.lines()[0].price, Decimal::from(45000));
    }

    #[test]
    fn test_add_same_id_merges() {
        let mut cart = OrderCart::new();
        cart.add(line(3, "Trà đá", 5000));
        cart.add(line(3, "Trà đá (ly lớn)", 5000));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_by_id_policy_keeps_same_names_apart() {
        let mut cart = OrderCart::with_policy(MergePolicy::ById);
        cart.add(line(1, "Cà phê", 20000));
        cart.add(line(2, "cà phê", 25000));
        cart.add(line(1, "Cà phê", 20000));
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 2);
        assert_eq!(cart.total(), Decimal::from(65000));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = OrderCart::new();
        cart.add(line(2, "Bún chả", 40000));
        cart.add(line(1, "Nem rán", 30000));
        cart.add(line(2, "Bún chả", 40000));
        let names: Vec<_> = cart.lines().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Bún chả", "Nem rán"]);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = OrderCart::new();
        cart.add(line(1, "Phở", 45000));
        cart.add(line(2, "Trà", 5000));
        assert!(cart.set_quantity(1, 0));
        assert_eq!(cart.lines().len(), 1);
        assert!(cart.set_quantity(2, -3));
        assert!(cart.is_empty());
        assert!(!cart.set_quantity(9, 4));
    }

    #[test]
    fn test_set_quantity_and_remove() {
        let mut cart = OrderCart::new();
        cart.add(line(1, "Phở", 45000));
        assert!(cart.set_quantity(1, 4));
        assert_eq!(cart.item_count(), 4);
        let removed = cart.remove(1).unwrap();
        assert_eq!(removed.quantity, 4);
        assert!(cart.remove(1).is_none());
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let prices = [45000i64, 5000, 32500, 120000, 1];
        let quantities = [3u32, 1, 7, 2, 999];
        let mut cart = OrderCart::new();
        let mut expected = Decimal::ZERO;
        for (i, (price, qty)) in prices.iter().zip(quantities).enumerate() {
            let id = i as i64 + 1;
            cart.add_with_quantity(line(id, &format!("Món {}", id), *price), qty)
                .unwrap();
            expected += Decimal::from(*price) * Decimal::from(qty);
        }
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.item_count(), quantities.iter().sum::<u32>());

        let mut fractional = OrderCart::new();
        fractional
            .add_with_quantity(CartLine::new(1, "a", Decimal::new(1, 1)), 3)
            .unwrap();
        assert_eq!(fractional.total(), Decimal::new(3, 1));
    }

    #[test]
    fn test_add_with_zero_quantity_rejected() {
        let mut cart = OrderCart::new();
        let err = cart.add_with_quantity(line(1, "Phở", 1), 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidQuantity);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantities_saturate() {
        let mut cart = OrderCart::new();
        cart.add_with_quantity(line(1, "Phở bò", 45000), u32::MAX).unwrap();
        cart.add_with_quantity(line(1, "Phở bò", 45000), u32::MAX).unwrap();
        assert_eq!(cart.lines()[0].quantity, u32::MAX);

        cart.add_with_quantity(line(2, "Trà đá", 5000), 3).unwrap();
        assert_eq!(cart.item_count(), u32::MAX);

        let mut full = line(9, "phở bò", 45000);
        full.quantity = u32::MAX;
        let merged = merge_by_name([full.clone(), full]);
        assert_eq!(merged[0].quantity, u32::MAX);
    }

    #[test]
    fn test_to_order_lines() {
        let mut by_name = OrderCart::new();
        by_name.add(line(1, "Cơm", 35000));
        by_name.add_with_quantity(line(1, "Cơm", 35000), 2).unwrap();
        let lines = by_name.to_order_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].menu_item_id, 1);

        let mut cart = OrderCart::with_policy(MergePolicy::ById);
        cart.add(line(1, "Cơm", 35000));
        cart.add(line(2, " cơm ", 35000));
        let lines = cart.to_order_lines().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].menu_item_id, 2);

        cart.clear();
        let err = cart.to_order_lines().unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptySelection);
    }

    #[test]
    fn test_from_table_orders() {
        let orders = vec![
            TableOrder {
                id: Some(1),
                menu_item: 4,
                name: "Lẩu thái".into(),
                price: Decimal::from(250000),
                quantity: 1,
            },
            TableOrder {
                id: Some(2),
                menu_item: 4,
                name: "lẩu thái".into(),
                price: Decimal::from(250000),
                quantity: 2,
            },
        ];
        let cart = OrderCart::from_table_orders(&orders);
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.total(), Decimal::from(750000));
    }

    #[test]
    fn test_merge_by_name_first_wins() {
        let merged = merge_by_name(vec![
            line(1, "Gỏi cuốn", 30000),
            line(2, "Chả giò", 35000),
            line(3, "GỎI CUỐN ", 32000),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].menu_item_id, 1);
        assert_eq!(merged[0].price, Decimal::from(30000));
        assert_eq!(merged[0].quantity, 2);
    }
}
