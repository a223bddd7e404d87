//! Dashboard aggregates

use std::collections::HashMap;

use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};

use super::{Bill, MenuCategory, MenuItem, MonthlyRevenue, Staff};
use crate::util::normalize_name;

/// `GET /dashboard/statistics` response
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStatistics {
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub average_order_value: Decimal,
    #[serde(default)]
    pub total_salaries: Decimal,
    #[serde(default)]
    pub customer_count: u64,
    #[serde(default)]
    pub menu_count: u64,
    #[serde(default)]
    pub staff_count: u64,
    #[serde(default)]
    pub monthly_data: MonthlyRevenue,
}

/// Best-selling item with its share of units sold in its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PopularItem {
    pub name: String,
    pub sold: u64,
    /// Share of units sold within the category, in percent
    pub value: u32,
}

/// Top food and drink items
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PopularItems {
    pub food: Vec<PopularItem>,
    pub drinks: Vec<PopularItem>,
}

/// Rank items sold across `bills`, per menu category
///
/// Bill lines are matched to the menu by id, then by normalized name; lines
/// that match nothing count as food.
pub fn popular_items(bills: &[Bill], menu: &[MenuItem], limit: usize) -> PopularItems {
    let by_id: HashMap<i64, &MenuItem> = menu.iter().map(|m| (m.id, m)).collect();
    let by_name: HashMap<String, &MenuItem> =
        menu.iter().map(|m| (normalize_name(&m.name), m)).collect();

    // normalized name -> (display name, category, units, first-seen order)
    let mut sold: HashMap<String, (String, MenuCategory, u64, usize)> = HashMap::new();
    for item in bills.iter().flat_map(|b| b.items.iter()) {
        let key = normalize_name(&item.item_name);
        let menu_item = by_id
            .get(&item.menu_item_id)
            .or_else(|| by_name.get(&key))
            .copied();
        let category = menu_item.map(|m| m.category).unwrap_or_default();
        let display = menu_item
            .map(|m| m.name.clone())
            .unwrap_or_else(|| item.item_name.trim().to_string());
        let order = sold.len();
        let entry = sold.entry(key).or_insert((display, category, 0, order));
        entry.2 += u64::from(item.quantity);
    }

    let rank = |category: MenuCategory| -> Vec<PopularItem> {
        let mut rows: Vec<_> = sold.values().filter(|(_, c, _, _)| *c == category).collect();
        let total: u64 = rows.iter().map(|(_, _, n, _)| *n).sum();
        rows.sort_by(|a, b| b.2.cmp(&a.2).then(a.3.cmp(&b.3)));
        rows.into_iter()
            .take(limit)
            .map(|(name, _, n, _)| PopularItem {
                name: name.clone(),
                sold: *n,
                value: if total == 0 {
                    0
                } else {
                    ((n * 100 + total / 2) / total) as u32
                },
            })
            .collect()
    };

    PopularItems {
        food: rank(MenuCategory::Food),
        drinks: rank(MenuCategory::Drink),
    }
}

/// Figures shown on the dashboard cards
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_orders: u64,
    pub average_order_value: Decimal,
    pub monthly_revenue: Decimal,
    pub total_salaries: Decimal,
}

impl DashboardSummary {
    /// Combine the bill list, payroll and the revenue of `month` (1-based)
    ///
    /// `total_orders` is the server-side bill count; the average is taken
    /// over the bills actually fetched and rounded to whole đồng.
    pub fn compute(
        bill_count: u64,
        bills: &[Bill],
        staff: &[Staff],
        revenue: &MonthlyRevenue,
        month: u32,
    ) -> Self {
        let fetched: Decimal = bills.iter().map(|b| b.total).sum();
        let average_order_value = if bill_count == 0 {
            Decimal::ZERO
        } else {
            (fetched / Decimal::from(bill_count))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        };
        Self {
            total_orders: bill_count,
            average_order_value,
            monthly_revenue: revenue.month(month),
            total_salaries: super::total_salaries(staff),
        }
    }
}
