//! Customer Model

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::validation;

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub loyalty_points: Decimal,
    #[serde(default)]
    pub total_spent: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Customer {
    pub fn tier(&self) -> LoyaltyTier {
        LoyaltyTier::from_points(self.loyalty_points)
    }
}

/// Create/update customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CustomerInput {
    #[validate(custom(function = "validation::person_name"))]
    pub name: String,
    #[validate(custom(function = "validation::phone_number"))]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(email(message = "Email không hợp lệ"))]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validation::non_negative_points"))]
    pub loyalty_points: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(custom(function = "validation::non_negative_spent"))]
    pub total_spent: Option<Decimal>,
}

impl CustomerInput {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    /// Trimmed copy; the phone loses inner whitespace
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.chars().filter(|c| !c.is_whitespace()).collect(),
            email: crate::util::non_blank(self.email.as_deref()),
            ..self.clone()
        }
    }
}

/// Loyalty tier by accumulated points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    #[serde(rename = "VIP")]
    Vip,
}

impl LoyaltyTier {
    pub fn from_points(points: Decimal) -> Self {
        if points >= Decimal::from(200) {
            Self::Vip
        } else if points >= Decimal::from(100) {
            Self::Gold
        } else if points >= Decimal::from(50) {
            Self::Silver
        } else {
            Self::Bronze
        }
    }

    /// Segment label used by the analytics endpoint
    pub fn segment_label(&self) -> &'static str {
        match self {
            Self::Vip => "VIP (200+ điểm)",
            Self::Gold => "Gold (100-199 điểm)",
            Self::Silver => "Silver (50-99 điểm)",
            Self::Bronze => "Bronze (0-49 điểm)",
        }
    }
}

impl fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vip => "VIP",
            Self::Gold => "Gold",
            Self::Silver => "Silver",
            Self::Bronze => "Bronze",
        })
    }
}

/// One loyalty history entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyEntry {
    #[serde(default)]
    pub points: Decimal,
    #[serde(default, alias = "reason")]
    pub description: Option<String>,
    #[serde(default)]
    pub bill_id: Option<i64>,
    #[serde(default, alias = "date")]
    pub created_at: Option<String>,
}

/// `GET /customers/{id}/loyalty_history/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyHistory {
    #[serde(default)]
    pub history: Vec<LoyaltyEntry>,
    #[serde(default)]
    pub total_points: Decimal,
    /// Set when the backend has no history endpoint configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LoyaltyHistory {
    /// Empty history returned when the endpoint is not available
    pub fn unavailable() -> Self {
        Self {
            message: Some(crate::error::ErrorCode::LoyaltyHistoryUnavailable.message().to_string()),
            ..Default::default()
        }
    }
}

/// `POST /customers/{id}/loyalty_points/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoyaltyPointsAdjustment {
    pub points: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `POST /customers/{id}/notifications/` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerNotification {
    pub title: String,
    pub message: String,
    #[serde(default = "default_channel")]
    pub channel: String,
}

fn default_channel() -> String {
    "sms".to_string()
}

/// Segment of the customer analytics
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerSegment {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: String,
}

/// `GET /customers/analytics/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CustomerAnalytics {
    #[serde(default)]
    pub segments: BTreeMap<String, CustomerSegment>,
    #[serde(default)]
    pub top_customers: Vec<Customer>,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub avg_order_value: Decimal,
}

impl CustomerAnalytics {
    /// Segment counts computed locally from a customer list
    pub fn from_customers(customers: &[Customer]) -> Self {
        let total = customers.len() as u64;
        let mut counts: BTreeMap<LoyaltyTier, u64> = BTreeMap::new();
        for customer in customers {
            *counts.entry(customer.tier()).or_default() += 1;
        }

        let segments = [
            LoyaltyTier::Vip,
            LoyaltyTier::Gold,
            LoyaltyTier::Silver,
            LoyaltyTier::Bronze,
        ]
        .into_iter()
        .map(|tier| {
            let count = counts.get(&tier).copied().unwrap_or(0);
            let percentage = if total == 0 {
                0
            } else {
                (count * 100 + total / 2) / total
            };
            (
                tier.segment_label().to_string(),
                CustomerSegment {
                    count,
                    percentage: format!("{}%", percentage),
                },
            )
        })
        .collect();

        let total_revenue: Decimal = customers.iter().map(|c| c.total_spent).sum();
        let mut top_customers = customers.to_vec();
        top_customers.sort_by(|a, b| b.total_spent.cmp(&a.total_spent));
        top_customers.truncate(5);

        Self {
            segments,
            top_customers,
            total_revenue,
            avg_order_value: Decimal::ZERO,
        }
    }
}
