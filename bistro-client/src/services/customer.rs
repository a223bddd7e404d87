//! Customers and loyalty

use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{
    Customer, CustomerAnalytics, CustomerInput, CustomerNotification, LoyaltyHistory,
    LoyaltyPointsAdjustment,
};
use shared::response::{ListResponse, Page};
use shared::validation;

use super::item_path;
use crate::filters::CustomerFilter;
use crate::http::HttpClient;
use crate::{ClientError, ClientResult};

/// File format of a customer export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Csv => "csv",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct CustomerService<C> {
    http: Arc<C>,
}

service!(CustomerService);

impl<C: HttpClient> CustomerService<C> {
    pub async fn list(&self, filter: &CustomerFilter) -> ClientResult<Page<Customer>> {
        let query = filter.to_query();
        tracing::debug!(params = query.len(), "Fetching customers");
        let customers: ListResponse<Customer> = self.http.get_query("customers/", query).await?;
        Ok(customers.into())
    }

    pub async fn get(&self, id: i64) -> ClientResult<Customer> {
        self.http
            .get(&item_path("customers", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::CustomerNotFound))
    }

    pub async fn create(&self, input: &CustomerInput) -> ClientResult<Customer> {
        let input = input.normalized();
        validation::check(&input)?;
        let created: Customer = self.http.post("customers/", &input).await?;
        tracing::info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, input: &CustomerInput) -> ClientResult<Customer> {
        let input = input.normalized();
        validation::check(&input)?;
        let updated: Customer = self
            .http
            .put(&item_path("customers", id, None), &input)
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::CustomerNotFound))?;
        tracing::info!(customer_id = id, "Customer updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("customers", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::CustomerNotFound))?;
        tracing::info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    /// Point history; an unconfigured endpoint (404) yields an empty history
    pub async fn loyalty_history(&self, id: i64) -> ClientResult<LoyaltyHistory> {
        match self
            .http
            .get(&item_path("customers", id, Some("loyalty_history")))
            .await
        {
            Err(ClientError::NotFound(_)) => {
                tracing::warn!(customer_id = id, "Loyalty history endpoint not available");
                Ok(LoyaltyHistory::unavailable())
            }
            other => other,
        }
    }

    /// Add (or with a negative amount, remove) loyalty points
    pub async fn adjust_points(
        &self,
        id: i64,
        adjustment: &LoyaltyPointsAdjustment,
    ) -> ClientResult<Value> {
        let response = self
            .http
            .post(&item_path("customers", id, Some("loyalty_points")), adjustment)
            .await?;
        tracing::info!(customer_id = id, points = %adjustment.points, "Loyalty points adjusted");
        Ok(response)
    }

    /// Segment analytics; an unconfigured endpoint (404) yields empty analytics
    pub async fn analytics(&self) -> ClientResult<CustomerAnalytics> {
        match self.http.get("customers/analytics/").await {
            Err(ClientError::NotFound(_)) => {
                tracing::warn!("Customer analytics endpoint not available");
                Ok(CustomerAnalytics::default())
            }
            other => other,
        }
    }

    pub async fn notify(
        &self,
        id: i64,
        notification: &CustomerNotification,
    ) -> ClientResult<Value> {
        let response = self
            .http
            .post(&item_path("customers", id, Some("notifications")), notification)
            .await?;
        tracing::info!(customer_id = id, channel = %notification.channel, "Notification sent");
        Ok(response)
    }

    /// Download the filtered customer list as a file
    pub async fn export(
        &self,
        filter: &CustomerFilter,
        format: ExportFormat,
    ) -> ClientResult<Vec<u8>> {
        let mut query = filter.to_query();
        query.retain(|(k, _)| k != "page" && k != "limit");
        query.push(("format".to_string(), format.to_string()));
        let bytes = self.http.get_bytes("customers/export/", query).await?;
        tracing::info!(bytes = bytes.len(), format = %format, "Customers exported");
        Ok(bytes)
    }
}
