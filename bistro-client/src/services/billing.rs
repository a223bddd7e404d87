//! Bills and revenue

use std::sync::Arc;

use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{Bill, BillCustomer, BillUpdate, MonthlyRevenue, NewBill, TableBillReceipt};
use shared::response::{ListResponse, Page};
use shared::util::today;

use super::{TableService, item_path};
use crate::ClientResult;
use crate::filters::BillFilter;
use crate::http::HttpClient;

/// Result of billing a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableBillOutcome {
    pub receipt: TableBillReceipt,
    /// Customer name as stored on the bill after the update
    pub customer: Option<String>,
    pub phone: Option<String>,
    /// `false` when customer details were given but could not be saved
    pub customer_updated: bool,
    pub customer_error: Option<String>,
}

impl TableBillOutcome {
    fn new(receipt: TableBillReceipt) -> Self {
        Self {
            receipt,
            customer: None,
            phone: None,
            customer_updated: false,
            customer_error: None,
        }
    }
}

pub struct BillingService<C> {
    http: Arc<C>,
}

service!(BillingService);

impl<C: HttpClient> BillingService<C> {
    pub async fn list(&self, filter: &BillFilter) -> ClientResult<Page<Bill>> {
        let bills: ListResponse<Bill> = self.http.get_query("bills/", filter.to_query()).await?;
        Ok(bills.into())
    }

    pub async fn get(&self, id: i64) -> ClientResult<Bill> {
        self.http
            .get(&item_path("bills", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::BillNotFound))
    }

    /// Create a bill by hand (not from a table)
    pub async fn create(&self, bill: &NewBill) -> ClientResult<Bill> {
        if bill.items.is_empty() {
            return Err(AppError::new(ErrorCode::EmptySelection).into());
        }
        let created: Bill = self.http.post("bills/", bill).await?;
        tracing::info!(bill_id = created.id, total = %created.total, "Bill created");
        Ok(created)
    }

    /// Bill a table's orders, then attach the customer
    ///
    /// The bill is dated today unless `customer.date` is set. A failing
    /// customer update does not fail the call: the bill exists, and the
    /// outcome says the customer was not saved.
    pub async fn create_from_table(
        &self,
        table_id: i64,
        customer: &BillCustomer,
    ) -> ClientResult<TableBillOutcome> {
        let date = customer.date.unwrap_or_else(today);
        let receipt = TableService::new(Arc::clone(&self.http))
            .create_bill(table_id, date)
            .await?;

        let mut outcome = TableBillOutcome::new(receipt);
        let Some(update) = customer.as_update() else {
            return Ok(outcome);
        };
        match self.update(outcome.receipt.bill_id, &update).await {
            Ok(bill) => {
                outcome.customer = bill.customer;
                outcome.phone = bill.phone;
                outcome.customer_updated = true;
            }
            Err(e) => {
                tracing::warn!(
                    bill_id = outcome.receipt.bill_id,
                    error = %e,
                    "Bill created but customer details were not saved"
                );
                outcome.customer_error = Some(e.user_message());
            }
        }
        Ok(outcome)
    }

    pub async fn update(&self, id: i64, update: &BillUpdate) -> ClientResult<Bill> {
        self.http
            .patch(&item_path("bills", id, None), update)
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::BillNotFound))
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("bills", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::BillNotFound))?;
        tracing::info!(bill_id = id, "Bill deleted");
        Ok(())
    }

    /// Revenue per month of `year`
    pub async fn monthly_revenue(&self, year: i32) -> ClientResult<MonthlyRevenue> {
        self.http
            .get_query(
                "bills/monthly_revenue/",
                vec![("year".to_string(), year.to_string())],
            )
            .await
    }
}
