//! Dining tables and their orders

use std::sync::Arc;

use chrono::NaiveDate;
use http::StatusCode;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AddOrderRequest, CreateTableBillRequest, DiningTable, NewTable, OrderLine, TableBillReceipt,
    TableOrder, TableStatus, TableStatusUpdate,
};
use shared::response::ListResponse;

use super::item_path;
use crate::ClientResult;
use crate::filters::TableFilter;
use crate::http::HttpClient;

pub struct TableService<C> {
    http: Arc<C>,
}

service!(TableService);

impl<C: HttpClient> TableService<C> {
    pub async fn list(&self, filter: &TableFilter) -> ClientResult<Vec<DiningTable>> {
        let tables: ListResponse<DiningTable> =
            self.http.get_query("tables/", filter.to_query()).await?;
        Ok(tables.into_vec())
    }

    pub async fn get(&self, id: i64) -> ClientResult<DiningTable> {
        self.http
            .get(&item_path("tables", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound))
    }

    /// Orders accumulated on the table since its last bill
    pub async fn orders(&self, id: i64) -> ClientResult<Vec<TableOrder>> {
        let orders: ListResponse<TableOrder> = self
            .http
            .get(&item_path("tables", id, Some("orders")))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound))?;
        Ok(orders.into_vec())
    }

    pub async fn create(&self, table: &NewTable) -> ClientResult<DiningTable> {
        let created: DiningTable = self.http.post("tables/", table).await?;
        tracing::info!(table_id = created.id, name = %created.name, "Table created");
        Ok(created)
    }

    /// Delete a table; the backend refuses (403) while it has guests
    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("tables", id, None))
            .await
            .map_err(|e| {
                e.remap(StatusCode::FORBIDDEN, ErrorCode::TableOccupied)
                    .remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound)
            })?;
        tracing::info!(table_id = id, "Table deleted");
        Ok(())
    }

    pub async fn update_status(&self, id: i64, status: TableStatus) -> ClientResult<DiningTable> {
        let table: DiningTable = self
            .http
            .patch(&item_path("tables", id, None), &TableStatusUpdate { status })
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound))?;
        tracing::info!(table_id = id, status = %status, "Table status updated");
        Ok(table)
    }

    /// Record order lines against the table
    ///
    /// Does not touch the table status; see
    /// [`TableBoard::add_items`](crate::workflow::TableBoard::add_items).
    pub async fn add_order(&self, id: i64, items: Vec<OrderLine>) -> ClientResult<Value> {
        if items.is_empty() {
            return Err(AppError::new(ErrorCode::EmptySelection).into());
        }
        let count = items.len();
        let response: Value = self
            .http
            .post(
                &item_path("tables", id, Some("add_order")),
                &AddOrderRequest { items },
            )
            .await
            .map_err(|e| {
                e.remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound)
                    .remap(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::OrderAddFailed)
            })?;
        tracing::info!(table_id = id, lines = count, "Order added to table");
        Ok(response)
    }

    /// Turn the table's orders into a bill dated `date`
    pub async fn create_bill(&self, id: i64, date: NaiveDate) -> ClientResult<TableBillReceipt> {
        let receipt: TableBillReceipt = self
            .http
            .post(
                &item_path("tables", id, Some("create_bill")),
                &CreateTableBillRequest { date },
            )
            .await
            .map_err(|e| {
                e.remap(StatusCode::NOT_FOUND, ErrorCode::TableNotFound)
                    .remap(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::BillCreateFailed)
            })?;
        tracing::info!(
            table_id = id,
            bill_id = receipt.bill_id,
            total = %receipt.total_amount,
            "Bill created from table"
        );
        Ok(receipt)
    }
}
