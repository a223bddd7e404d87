//! Table board: the table list plus the order and bill workflow
//!
//! Every status change is checked with [`TableStatus::apply`] before a request
//! goes out. The order POST and the status PATCH that follows it are separate
//! requests; if the PATCH fails the order is still recorded, and the outcome
//! says so.

use std::sync::Arc;

use shared::cart::OrderCart;
use shared::models::{BillCustomer, DiningTable, NewTable, TableOrder, TableStatus};
use shared::table::TableEvent;

use crate::ClientResult;
use crate::filters::TableFilter;
use crate::http::HttpClient;
use crate::services::billing::TableBillOutcome;
use crate::services::{BillingService, TableService};

/// Result of adding a cart to a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOrderOutcome {
    pub table_id: i64,
    /// The order was recorded by the backend
    pub order_added: bool,
    /// The table is marked occupied on the backend (already was, or the
    /// follow-up update succeeded)
    pub status_updated: bool,
    /// Why the follow-up status update failed
    pub status_error: Option<String>,
}

impl AddOrderOutcome {
    /// Order recorded but the table status lags behind
    pub fn is_partial(&self) -> bool {
        self.order_added && !self.status_updated
    }
}

/// Tables of the current filter, the selected table and its orders
pub struct TableBoard<C> {
    tables: TableService<C>,
    billing: BillingService<C>,
    filter: TableFilter,
    list: Vec<DiningTable>,
    selected: Option<i64>,
    orders: Vec<TableOrder>,
}

impl<C: HttpClient> TableBoard<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self {
            tables: TableService::new(Arc::clone(&http)),
            billing: BillingService::new(http),
            filter: TableFilter::default(),
            list: Vec::new(),
            selected: None,
            orders: Vec::new(),
        }
    }

    pub fn tables(&self) -> &[DiningTable] {
        &self.list
    }

    pub fn filter(&self) -> TableFilter {
        self.filter
    }

    pub fn table(&self, id: i64) -> Option<&DiningTable> {
        self.list.iter().find(|t| t.id == id)
    }

    pub fn selected(&self) -> Option<&DiningTable> {
        self.selected.and_then(|id| self.table(id))
    }

    /// Orders of the selected table, as last loaded
    pub fn orders(&self) -> &[TableOrder] {
        &self.orders
    }

    /// Tables on `floor` (0-based), in list order
    pub fn tables_on_floor(&self, floor: i32) -> Vec<&DiningTable> {
        self.list.iter().filter(|t| t.floor == floor).collect()
    }

    /// Distinct floors, ascending
    pub fn floors(&self) -> Vec<i32> {
        let mut floors: Vec<i32> = self.list.iter().map(|t| t.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    /// Reload the list with a new filter
    pub async fn refresh(&mut self, filter: TableFilter) -> ClientResult<&[DiningTable]> {
        self.list = self.tables.list(&filter).await?;
        self.filter = filter;
        tracing::debug!(count = self.list.len(), "Tables loaded");
        Ok(&self.list)
    }

    /// Reload after a mutation; a failure keeps the local list
    async fn reload(&mut self) {
        match self.tables.list(&self.filter).await {
            Ok(list) => self.list = list,
            Err(e) => tracing::warn!(error = %e, "Could not reload tables, keeping local state"),
        }
    }

    /// Select a table and load its orders
    pub async fn load_orders(&mut self, table_id: i64) -> ClientResult<&[TableOrder]> {
        let orders = self.tables.orders(table_id).await?;
        self.selected = Some(table_id);
        self.orders = orders;
        Ok(&self.orders)
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.orders.clear();
    }

    pub async fn add_table(&mut self, table: &NewTable) -> ClientResult<DiningTable> {
        let created = self.tables.create(table).await?;
        self.list.push(created.clone());
        self.reload().await;
        Ok(created)
    }

    pub async fn remove_table(&mut self, table_id: i64) -> ClientResult<()> {
        self.tables.delete(table_id).await?;
        self.list.retain(|t| t.id != table_id);
        if self.selected == Some(table_id) {
            self.clear_selection();
        }
        self.reload().await;
        Ok(())
    }

    /// Status from the local list, or from the backend for an unknown table
    async fn status_of(&self, table_id: i64) -> ClientResult<TableStatus> {
        match self.table(table_id) {
            Some(table) => Ok(table.status),
            None => Ok(self.tables.get(table_id).await?.status),
        }
    }

    fn set_local_status(&mut self, table_id: i64, status: TableStatus) {
        if let Some(table) = self.list.iter_mut().find(|t| t.id == table_id) {
            table.status = status;
        }
    }

    /// Send the cart as an order, then mark the table occupied
    ///
    /// The cart is cleared once the order is recorded, even if the status
    /// update fails afterwards.
    pub async fn add_items(
        &mut self,
        table_id: i64,
        cart: &mut OrderCart,
    ) -> ClientResult<AddOrderOutcome> {
        let lines = cart.to_order_lines()?;
        let from = self.status_of(table_id).await?;
        let to = from.apply(TableEvent::OrderAdded)?;

        self.tables.add_order(table_id, lines).await?;
        cart.clear();

        let mut outcome = AddOrderOutcome {
            table_id,
            order_added: true,
            status_updated: true,
            status_error: None,
        };
        if from != to {
            match self.tables.update_status(table_id, to).await {
                Ok(_) => self.set_local_status(table_id, to),
                Err(e) => {
                    tracing::warn!(
                        table_id,
                        error = %e,
                        "Order saved but table status was not updated"
                    );
                    outcome.status_updated = false;
                    outcome.status_error = Some(e.user_message());
                }
            }
        }

        self.reload().await;
        if self.selected == Some(table_id) {
            if let Err(e) = self.load_orders(table_id).await {
                tracing::warn!(table_id, error = %e, "Could not reload table orders");
            }
        }
        Ok(outcome)
    }

    /// available ↔ reserved
    pub async fn toggle_reservation(&mut self, table_id: i64) -> ClientResult<TableStatus> {
        let from = self.status_of(table_id).await?;
        let to = from.apply(TableEvent::ToggleReservation)?;
        self.tables.update_status(table_id, to).await?;
        self.set_local_status(table_id, to);
        self.reload().await;
        Ok(to)
    }

    /// Bill the table's orders; the table becomes available
    pub async fn create_bill(
        &mut self,
        table_id: i64,
        customer: BillCustomer,
    ) -> ClientResult<TableBillOutcome> {
        let from = self.status_of(table_id).await?;
        let to = from.apply(TableEvent::BillCreated)?;

        let outcome = self.billing.create_from_table(table_id, &customer).await?;
        let status = outcome.receipt.table_status_new.unwrap_or(to);
        self.set_local_status(table_id, status);
        if self.selected == Some(table_id) {
            self.orders.clear();
        }
        self.reload().await;
        Ok(outcome)
    }
}
