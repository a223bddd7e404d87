//! Reservations

use std::sync::Arc;

use http::StatusCode;
use shared::error::ErrorCode;
use shared::models::{Reservation, ReservationInput};
use shared::response::{ListResponse, Page, PageRequest};

use super::item_path;
use crate::ClientResult;
use crate::http::HttpClient;

/// Reservations shown per page
pub const RESERVATION_PAGE_SIZE: u32 = 6;

pub struct ReservationService<C> {
    http: Arc<C>,
}

service!(ReservationService);

impl<C: HttpClient> ReservationService<C> {
    pub async fn list(&self, page: PageRequest) -> ClientResult<Page<Reservation>> {
        let query = vec![
            ("page".to_string(), page.page.to_string()),
            ("limit".to_string(), page.limit.to_string()),
        ];
        let reservations: ListResponse<Reservation> =
            self.http.get_query("reservations/", query).await?;
        Ok(reservations.into())
    }

    /// First page at the default page size
    pub async fn recent(&self) -> ClientResult<Page<Reservation>> {
        self.list(PageRequest::new(1, RESERVATION_PAGE_SIZE)).await
    }

    pub async fn create(&self, input: &ReservationInput) -> ClientResult<Reservation> {
        let created: Reservation = self.http.post("reservations/", input).await?;
        tracing::info!(reservation_id = created.id, date = %created.date, "Reservation created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, input: &ReservationInput) -> ClientResult<Reservation> {
        self.http
            .put(&item_path("reservations", id, None), input)
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::ReservationNotFound))
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("reservations", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::ReservationNotFound))?;
        tracing::info!(reservation_id = id, "Reservation deleted");
        Ok(())
    }
}
