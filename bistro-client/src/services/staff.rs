//! Staff

use std::sync::Arc;

use http::StatusCode;
use shared::error::ErrorCode;
use shared::models::{Staff, StaffInput};
use shared::response::{ListResponse, Page};
use shared::validation;

use super::item_path;
use crate::ClientResult;
use crate::filters::StaffFilter;
use crate::http::HttpClient;

pub struct StaffService<C> {
    http: Arc<C>,
}

service!(StaffService);

impl<C: HttpClient> StaffService<C> {
    /// Errors are returned as-is; no placeholder list is substituted
    pub async fn list(&self, filter: &StaffFilter) -> ClientResult<Page<Staff>> {
        let staff: ListResponse<Staff> = self.http.get_query("staff/", filter.to_query()).await?;
        Ok(staff.into())
    }

    pub async fn create(&self, input: &StaffInput) -> ClientResult<Staff> {
        validation::check(input)?;
        let created: Staff = self.http.post("staff/", input).await?;
        tracing::info!(staff_id = created.id, role = %created.role, "Staff member added");
        Ok(created)
    }

    pub async fn update(&self, id: i64, input: &StaffInput) -> ClientResult<Staff> {
        validation::check(input)?;
        let updated: Staff = self
            .http
            .put(&item_path("staff", id, None), input)
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::StaffNotFound))?;
        tracing::info!(staff_id = id, "Staff member updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("staff", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::StaffNotFound))?;
        tracing::info!(staff_id = id, "Staff member removed");
        Ok(())
    }
}
