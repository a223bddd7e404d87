//! Menu items

use std::sync::Arc;
use std::time::Duration;

use http::StatusCode;
use reqwest::Method;
use shared::error::ErrorCode;
use shared::models::{AvailabilityUpdate, ImageUpload, MenuItem, MenuItemInput};
use shared::response::ListResponse;

use super::item_path;
use crate::ClientResult;
use crate::filters::MenuFilter;
use crate::http::{ApiRequest, HttpClient, MultipartBody};

/// Health check gives up after this long
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

fn form(input: &MenuItemInput, image: Option<&ImageUpload>) -> MultipartBody {
    let mut body = input
        .form_fields()
        .into_iter()
        .fold(MultipartBody::new(), |body, (name, value)| body.text(name, value));
    if let Some(image) = image {
        body = body.file("image", &image.file_name, &image.mime, image.bytes.clone());
    }
    body
}

pub struct MenuService<C> {
    http: Arc<C>,
}

service!(MenuService);

impl<C: HttpClient> MenuService<C> {
    pub async fn list(&self, filter: &MenuFilter) -> ClientResult<Vec<MenuItem>> {
        let items: ListResponse<MenuItem> = self
            .http
            .get_query("menu-items/", filter.to_query())
            .await
            .map_err(|e| e.remap(StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::MenuLoadFailed))?;
        Ok(items.into_vec())
    }

    pub async fn get(&self, id: i64) -> ClientResult<MenuItem> {
        self.http
            .get(&item_path("menu-items", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::MenuItemNotFound))
    }

    /// Create an item; sent as multipart when an image is attached
    pub async fn create(
        &self,
        input: &MenuItemInput,
        image: Option<&ImageUpload>,
    ) -> ClientResult<MenuItem> {
        input.validate()?;
        let created: MenuItem = match image {
            Some(_) => {
                self.http
                    .send_multipart(Method::POST, "menu-items/", form(input, image))
                    .await?
            }
            None => self.http.post("menu-items/", input).await?,
        };
        tracing::info!(item_id = created.id, name = %created.name, "Menu item created");
        Ok(created)
    }

    /// Replace an item; sent as multipart when an image is attached
    pub async fn update(
        &self,
        id: i64,
        input: &MenuItemInput,
        image: Option<&ImageUpload>,
    ) -> ClientResult<MenuItem> {
        input.validate()?;
        let path = item_path("menu-items", id, None);
        let result = match image {
            Some(_) => {
                self.http
                    .send_multipart(Method::PUT, &path, form(input, image))
                    .await
            }
            None => self.http.put(&path, input).await,
        };
        let updated: MenuItem =
            result.map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::MenuItemNotFound))?;
        tracing::info!(item_id = id, "Menu item updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> ClientResult<()> {
        self.http
            .delete(&item_path("menu-items", id, None))
            .await
            .map_err(|e| e.remap(StatusCode::NOT_FOUND, ErrorCode::MenuItemNotFound))?;
        tracing::info!(item_id = id, "Menu item deleted");
        Ok(())
    }

    /// Replace only the image
    pub async fn upload_image(&self, id: i64, image: &ImageUpload) -> ClientResult<MenuItem> {
        let body = MultipartBody::new().file(
            "image",
            &image.file_name,
            &image.mime,
            image.bytes.clone(),
        );
        self.http
            .send_multipart(Method::PATCH, &item_path("menu-items", id, None), body)
            .await
    }

    pub async fn set_availability(&self, id: i64, is_available: bool) -> ClientResult<MenuItem> {
        let item: MenuItem = self
            .http
            .patch(
                &item_path("menu-items", id, None),
                &AvailabilityUpdate { is_available },
            )
            .await?;
        tracing::info!(item_id = id, is_available, "Menu item availability changed");
        Ok(item)
    }

    /// Whether the backend answers `/health/` with 200; never fails
    pub async fn health(&self) -> bool {
        let request = ApiRequest::get("health/").anonymous();
        match tokio::time::timeout(HEALTH_TIMEOUT, self.http.execute(request)).await {
            Ok(Ok(response)) => response.status == StatusCode::OK,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "API health check failed");
                false
            }
            Err(_) => {
                tracing::warn!("API health check timed out");
                false
            }
        }
    }
}
