//! Own account: profile, password, avatar

use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use shared::client::MessageResponse;
use shared::error::AppError;
use shared::models::{ImageUpload, PasswordChange, ProfileUpdate, User};
use shared::validation;

use crate::http::{HttpClient, MultipartBody};
use crate::{ClientConfig, ClientResult};

/// Absolute avatar URL; relative media paths are resolved against the server
pub fn avatar_url(config: &ClientConfig, path: Option<&str>) -> Option<String> {
    path.map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| config.media_url(p))
}

pub struct AccountService<C> {
    http: Arc<C>,
}

service!(AccountService);

impl<C: HttpClient> AccountService<C> {
    pub async fn me(&self) -> ClientResult<User> {
        self.http.get("auth/me/").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<User> {
        if update.is_empty() {
            return Err(AppError::validation("Không có dữ liệu để cập nhật").into());
        }
        let user: User = self.http.patch("auth/user/", update).await?;
        tracing::info!(user_id = user.id, "Profile updated");
        Ok(user)
    }

    pub async fn change_password(&self, change: &PasswordChange) -> ClientResult<MessageResponse> {
        validation::check(change)?;
        let response = self.http.put("auth/change-password/", change).await?;
        tracing::info!("Password changed");
        Ok(response)
    }

    /// Upload a new avatar; the response carries the stored avatar path
    pub async fn upload_avatar(&self, image: &ImageUpload) -> ClientResult<Value> {
        let body = MultipartBody::new().file(
            "avatar",
            &image.file_name,
            &image.mime,
            image.bytes.clone(),
        );
        let response = self
            .http
            .send_multipart(Method::POST, "auth/upload-avatar/", body)
            .await?;
        tracing::info!(file = %image.file_name, bytes = image.bytes.len(), "Avatar uploaded");
        Ok(response)
    }
}
