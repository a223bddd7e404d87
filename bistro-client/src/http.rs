// bistro-client/src/http.rs
// HTTP client - bearer injection, error mapping, 401 refresh-and-retry

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::client::{RefreshRequest, RefreshResponse};
use tokio::sync::Mutex;

use crate::token::TokenStore;
use crate::{ClientConfig, ClientError, ClientResult};

/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "auth/token/refresh/";

/// One file part of a multipart body
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Multipart body that can be rebuilt for a retry
#[derive(Debug, Clone, Default)]
pub struct MultipartBody {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        });
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn files(&self) -> &[FilePart] {
        &self.files
    }

    fn to_form(&self) -> ClientResult<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        for file in &self.files {
            let part = reqwest::multipart::Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime)?;
            form = form.part(file.field.clone(), part);
        }
        Ok(form)
    }
}

/// Request body
#[derive(Debug, Clone, Default)]
pub enum Body {
    #[default]
    Empty,
    Json(Value),
    Multipart(MultipartBody),
}

/// A request against the `/api/` root
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path below `/api/`, e.g. `tables/3/orders/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
    /// Attach the bearer token and refresh on 401
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
            authenticated: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ClientResult<Self> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn multipart(mut self, body: MultipartBody) -> Self {
        self.body = Body::Multipart(body);
        self
    }

    /// Send without a bearer token (login, register, refresh)
    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

/// Successful response
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub bytes: Vec<u8>,
}

impl RawResponse {
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        serde_json::from_slice(&self.bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{} (body: {})",
                e,
                String::from_utf8_lossy(&self.bytes[..self.bytes.len().min(200)])
            ))
        })
    }
}

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send a request; non-2xx statuses come back as errors
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse>;

    /// Exchange the refresh token for a new access token
    ///
    /// On failure both tokens are cleared and `SessionExpired` is returned.
    async fn refresh_tokens(&self) -> ClientResult<String>;

    fn tokens(&self) -> &dyn TokenStore;

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(ApiRequest::get(path)).await?.json()
    }

    async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> ClientResult<T> {
        self.execute(ApiRequest::get(path).query(query))
            .await?
            .json()
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = ApiRequest::post(path).json(body)?;
        self.execute(request).await?.json()
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = ApiRequest::new(Method::PUT, path).json(body)?;
        self.execute(request).await?.json()
    }

    async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = ApiRequest::new(Method::PATCH, path).json(body)?;
        self.execute(request).await?.json()
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(ApiRequest::new(Method::DELETE, path)).await?;
        Ok(())
    }

    async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: MultipartBody,
    ) -> ClientResult<T> {
        self.execute(ApiRequest::new(method, path).multipart(body))
            .await?
            .json()
    }

    async fn get_bytes(&self, path: &str, query: Vec<(String, String)>) -> ClientResult<Vec<u8>> {
        Ok(self
            .execute(ApiRequest::get(path).query(query))
            .await?
            .bytes)
    }
}

/// Network HTTP client
#[derive(Clone)]
pub struct NetworkHttpClient {
    client: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
    refresh_lock: Arc<Mutex<()>>,
}

impl std::fmt::Debug for NetworkHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkHttpClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl NetworkHttpClient {
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> ClientResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout_duration())
            .build()?;
        Ok(Self {
            client,
            config,
            tokens,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send_once(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<RawResponse> {
        let url = self.config.api_url(&request.path);
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut req = self
            .client
            .request(request.method.clone(), &url)
            .header("X-Request-ID", &request_id);
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req = match &request.body {
            Body::Empty => req,
            Body::Json(value) => req.json(value),
            Body::Multipart(body) => req.multipart(body.to_form()?),
        };

        let started = Instant::now();
        let response = req.send().await.map_err(|e| {
            tracing::error!(method = %request.method, url = %url, request_id = %request_id, error = %e, "Request failed");
            ClientError::from(e)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?.to_vec();
        tracing::debug!(
            method = %request.method,
            url = %url,
            status = status.as_u16(),
            request_id = %request_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "HTTP request"
        );
        Ok(RawResponse { status, bytes })
    }

    fn finish(response: RawResponse) -> ClientResult<RawResponse> {
        if response.status.is_success() {
            return Ok(response);
        }
        let text = String::from_utf8_lossy(&response.bytes);
        Err(ClientError::from_response(response.status, &text))
    }

    /// Refresh unless another task already replaced `stale`
    async fn refresh_after(&self, stale: Option<&str>) -> ClientResult<String> {
        let _guard = self.refresh_lock.lock().await;
        if let Some(current) = self.tokens.access_token() {
            if stale != Some(current.as_str()) {
                return Ok(current);
            }
        }
        self.refresh_locked().await
    }

    async fn refresh_locked(&self) -> ClientResult<String> {
        let Some(refresh) = self.tokens.refresh_token() else {
            tracing::warn!("No refresh token, forcing logout");
            self.tokens.clear()?;
            return Err(ClientError::SessionExpired);
        };

        let request = ApiRequest::post(REFRESH_PATH)
            .anonymous()
            .json(&RefreshRequest { refresh })?;
        let result = match self.send_once(&request, None).await {
            Ok(raw) => Self::finish(raw).and_then(|raw| raw.json::<RefreshResponse>()),
            Err(e) => Err(e),
        };

        match result {
            Ok(pair) => {
                self.tokens.set_access(&pair.access, pair.refresh.as_deref())?;
                tracing::info!(rotated = pair.refresh.is_some(), "Access token refreshed");
                Ok(pair.access)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, forcing logout");
                self.tokens.clear()?;
                Err(ClientError::SessionExpired)
            }
        }
    }
}

#[async_trait]
impl HttpClient for NetworkHttpClient {
    async fn execute(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let sent_token = if request.authenticated {
            self.tokens.access_token()
        } else {
            None
        };
        let response = self.send_once(&request, sent_token.as_deref()).await?;
        if response.status != StatusCode::UNAUTHORIZED || !request.authenticated {
            return Self::finish(response);
        }

        tracing::debug!(path = %request.path, "Got 401, refreshing access token");
        let token = self.refresh_after(sent_token.as_deref()).await?;
        let retry = self.send_once(&request, Some(&token)).await?;
        Self::finish(retry)
    }

    async fn refresh_tokens(&self) -> ClientResult<String> {
        let _guard = self.refresh_lock.lock().await;
        self.refresh_locked().await
    }

    fn tokens(&self) -> &dyn TokenStore {
        self.tokens.as_ref()
    }
}
