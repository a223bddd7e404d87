//! Auth session
//!
//! Holds the signed-in user next to the token store of the HTTP client.
//! "Who am I" checks are single-flight: while one `current_user` call is in
//! progress, other callers get the cached user instead of a second request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde_json::{Map, Value};
use shared::client::{LoginRequest, LoginResponse};
use shared::error::{AppError, ErrorCode};
use shared::models::{RegisterRequest, User};
use shared::validation;

use crate::http::{ApiRequest, HttpClient};
use crate::{ClientError, ClientResult};

#[derive(Default)]
struct SessionState {
    user: RwLock<Option<User>>,
    last_error: RwLock<Option<String>>,
    checking: AtomicBool,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Resets the in-flight flag when the check ends, however it ends
struct CheckGuard<'a>(&'a AtomicBool);

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Signed-in user and auth operations
pub struct AuthSession<C> {
    http: Arc<C>,
    state: Arc<SessionState>,
}

impl<C> Clone for AuthSession<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            state: Arc::clone(&self.state),
        }
    }
}

impl<C: HttpClient> AuthSession<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self {
            http,
            state: Arc::new(SessionState::default()),
        }
    }

    /// Cached user
    pub fn user(&self) -> Option<User> {
        read(&self.state.user).clone()
    }

    /// Message of the last failed auth operation
    pub fn last_error(&self) -> Option<String> {
        read(&self.state.last_error).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        read(&self.state.user).is_some()
    }

    /// Whether a "who am I" request is in flight
    pub fn is_checking(&self) -> bool {
        self.state.checking.load(Ordering::Acquire)
    }

    fn set_user(&self, user: Option<User>) {
        *write(&self.state.user) = user;
    }

    fn set_error(&self, message: Option<String>) {
        *write(&self.state.last_error) = message;
    }

    fn record_failure(&self, err: &ClientError) {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| err.user_message());
        self.set_error(Some(message));
    }

    /// Log in and store the token pair
    ///
    /// The response must carry `success` and both tokens. The user comes
    /// from the response, or from `/auth/me/` when the response has none.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<User> {
        self.set_error(None);
        let result = self.try_login(username, password).await;
        match &result {
            Ok(user) => tracing::info!(username = %user.username, "Logged in"),
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "Login failed");
                self.record_failure(e);
            }
        }
        result
    }

    async fn try_login(&self, username: &str, password: &str) -> ClientResult<User> {
        let request = ApiRequest::post("auth/login/").anonymous().json(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })?;
        let response: LoginResponse = self.http.execute(request).await?.json()?;

        if !response.success {
            return Err(ClientError::Unauthorized(
                response.message.unwrap_or_else(|| "Login failed".to_string()),
            ));
        }
        let pair = response
            .token_pair()
            .ok_or_else(|| AppError::new(ErrorCode::TokenPairMissing))?;
        self.http.tokens().set_pair(&pair.access, &pair.refresh)?;

        match response.user {
            Some(user) => {
                self.set_user(Some(user.clone()));
                Ok(user)
            }
            None => {
                let user: User = self.http.get("auth/me/").await?;
                self.set_user(Some(user.clone()));
                Ok(user)
            }
        }
    }

    /// Create an account; does not log in
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        self.set_error(None);
        let result = async {
            validation::check(request)?;
            let req = ApiRequest::post("auth/register/").anonymous().json(request)?;
            self.http.execute(req).await?;
            Ok::<(), ClientError>(())
        }
        .await;
        match &result {
            Ok(()) => tracing::info!(username = %request.username, "Account registered"),
            Err(e) => self.record_failure(e),
        }
        result
    }

    /// Drop tokens and the cached user
    pub fn logout(&self) -> ClientResult<()> {
        self.set_user(None);
        self.set_error(None);
        self.state.checking.store(false, Ordering::Release);
        self.http.tokens().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Exchange the refresh token now
    pub async fn refresh_token(&self) -> ClientResult<()> {
        self.http.refresh_tokens().await.map(|_| ())
    }

    /// Fetch `/auth/me/` and cache the user
    ///
    /// Returns the cached user without a request when a check is already in
    /// flight. A 401 goes through one refresh and one retry; if that fails the
    /// tokens are cleared.
    pub async fn current_user(&self) -> ClientResult<Option<User>> {
        if self
            .state
            .checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("User check already in flight, returning cached user");
            return Ok(self.user());
        }
        let _guard = CheckGuard(&self.state.checking);

        if self.http.tokens().access_token().is_none() {
            self.set_user(None);
            let err = ClientError::Unauthorized("No access token found".into());
            self.record_failure(&err);
            return Err(err);
        }

        match self.http.get::<User>("auth/me/").await {
            Ok(user) => {
                self.set_user(Some(user.clone()));
                self.set_error(None);
                Ok(Some(user))
            }
            Err(e) => {
                self.set_user(None);
                self.record_failure(&e);
                if let ClientError::Unauthorized(_) = e {
                    self.http.tokens().clear()?;
                }
                Err(e)
            }
        }
    }

    /// Startup check: no token means anonymous; a failed check clears tokens
    pub async fn restore(&self) -> Option<User> {
        if self.http.tokens().access_token().is_none() {
            return None;
        }
        match self.current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is no longer valid");
                if let Err(clear_err) = self.http.tokens().clear() {
                    tracing::error!(error = %clear_err, "Failed to clear stored tokens");
                }
                None
            }
        }
    }

    /// Merge fields into the cached user
    ///
    /// With no cached user the patch must describe a whole user.
    pub fn update_user(&self, patch: &Map<String, Value>) -> bool {
        let mut guard = write(&self.state.user);
        match guard.as_mut() {
            Some(user) => user.merge(patch),
            None => match serde_json::from_value::<User>(Value::Object(patch.clone())) {
                Ok(user) => {
                    *guard = Some(user);
                    true
                }
                Err(_) => false,
            },
        }
    }
}
