//! Bistro Client - REST client for the restaurant back-office API
//!
//! [`BistroClient`] bundles one [`NetworkHttpClient`] (bearer injection,
//! 401 refresh-and-retry) with the auth session and one service per
//! resource. All of them share the same token store.

pub mod config;
pub mod debounce;
pub mod error;
pub mod filters;
pub mod http;
pub mod services;
pub mod session;
pub mod token;
pub mod workflow;

use std::sync::Arc;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, NetworkHttpClient};
pub use session::AuthSession;
pub use token::{FileTokenStore, MemoryTokenStore, StoredTokens, TokenStore};
pub use workflow::{AddOrderOutcome, TableBoard};

// Re-export shared types for convenience
pub use shared::cart::{MergePolicy, OrderCart};
pub use shared::models;

use debounce::Debouncer;
use services::{
    AccountService, BillingService, CustomerService, DashboardService, MenuService,
    ReservationService, StaffService, TableService,
};

/// Entry point: session plus resource services over one HTTP client
pub struct BistroClient<C = NetworkHttpClient> {
    http: Arc<C>,
    config: ClientConfig,
    session: AuthSession<C>,
}

impl<C> Clone for BistroClient<C> {
    fn clone(&self) -> Self {
        Self {
            http: Arc::clone(&self.http),
            config: self.config.clone(),
            session: self.session.clone(),
        }
    }
}

impl BistroClient<NetworkHttpClient> {
    /// Tokens go to `{home}/tokens.json` when `config.home` is set, else memory
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let store: Arc<dyn TokenStore> = match config.token_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Using file token store");
                Arc::new(FileTokenStore::new(path))
            }
            None => Arc::new(MemoryTokenStore::new()),
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let http = NetworkHttpClient::new(config.clone(), store)?;
        Ok(Self::from_http(config, Arc::new(http)))
    }

    /// Configuration from `BISTRO_*` environment variables
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }
}

impl<C: HttpClient> BistroClient<C> {
    /// Wrap any [`HttpClient`]
    pub fn from_http(config: ClientConfig, http: Arc<C>) -> Self {
        Self {
            session: AuthSession::new(Arc::clone(&http)),
            http,
            config,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &Arc<C> {
        &self.http
    }

    pub fn session(&self) -> &AuthSession<C> {
        &self.session
    }

    pub fn account(&self) -> AccountService<C> {
        AccountService::new(Arc::clone(&self.http))
    }

    pub fn tables(&self) -> TableService<C> {
        TableService::new(Arc::clone(&self.http))
    }

    pub fn billing(&self) -> BillingService<C> {
        BillingService::new(Arc::clone(&self.http))
    }

    pub fn menu(&self) -> MenuService<C> {
        MenuService::new(Arc::clone(&self.http))
    }

    pub fn staff(&self) -> StaffService<C> {
        StaffService::new(Arc::clone(&self.http))
    }

    pub fn customers(&self) -> CustomerService<C> {
        CustomerService::new(Arc::clone(&self.http))
    }

    pub fn reservations(&self) -> ReservationService<C> {
        ReservationService::new(Arc::clone(&self.http))
    }

    pub fn dashboard(&self) -> DashboardService<C> {
        DashboardService::new(Arc::clone(&self.http))
    }

    /// A fresh table board (empty until refreshed)
    pub fn board(&self) -> TableBoard<C> {
        TableBoard::new(Arc::clone(&self.http))
    }

    /// Debouncer using the configured search delay
    pub fn debouncer(&self) -> Debouncer {
        Debouncer::new(self.config.debounce())
    }

    /// Absolute URL of the signed-in user's avatar
    pub fn avatar_url(&self) -> Option<String> {
        let user = self.session.user()?;
        services::account::avatar_url(&self.config, user.avatar.as_deref())
    }
}
