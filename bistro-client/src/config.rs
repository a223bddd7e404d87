//! Client configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::{ClientError, ClientResult};

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Default search debounce window in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
/// Token file name under the home directory
pub const TOKEN_FILE: &str = "tokens.json";

/// Client configuration for connecting to the back-office API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8000"), without the `/api` suffix
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Quiet window for search inputs, in milliseconds
    pub debounce_ms: u64,

    /// Directory holding persisted tokens; `None` keeps tokens in memory
    pub home: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            home: None,
        }
    }

    /// Load from `BISTRO_*` environment variables
    ///
    /// | variable              | default                 |
    /// |-----------------------|-------------------------|
    /// | `BISTRO_API_URL`      | `http://localhost:8000` |
    /// | `BISTRO_TIMEOUT_SECS` | `15`                    |
    /// | `BISTRO_DEBOUNCE_MS`  | `500`                   |
    /// | `BISTRO_HOME`         | unset (memory only)     |
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var("BISTRO_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout = parse_env("BISTRO_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let debounce_ms = parse_env("BISTRO_DEBOUNCE_MS", DEFAULT_DEBOUNCE_MS)?;
        let home = std::env::var("BISTRO_HOME").ok().map(PathBuf::from);

        let config = Self {
            home,
            timeout,
            debounce_ms,
            ..Self::new(base_url)
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the debounce window
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Persist tokens under `home`
    pub fn with_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.home = Some(home.into());
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Where the token file lives, if tokens are persisted
    pub fn token_path(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|h| h.join(TOKEN_FILE))
    }

    /// Full URL for an API path (`tables/` → `{base}/api/tables/`)
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Resolve a media path returned by the API to an absolute URL
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }

    pub fn validate(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be greater than zero".into()));
        }
        Ok(())
    }
}

fn parse_env(name: &str, default: u64) -> ClientResult<u64> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ClientError::Config(format!("{} must be a number, got {:?}", name, raw))),
        Err(_) => Ok(default),
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = ClientConfig::new("http://localhost:8000/");
        assert_eq!(config.api_url("tables/"), "http://localhost:8000/api/tables/");
        assert_eq!(config.api_url("/bills/3/"), "http://localhost:8000/api/bills/3/");
        assert_eq!(
            config.media_url("/media/avatars/a.png"),
            "http://localhost:8000/media/avatars/a.png"
        );
        assert_eq!(config.media_url("https://cdn.x/a.png"), "https://cdn.x/a.png");
    }

    #[test]
    fn test_defaults_and_builders() {
        let config = ClientConfig::default()
            .with_timeout(5)
            .with_debounce_ms(250)
            .with_home("/tmp/bistro");
        assert_eq!(config.timeout_duration(), Duration::from_secs(5));
        assert_eq!(config.debounce(), Duration::from_millis(250));
        assert_eq!(
            config.token_path(),
            Some(PathBuf::from("/tmp/bistro").join(TOKEN_FILE))
        );
        assert!(ClientConfig::default().token_path().is_none());
    }

    #[test]
    fn test_validate() {
        assert!(ClientConfig::default().validate().is_ok());
        assert!(ClientConfig::new("localhost:8000").validate().is_err());
        assert!(ClientConfig::default().with_timeout(0).validate().is_err());
    }
}
