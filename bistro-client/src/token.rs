// bistro-client/src/token.rs
// Token storage - memory or JSON file

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::ClientResult;

/// Access and refresh tokens as persisted
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTokens {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

/// Where the access/refresh tokens live
///
/// Reads never fail; a store that cannot be read behaves as empty.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> StoredTokens;
    fn save(&self, tokens: &StoredTokens) -> ClientResult<()>;

    fn access_token(&self) -> Option<String> {
        self.load().access
    }

    fn refresh_token(&self) -> Option<String> {
        self.load().refresh
    }

    /// Store both tokens
    fn set_pair(&self, access: &str, refresh: &str) -> ClientResult<()> {
        self.save(&StoredTokens {
            access: Some(access.to_string()),
            refresh: Some(refresh.to_string()),
        })
    }

    /// Replace the access token, and the refresh token if a new one was issued
    fn set_access(&self, access: &str, refresh: Option<&str>) -> ClientResult<()> {
        let mut tokens = self.load();
        tokens.access = Some(access.to_string());
        if let Some(refresh) = refresh {
            tokens.refresh = Some(refresh.to_string());
        }
        self.save(&tokens)
    }

    /// Drop both tokens
    fn clear(&self) -> ClientResult<()> {
        self.save(&StoredTokens::default())
    }
}

/// Tokens held in process memory
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<StoredTokens>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            tokens: RwLock::new(StoredTokens {
                access: Some(access.to_string()),
                refresh: Some(refresh.to_string()),
            }),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> StoredTokens {
        self.tokens
            .read()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    fn save(&self, tokens: &StoredTokens) -> ClientResult<()> {
        match self.tokens.write() {
            Ok(mut guard) => *guard = tokens.clone(),
            Err(poisoned) => *poisoned.into_inner() = tokens.clone(),
        }
        Ok(())
    }
}

/// Tokens persisted to a JSON file
///
/// An empty token set removes the file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    cache: MemoryTokenStore,
}

impl FileTokenStore {
    /// Open the store, loading the file if it exists
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tokens = Self::read(&path).unwrap_or_default();
        Self {
            path,
            cache: MemoryTokenStore {
                tokens: RwLock::new(tokens),
            },
        }
    }

    fn read(path: &Path) -> Option<StoredTokens> {
        if !path.exists() {
            return None;
        }
        let json = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&json) {
            Ok(tokens) => Some(tokens),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable token file");
                None
            }
        }
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> StoredTokens {
        self.cache.load()
    }

    fn save(&self, tokens: &StoredTokens) -> ClientResult<()> {
        self.cache.save(tokens)?;
        if tokens.access.is_none() && tokens.refresh.is_none() {
            if self.path.exists() {
                fs::remove_file(&self.path)?;
            }
            return Ok(());
        }
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(tokens)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
