//! Persisted token cache for one credential set
//!
//! A JSON file mapping a user key to that user's tokens. Writes go through a
//! temp file and rename so a crash mid-write never leaves a truncated cache,
//! and the file is restricted to the owner since it holds refresh tokens.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::constants::REFRESH_MARGIN_MS;
use crate::error::{Error, Result};
use crate::token::TokenResponse;

/// Tokens cached for one user.
///
/// `expires_at_ms` is an absolute unix timestamp in milliseconds, computed
/// from `TokenResponse.expires_in` at storage time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl StoredToken {
    /// Build from a token endpoint response, keeping `previous_refresh` when
    /// the endpoint did not rotate the refresh token.
    pub fn from_response(
        response: TokenResponse,
        now_ms: u64,
        previous_refresh: Option<String>,
    ) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at_ms: now_ms
                .saturating_add(response.expires_in.saturating_mul(1000)),
            scope: response.scope,
        }
    }

    /// Whether the access token is usable for at least `REFRESH_MARGIN_MS`.
    pub fn is_fresh(&self, now_ms: u64) -> bool {
        self.expires_at_ms > now_ms.saturating_add(REFRESH_MARGIN_MS)
    }
}

/// File-backed token cache.
pub struct TokenCache {
    path: PathBuf,
    state: Mutex<HashMap<String, StoredToken>>,
}

impl TokenCache {
    /// Open the cache at `path`. A missing file is an empty cache; the file and
    /// its directory are created on the first write.
    pub async fn load(path: PathBuf) -> Result<Self> {
        let state = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let tokens: HashMap<String, StoredToken> = serde_json::from_str(&contents)
                    .map_err(|e| Error::CacheParse(format!("{}: {e}", path.display())))?;
                debug!(path = %path.display(), users = tokens.len(), "loaded token cache");
                tokens
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no token cache yet");
                HashMap::new()
            }
            Err(e) => return Err(Error::Io(format!("reading token cache: {e}"))),
        };

        Ok(Self {
            path,
            state: Mutex::new(state),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, user: &str) -> Option<StoredToken> {
        self.state.lock().await.get(user).cloned()
    }

    /// Store tokens for `user` and persist.
    pub async fn put(&self, user: &str, token: StoredToken) -> Result<()> {
        let mut state = self.state.lock().await;
        state.insert(user.to_string(), token);
        write_atomic(&self.path, &state).await?;
        info!(path = %self.path.display(), "token cache saved");
        Ok(())
    }

    /// Drop tokens for `user` and persist. Returns the removed entry.
    pub async fn remove(&self, user: &str) -> Result<Option<StoredToken>> {
        let mut state = self.state.lock().await;
        let removed = state.remove(user);
        if removed.is_some() {
            debug!(user, "removed cached token");
            write_atomic(&self.path, &state).await?;
        }
        Ok(removed)
    }
}

async fn write_atomic(path: &Path, data: &HashMap<String, StoredToken>) -> Result<()> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| Error::CacheParse(format!("serializing token cache: {e}")))?;

    let dir = path
        .parent()
        .ok_or_else(|| Error::Io("token cache path has no parent directory".into()))?;
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| Error::Io(format!("creating token cache directory: {e}")))?;

    let tmp_path = dir.join(format!(".tokens.tmp.{}", std::process::id()));

    tokio::fs::write(&tmp_path, json.as_bytes())
        .await
        .map_err(|e| Error::Io(format!("writing temp token cache: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        tokio::fs::set_permissions(&tmp_path, perms)
            .await
            .map_err(|e| Error::Io(format!("setting token cache permissions: {e}")))?;
    }

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Error::Io(format!("renaming temp token cache: {e}")))?;

    Ok(())
}
