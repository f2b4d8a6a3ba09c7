//! Session token decoding and on-disk credential storage.
//!
//! Credentials are stored in `<LEXID_HOME>/session.json` with restricted
//! permissions (0600). One credential set is active at a time. Tokens are
//! never logged or displayed in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Returns the current time in seconds since the epoch.
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(u64::MAX, |d| d.as_secs())
}

/// Claims embedded in an access token payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject identifier: the account email.
    pub sub: String,
    /// Expiry timestamp in seconds since the epoch.
    pub exp: u64,
}

/// An opaque bearer access token with an embedded expiry and subject.
///
/// The wire format is three dot-separated base64url segments; the middle
/// segment is a JSON claims object. Decoding never touches the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decodes the embedded claims segment.
    ///
    /// # Errors
    /// Returns an error if the token has no payload segment or the payload
    /// is not valid base64url JSON.
    pub fn claims(&self) -> Result<TokenClaims> {
        let payload = self
            .0
            .split('.')
            .nth(1)
            .ok_or_else(|| anyhow::anyhow!("Malformed token: missing payload segment"))?;
        let decoded = URL_SAFE_NO_PAD
            .decode(payload)
            .context("Failed to decode token payload")?;
        serde_json::from_slice(&decoded).context("Failed to parse token claims")
    }

    /// Returns true iff the embedded expiry is at or before the current time.
    ///
    /// An undecodable token counts as expired.
    pub fn is_expired(&self) -> bool {
        match self.claims() {
            Ok(claims) => claims.exp <= now_secs(),
            Err(_) => true,
        }
    }
}

/// The single credential set persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCredentials {
    /// Short-lived access token authorizing API calls.
    pub access: SessionToken,
    /// Longer-lived credential used to mint a new access token.
    pub refresh: String,
}

/// On-disk store for the active credential set.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the default location under the lexid home directory.
    pub fn default_path() -> Self {
        Self::at(paths::session_path())
    }

    /// Store at an explicit path (tests point this at a tempdir).
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored credentials.
    /// Returns `None` if nothing is stored.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn get(&self) -> Result<Option<StoredCredentials>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session from {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .map(Some)
            .with_context(|| format!("Failed to parse session from {}", self.path.display()))
    }

    /// Persists the credentials with restricted permissions (0600).
    ///
    /// # Errors
    /// Returns an error if the operation fails.
    pub fn set(&self, creds: &StoredCredentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(creds).context("Failed to serialize session")?;

        // Write with restricted permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Removes the stored credentials. Returns whether any existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove session from {}", self.path.display()))?;
        Ok(true)
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.len() <= 16 {
        return "***".to_string();
    }
    format!("{}...", &token[..12])
}
