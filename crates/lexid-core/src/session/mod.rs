//! Session lifecycle: the client-side authentication state machine.
//!
//! [`Session`] is an explicitly owned context object; there is no global.
//! Every mutation of [`SessionState`] funnels through the named transitions
//! below, each following the pending -> fulfilled/rejected shape: dispatch
//! sets `loading` and clears `error`, the terminal state either populates
//! the user or records the failure.

mod generation;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::api::{CitizenProfile, Gateway, RegistrationPayload};
use crate::token::{StoredCredentials, TokenStore};

pub use generation::{Generation, OpGenerations};

/// Snapshot of the authentication state the screens render from.
///
/// Invariant: `is_authenticated` implies a non-expired access token in the
/// store and a populated `user`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<CitizenProfile>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Owned authentication context: gateway, token store, and current state.
pub struct Session {
    gateway: Gateway,
    store: TokenStore,
    state: SessionState,
    /// Auth-state-mutating operations (check/login/refresh) share one
    /// generation line: a newer dispatch supersedes any older in-flight one.
    auth_ops: OpGenerations,
    /// Registration runs on its own line; it never touches auth state.
    register_ops: OpGenerations,
}

impl Session {
    pub fn new(gateway: Gateway, store: TokenStore) -> Self {
        Self {
            gateway,
            store,
            state: SessionState::default(),
            auth_ops: OpGenerations::default(),
            register_ops: OpGenerations::default(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Restores the session from the stored token.
    ///
    /// An expired token triggers a silent refresh. Any failure along the way
    /// clears both the token store and the state, forcing a fresh sign-in.
    ///
    /// # Errors
    /// Returns an error when no valid session could be established.
    pub async fn check_auth(&mut self) -> Result<()> {
        let generation = self.begin_auth();

        let creds = match self.store.get() {
            Ok(creds) => creds,
            Err(err) => {
                self.reject_auth(generation, "Stored session is unreadable.");
                return Err(err);
            }
        };
        let Some(creds) = creds else {
            self.reject_auth(generation, "No session token found.");
            anyhow::bail!("No session token found.");
        };

        let creds = if creds.access.is_expired() {
            debug!("access token expired, attempting silent refresh");
            match self.refresh_credentials(creds).await {
                Ok(creds) => creds,
                Err(err) => {
                    self.drop_credentials();
                    self.reject_auth(generation, "Session expired. Please sign in again.");
                    return Err(err).context("Silent refresh failed");
                }
            }
        } else {
            creds
        };

        let subject = match creds.access.claims() {
            Ok(claims) => claims.sub,
            Err(err) => {
                self.drop_credentials();
                self.reject_auth(generation, "Session is invalid. Please sign in again.");
                return Err(err);
            }
        };

        match self.gateway.find_by_email(&subject).await {
            Ok(profile) => {
                self.fulfill_auth(generation, profile);
                Ok(())
            }
            Err(err) => {
                self.drop_credentials();
                self.reject_auth(generation, err.message.clone());
                Err(anyhow::Error::new(err)).context("Profile lookup failed")
            }
        }
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// Returns an error with the server-provided message (or a generic
    /// fallback) when the credentials are rejected.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let generation = self.begin_auth();

        let response = match self.gateway.login(email, password).await {
            Ok(response) => response,
            Err(err) => {
                self.reject_auth(generation, err.message.clone());
                return Err(anyhow::Error::new(err)).context("Sign-in failed");
            }
        };

        let creds = StoredCredentials {
            access: response.access_token,
            refresh: response.refresh_token,
        };
        if let Err(err) = self.store.set(&creds) {
            self.reject_auth(generation, "Could not persist the session.");
            return Err(err);
        }

        match self.gateway.find_by_email(email).await {
            Ok(profile) => {
                self.fulfill_auth(generation, profile);
                Ok(())
            }
            Err(err) => {
                self.drop_credentials();
                self.reject_auth(generation, err.message.clone());
                Err(anyhow::Error::new(err)).context("Profile lookup failed")
            }
        }
    }

    /// Mints a new access token from the stored refresh credential and
    /// re-derives the profile from the `me` endpoint.
    ///
    /// # Errors
    /// Returns an error when refreshing fails; the session is cleared.
    pub async fn refresh(&mut self) -> Result<()> {
        let generation = self.begin_auth();

        let creds = match self.store.get() {
            Ok(Some(creds)) => creds,
            Ok(None) => {
                self.reject_auth(generation, "No session to refresh.");
                anyhow::bail!("No session to refresh.");
            }
            Err(err) => {
                self.reject_auth(generation, "Stored session is unreadable.");
                return Err(err);
            }
        };

        let creds = match self.refresh_credentials(creds).await {
            Ok(creds) => creds,
            Err(err) => {
                self.drop_credentials();
                self.reject_auth(generation, "Session expired. Please sign in again.");
                return Err(err).context("Token refresh failed");
            }
        };

        match self.gateway.me(&creds.access).await {
            Ok(profile) => {
                self.fulfill_auth(generation, profile);
                Ok(())
            }
            Err(err) => {
                self.drop_credentials();
                self.reject_auth(generation, err.message.clone());
                Err(anyhow::Error::new(err)).context("Profile lookup failed")
            }
        }
    }

    /// Submits a registration. Success or failure, authentication state is
    /// left untouched: registering does not sign the citizen in.
    ///
    /// # Errors
    /// Returns an error with the server-provided message on rejection.
    pub async fn register_citizen(&mut self, payload: RegistrationPayload) -> Result<String> {
        let generation = self.register_ops.begin();
        self.state.loading = true;
        self.state.error = None;

        match self.gateway.register(&payload).await {
            Ok(response) => {
                if self.register_ops.settle(generation) {
                    self.state.loading = false;
                }
                Ok(response.message)
            }
            Err(err) => {
                if self.register_ops.settle(generation) {
                    self.state.loading = false;
                    self.state.error = Some(err.message.clone());
                }
                Err(anyhow::Error::new(err)).context("Registration failed")
            }
        }
    }

    /// Signs out. The server-side invalidation is best-effort; the client
    /// store and state are cleared unconditionally regardless of its outcome.
    ///
    /// # Errors
    /// Returns an error only if the local store could not be cleared.
    pub async fn logout(&mut self) -> Result<()> {
        if let Ok(Some(creds)) = self.store.get()
            && let Err(err) = self.gateway.logout(&creds.access).await
        {
            warn!(%err, "server-side logout failed, clearing locally anyway");
        }

        self.auth_ops.cancel();
        self.register_ops.cancel();
        self.state = SessionState::default();
        self.store.clear().context("clear token store")?;
        Ok(())
    }

    fn begin_auth(&mut self) -> Generation {
        self.state.loading = true;
        self.state.error = None;
        self.auth_ops.begin()
    }

    fn fulfill_auth(&mut self, generation: Generation, profile: CitizenProfile) {
        if !self.auth_ops.settle(generation) {
            debug!("discarding stale auth result");
            return;
        }
        self.state = SessionState {
            is_authenticated: true,
            user: Some(profile),
            loading: false,
            error: None,
        };
    }

    fn reject_auth(&mut self, generation: Generation, message: impl Into<String>) {
        if !self.auth_ops.settle(generation) {
            debug!("discarding stale auth failure");
            return;
        }
        self.state = SessionState {
            is_authenticated: false,
            user: None,
            loading: false,
            error: Some(message.into()),
        };
    }

    /// Exchanges the refresh credential for new tokens and persists them.
    /// A response without a rotated refresh token keeps the previous one.
    async fn refresh_credentials(
        &mut self,
        creds: StoredCredentials,
    ) -> Result<StoredCredentials> {
        let response = self
            .gateway
            .refresh(&creds.refresh)
            .await
            .map_err(anyhow::Error::new)?;

        let rotated = StoredCredentials {
            access: response.access_token,
            refresh: response.refresh_token.unwrap_or(creds.refresh),
        };
        self.store.set(&rotated)?;
        Ok(rotated)
    }

    /// Best-effort store clear on auth failure paths; never masks the
    /// failure that got us here.
    fn drop_credentials(&self) {
        if let Err(err) = self.store.clear() {
            warn!(%err, "failed to clear token store");
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    /// Test: check_auth with no stored token rejects and clears state.
    #[tokio::test]
    async fn test_check_auth_without_token() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(
            Gateway::new("http://127.0.0.1:9"),
            TokenStore::at(dir.path().join("session.json")),
        );

        let result = session.check_auth().await;

        assert!(result.is_err());
        assert!(!session.state().is_authenticated);
        assert!(session.state().user.is_none());
        assert!(!session.state().loading);
        assert_eq!(
            session.state().error.as_deref(),
            Some("No session token found.")
        );
    }

    /// Test: logout clears state even when the server is unreachable.
    #[tokio::test]
    async fn test_logout_clears_unconditionally() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(
            Gateway::new("http://127.0.0.1:9"),
            TokenStore::at(dir.path().join("session.json")),
        );
        session.state.is_authenticated = true;

        session.logout().await.unwrap();

        assert!(!session.state().is_authenticated);
        assert!(session.store().get().unwrap().is_none());
    }
}
