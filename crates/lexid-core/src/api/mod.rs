//! HTTP gateway to the platform API.
//!
//! A thin client over the REST endpoints the screens consume. Every call
//! resolves to either a typed success value or an [`ApiError`] carrying a
//! user-facing message, so call sites never shape-check raw bodies.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::token::SessionToken;

mod error;
mod types;

pub use error::{ApiError, ApiErrorKind, GENERIC_ERROR};
pub use types::{
    CitizenProfile, LoginResponse, MessageResponse, RefreshResponse, RegistrationPayload,
};

/// Default platform API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.lexid.app";

/// Thin HTTP client wrapping the authentication-facing endpoints.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: String,
    timeout: Option<Duration>,
    http: reqwest::Client,
}

impl Gateway {
    /// Creates a gateway against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: None,
            http: reqwest::Client::new(),
        }
    }

    /// Creates a gateway from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let mut gateway = Self::new(config.effective_api_base_url());
        gateway.timeout = config.request_timeout();
        gateway
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let req = self.http.post(self.url("/auth/login")).json(&serde_json::json!({
            "email": email,
            "password": password,
        }));
        self.execute("/auth/login", req).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, ApiError> {
        let req = self
            .http
            .post(self.url("/auth/refresh"))
            .json(&serde_json::json!({ "refreshToken": refresh_token }));
        self.execute("/auth/refresh", req).await
    }

    /// Invalidates the server-side session. Callers treat this as
    /// best-effort; the client session is cleared regardless.
    pub async fn logout(&self, access: &SessionToken) -> Result<(), ApiError> {
        let req = self
            .http
            .post(self.url("/auth/logout"))
            .bearer_auth(access.as_str());
        self.execute_no_body("/auth/logout", req).await
    }

    pub async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<MessageResponse, ApiError> {
        let req = self.http.post(self.url("/citizens/add")).json(payload);
        self.execute("/citizens/add", req).await
    }

    pub async fn send_verification(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let req = self
            .http
            .post(self.url("/mail/send"))
            .json(&serde_json::json!({ "email": email }));
        self.execute("/mail/send", req).await
    }

    pub async fn confirm_verification(
        &self,
        email: &str,
        code: &str,
    ) -> Result<MessageResponse, ApiError> {
        let req = self.http.post(self.url("/mail/confirm")).json(&serde_json::json!({
            "email": email,
            "code": code,
        }));
        self.execute("/mail/confirm", req).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let req = self
            .http
            .post(self.url("/password/forgot-password"))
            .json(&serde_json::json!({ "email": email }));
        self.execute("/password/forgot-password", req).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let req = self
            .http
            .post(self.url("/password/reset-password"))
            .json(&serde_json::json!({
                "token": token,
                "password": password,
                "confirmPassword": confirm_password,
            }));
        self.execute("/password/reset-password", req).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<CitizenProfile, ApiError> {
        let req = self
            .http
            .get(self.url("/citizens/find-by-email"))
            .query(&[("email", email)]);
        self.execute("/citizens/find-by-email", req).await
    }

    pub async fn me(&self, access: &SessionToken) -> Result<CitizenProfile, ApiError> {
        let req = self
            .http
            .get(self.url("/citizens/me"))
            .bearer_auth(access.as_str());
        self.execute("/citizens/me", req).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Sends a request and decodes the JSON success body.
    async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let body = self.send(path, req).await?;
        serde_json::from_str(&body).map_err(|err| {
            warn!(path, %err, "unexpected response body");
            ApiError::parse(&err, &body)
        })
    }

    /// Sends a request where only the status matters.
    async fn execute_no_body(
        &self,
        path: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<(), ApiError> {
        self.send(path, req).await.map(|_| ())
    }

    async fn send(&self, path: &str, req: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let req = match self.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        };

        debug!(path, "api request");
        let response = req.send().await.map_err(|err| {
            warn!(path, %err, "api transport failure");
            ApiError::network(&err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| ApiError::network(&err))?;

        if !status.is_success() {
            debug!(path, status = status.as_u16(), "api error response");
            return Err(ApiError::status(status.as_u16(), &body));
        }

        Ok(body)
    }
}
