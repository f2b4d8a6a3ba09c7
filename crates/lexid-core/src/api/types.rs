//! Wire types for the platform API.

use serde::{Deserialize, Serialize};

use crate::token::SessionToken;

/// Successful login response. Profile fields the server inlines alongside
/// the tokens are ignored; the client re-fetches the profile by email.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: SessionToken,
    pub refresh_token: String,
}

/// Successful token refresh. The refresh credential may be rotated;
/// when absent the client keeps using the previous one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: SessionToken,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Citizen profile as served by the API. Not locally authoritative;
/// unknown or missing fields are tolerated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CitizenProfile {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub language_preference: String,
    pub location: String,
}

/// Full registration payload for `/citizens/add`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub language_preference: String,
    pub location: String,
}

/// Plain server acknowledgement carrying a user-facing message.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
