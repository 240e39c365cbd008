//! Officer authentication: login and current-user lookup.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiClientError, ApiResponse};

const LOGIN_PATH: &str = "/auth/security/login";
const VERIFY_PATH: &str = "/auth/verify";

/// Role granted to a portal account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityRole {
    SecurityOfficer,
    Admin,
}

/// Officer profile as returned by the server.
///
/// Immutable once fetched; replaced wholesale on re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecurityUser {
    pub id: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub role: SecurityRole,
}

/// Credentials submitted by the login form.
#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

/// Payload returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginSuccess {
    pub token: String,
    pub user: SecurityUser,
}

/// Auth failures collapse into one user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Remote auth operations. Enables mocking in tests.
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a token and the officer's profile.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] carrying the user-facing message when the
    /// server rejects the credentials or the call fails outright.
    async fn login(&self, payload: &LoginPayload) -> Result<LoginSuccess, AuthError>;

    /// Fetch the profile belonging to the current bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] when the token is missing, expired, or the
    /// call fails outright.
    async fn current_user(&self) -> Result<SecurityUser, AuthError>;
}

// =============================================================================
// SERVICE
// =============================================================================

/// Production [`AuthApi`] over the portal gateway.
pub struct AuthService {
    api: Arc<ApiClient>,
}

impl AuthService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl AuthApi for AuthService {
    async fn login(&self, payload: &LoginPayload) -> Result<LoginSuccess, AuthError> {
        flatten_auth(self.api.post(LOGIN_PATH, payload).await)
    }

    async fn current_user(&self) -> Result<SecurityUser, AuthError> {
        flatten_auth(self.api.get(VERIFY_PATH).await)
    }
}

/// Collapse every failure shape into the single-message auth error.
fn flatten_auth<T>(outcome: Result<ApiResponse<T>, ApiClientError>) -> Result<T, AuthError> {
    match outcome {
        Ok(ApiResponse::Success(data)) => Ok(data),
        Ok(ApiResponse::Failure(error)) => Err(AuthError::new(error.message)),
        Err(local) => Err(AuthError::new(local.to_string())),
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
