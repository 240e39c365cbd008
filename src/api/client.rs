//! Portal API gateway: bearer-token injection and response normalization.
//!
//! DESIGN
//! ======
//! One `reqwest` client per portal, pointed at the deployment base URL. Every
//! outgoing request reads the current token from the injected [`TokenStore`]
//! and attaches it as a bearer header when present; an empty slot sends the
//! request unauthenticated and lets the server decide. Transport and server
//! failures are folded into the [`ApiResponse`] envelope by
//! `normalize_response` (pure, tested directly), so higher layers match on
//! the envelope instead of handling nested error types. No request timeouts
//! are configured: the workflow has no cancellation, and a stalled request
//! keeps its caller in-flight.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{ApiErrorBody, ApiResponse};
use crate::storage::TokenStore;

/// Code synthesized when the request never produced a server response.
pub const CODE_NETWORK_ERROR: &str = "NETWORK_ERROR";
/// Code synthesized for any response outside the envelope contract.
pub const CODE_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Client-local failures raised before any normalized response exists.
///
/// Everything the server or network did wrong lands in the envelope instead;
/// this type only covers the client's own setup mistakes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiClientError {
    #[error("http client build failed: {0}")]
    ClientBuild(String),
    #[error("request body encoding failed: {0}")]
    BodyEncode(String),
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Build a gateway for `base_url`, reading tokens from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ApiClientError::ClientBuild(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url, tokens })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and normalize the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>, ApiClientError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    /// POST `body` as JSON to `path` and normalize the response.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<ApiResponse<T>, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    /// Send a request and fold the outcome into the envelope.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for client-local failures (body encoding); every
    /// transport or server failure comes back as `Ok(Failure(..))`.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>, ApiClientError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let body = match body {
            Some(b) => {
                Some(serde_json::to_value(b).map_err(|e| ApiClientError::BodyEncode(e.to_string()))?)
            }
            None => None,
        };

        let response = match self.prepare(method, path, body.as_ref()).send().await {
            Ok(response) => response,
            Err(e) => return Ok(ApiResponse::Failure(transport_failure(&e))),
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return Ok(ApiResponse::Failure(transport_failure(&e))),
        };

        Ok(normalize_response(status, &text))
    }

    /// Build the request, attaching the bearer header when a token is stored.
    fn prepare(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.http.request(method, url);
        if let Some(token) = self.tokens.get() {
            request = request.header("Authorization", format!("Bearer {token}"));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request
    }
}

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Fold an HTTP response into the envelope.
///
/// A structured `{success: false}` body passes through verbatim whatever the
/// status; a parsed `{success: true}` body requires a success status.
/// Anything else becomes a synthesized [`CODE_UNKNOWN_ERROR`] failure.
fn normalize_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> ApiResponse<T> {
    match serde_json::from_str::<ApiResponse<T>>(body) {
        Ok(ApiResponse::Failure(error)) => ApiResponse::Failure(error),
        Ok(ApiResponse::Success(data)) if status.is_success() => ApiResponse::Success(data),
        Ok(ApiResponse::Success(_)) => ApiResponse::failure(
            CODE_UNKNOWN_ERROR,
            format!("unexpected success payload with status {status}"),
        ),
        Err(parse) => {
            let message = if status.is_success() {
                format!("unexpected response body: {parse}")
            } else {
                format!("request failed with status {status}")
            };
            ApiResponse::failure(CODE_UNKNOWN_ERROR, message)
        }
    }
}

fn transport_failure(error: &reqwest::Error) -> ApiErrorBody {
    ApiErrorBody::new(CODE_NETWORK_ERROR, error.to_string())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
