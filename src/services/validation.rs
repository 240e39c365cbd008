//! Access-code validation and the recent-validations feed.
//!
//! DESIGN
//! ======
//! The server nests visitor and resident details inside the validate payload
//! (`visitor_info`, `resident_info.home`). This module owns the wire structs
//! and flattens them into display models, so controllers and front ends never
//! see the nesting. History rows get their visitor name back-filled here:
//! every consumer receives display-ready text.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiClientError, ApiResponse};

const VALIDATE_PATH: &str = "/security/validate";
const VALIDATE_QR_PATH: &str = "/security/validate-qr";
const RECENT_PATH: &str = "/security/recent-validations";

/// Display fallback for a granted history row without a visitor name.
pub const NAME_MISSING_GRANTED: &str = "Name Missing (Granted)";
/// Display fallback for every other nameless history row.
pub const NAME_NOT_AVAILABLE: &str = "N/A";

/// Outcome of a validation, as declared by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessDecision {
    Granted,
    Denied,
}

/// Flat display model for a single validation outcome.
///
/// Produced fresh per validate call; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub id: Option<String>,
    pub code: String,
    pub result: AccessDecision,
    pub reason: Option<String>,
    pub reason_code: Option<String>,
    pub visitor_name: Option<String>,
    pub resident_name: Option<String>,
    pub home_details: Option<HomeDetails>,
    pub validated_at: String,
    pub message: Option<String>,
}

/// Resident home details attached to a validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDetails {
    pub plot_number: Option<String>,
    pub street: Option<String>,
}

/// One display-ready row of the recent-validations list.
///
/// `visitor_name` is always printable; the back-fill has already happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentValidation {
    pub id: String,
    pub code: String,
    pub result: AccessDecision,
    pub visitor_name: String,
    pub resident_name: Option<String>,
    pub home: Option<String>,
    pub validated_at: String,
}

/// Remote validation operations. Enables mocking in tests.
///
/// Every method resolves to the envelope; the `Err` arm is reserved for
/// client-local failures, never for anything the server said.
#[async_trait::async_trait]
pub trait ValidationApi: Send + Sync {
    /// Validate a typed access code.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiClientError`] only for client-local failures.
    async fn validate_code(&self, code: &str) -> Result<ApiResponse<ValidationResult>, ApiClientError>;

    /// Validate a scanned QR payload.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiClientError`] only for client-local failures.
    async fn validate_qr(&self, qr_data: &str) -> Result<ApiResponse<ValidationResult>, ApiClientError>;

    /// Fetch up to `limit` most-recent validations, newest first.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiClientError`] only for client-local failures.
    async fn recent_validations(
        &self,
        limit: usize,
    ) -> Result<ApiResponse<Vec<RecentValidation>>, ApiClientError>;
}

// =============================================================================
// SERVICE
// =============================================================================

/// Production [`ValidationApi`] over the portal gateway.
pub struct ValidationService {
    api: Arc<ApiClient>,
}

impl ValidationService {
    #[must_use]
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }
}

#[async_trait::async_trait]
impl ValidationApi for ValidationService {
    async fn validate_code(&self, code: &str) -> Result<ApiResponse<ValidationResult>, ApiClientError> {
        let response = self.api.post::<RawValidation, _>(VALIDATE_PATH, &CodeBody { code }).await?;
        Ok(response.map(flatten_validation))
    }

    async fn validate_qr(&self, qr_data: &str) -> Result<ApiResponse<ValidationResult>, ApiClientError> {
        let response = self.api.post::<RawValidation, _>(VALIDATE_QR_PATH, &QrBody { qr_data }).await?;
        Ok(response.map(flatten_validation))
    }

    async fn recent_validations(
        &self,
        limit: usize,
    ) -> Result<ApiResponse<Vec<RecentValidation>>, ApiClientError> {
        let path = format!("{RECENT_PATH}?limit={limit}");
        let response = self.api.get::<RawHistory>(&path).await?;
        Ok(response.map(|history| history.validations.into_iter().map(flatten_recent).collect()))
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
struct CodeBody<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct QrBody<'a> {
    qr_data: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawValidation {
    id: Option<String>,
    code: String,
    result: AccessDecision,
    reason: Option<String>,
    reason_code: Option<String>,
    visitor_info: Option<RawVisitorInfo>,
    resident_info: Option<RawResidentInfo>,
    validated_at: String,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVisitorInfo {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawResidentInfo {
    name: Option<String>,
    home: Option<RawHome>,
}

#[derive(Debug, Deserialize)]
struct RawHome {
    #[serde(rename = "plotNumber")]
    plot_number: Option<String>,
    street: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHistory {
    #[serde(default)]
    validations: Vec<RawRecentValidation>,
}

#[derive(Debug, Deserialize)]
struct RawRecentValidation {
    id: String,
    code: String,
    result: AccessDecision,
    visitor_name: Option<String>,
    resident_name: Option<String>,
    home: Option<String>,
    validated_at: String,
}

// =============================================================================
// MAPPING
// =============================================================================

fn flatten_validation(raw: RawValidation) -> ValidationResult {
    let visitor_name = raw.visitor_info.and_then(|info| info.name);
    let (resident_name, home_details) = match raw.resident_info {
        Some(info) => {
            let home = info
                .home
                .map(|home| HomeDetails { plot_number: home.plot_number, street: home.street });
            (info.name, home)
        }
        None => (None, None),
    };
    ValidationResult {
        id: raw.id,
        code: raw.code,
        result: raw.result,
        reason: raw.reason,
        reason_code: raw.reason_code,
        visitor_name,
        resident_name,
        home_details,
        validated_at: raw.validated_at,
        message: raw.message,
    }
}

fn flatten_recent(raw: RawRecentValidation) -> RecentValidation {
    let visitor_name = display_visitor_name(raw.visitor_name, raw.result);
    RecentValidation {
        id: raw.id,
        code: raw.code,
        result: raw.result,
        visitor_name,
        resident_name: raw.resident_name,
        home: raw.home,
        validated_at: raw.validated_at,
    }
}

/// Back-fill the visitor name when the server omits it or sends "".
fn display_visitor_name(name: Option<String>, result: AccessDecision) -> String {
    match name {
        Some(name) if !name.is_empty() => name,
        _ => match result {
            AccessDecision::Granted => NAME_MISSING_GRANTED.to_string(),
            AccessDecision::Denied => NAME_NOT_AVAILABLE.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
