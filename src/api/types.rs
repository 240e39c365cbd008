//! Tagged response envelope shared by every portal endpoint.
//!
//! DESIGN
//! ======
//! The server wraps every payload as `{success: true, data}` or
//! `{success: false, error: {code, message}}`. [`ApiResponse`] is that
//! discriminated union; hand-written serde impls keep the wire's `success`
//! tag out of the Rust surface so callers pattern-match on the variants
//! instead of checking a boolean.

use serde::de::{Deserializer, Error as _};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Error payload carried by a `{success: false}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiErrorBody {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: code.into(), message: message.into() }
    }
}

/// Discriminated union every remote call resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ApiErrorBody),
}

impl<T> ApiResponse<T> {
    /// Shorthand for a `{success: false}` envelope.
    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure(ApiErrorBody::new(code, message))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Map the success payload, passing a failure through unchanged.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        match self {
            Self::Success(data) => ApiResponse::Success(f(data)),
            Self::Failure(error) => ApiResponse::Failure(error),
        }
    }
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

#[derive(Deserialize)]
struct RawEnvelope<T> {
    success: bool,
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ApiResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawEnvelope::<T>::deserialize(deserializer)?;
        match raw {
            RawEnvelope { success: true, data: Some(data), .. } => Ok(Self::Success(data)),
            RawEnvelope { success: false, error: Some(error), .. } => Ok(Self::Failure(error)),
            RawEnvelope { success: true, .. } => Err(D::Error::missing_field("data")),
            RawEnvelope { success: false, .. } => Err(D::Error::missing_field("error")),
        }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut envelope = serializer.serialize_struct("ApiResponse", 2)?;
        match self {
            Self::Success(data) => {
                envelope.serialize_field("success", &true)?;
                envelope.serialize_field("data", data)?;
            }
            Self::Failure(error) => {
                envelope.serialize_field("success", &false)?;
                envelope.serialize_field("error", error)?;
            }
        }
        envelope.end()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
