//! HTTP gateway and the tagged response envelope.

pub mod client;
pub mod types;

pub use client::{ApiClient, ApiClientError};
pub use types::{ApiErrorBody, ApiResponse};
