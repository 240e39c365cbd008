//! Remote service operations built on the gateway.
//!
//! DESIGN
//! ======
//! Split by domain (`auth`, `validation`). Each service is an async trait
//! implemented over [`crate::api::ApiClient`]; controllers hold trait objects
//! so tests can script outcomes without a server.

pub mod auth;
pub mod validation;

pub use auth::{AuthApi, AuthError, AuthService, LoginPayload, LoginSuccess, SecurityRole, SecurityUser};
pub use validation::{
    AccessDecision, HomeDetails, RecentValidation, ValidationApi, ValidationResult,
    ValidationService,
};
