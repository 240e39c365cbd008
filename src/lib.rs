//! # vms-portal
//!
//! Client core for a visitor-management security portal: an authenticated
//! officer validates visitor access codes (typed or QR-scanned) against a
//! remote service and reviews a short history of recent validations.
//!
//! This crate owns the session and validation state machines, the HTTP
//! gateway with bearer-token injection, and the token persistence seam.
//! Front ends (the `vms-cli` terminal shell, or any other renderer) issue
//! commands on the controllers and subscribe to state snapshots; rendering
//! never lives here.

pub mod api;
pub mod config;
pub mod guard;
pub mod services;
pub mod state;
pub mod storage;
