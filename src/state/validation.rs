//! Validation controller: the access-code state machine and history list.
//!
//! DESIGN
//! ======
//! [`ValidationSession`] owns the machine `Idle → Loading → {Success |
//! Denied | Error}` plus the recent-validations list. Overlapping validates
//! are serialized by a request generation: every new validate (and `reset`)
//! advances it, and a settlement carrying a stale generation is discarded
//! instead of overwriting newer state. Each validate triggers exactly one
//! fire-and-forget history refresh after it settles; refresh failures are
//! logged and never reach the machine's `error_message`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::api::{ApiClientError, ApiResponse};
use crate::config::DEFAULT_HISTORY_LIMIT;
use crate::services::validation::{
    AccessDecision, RecentValidation, ValidationApi, ValidationResult,
};

/// Fallback denial message when the server gives no reason.
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied";
/// Fallback for a server-declared failure with an empty message.
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";
/// Message shown when the call failed before reaching the server.
pub const NETWORK_ERROR_MESSAGE: &str = "A network error occurred.";

/// State-machine phase of the current validate call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Denied,
    Error,
}

/// Point-in-time view of the validation workflow.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationState {
    pub phase: ValidationPhase,
    pub result: Option<ValidationResult>,
    pub history: Vec<RecentValidation>,
    pub error_message: Option<String>,
}

struct Cell {
    state: ValidationState,
    generation: u64,
}

/// Owned validation controller; clone freely, all clones share one machine.
#[derive(Clone)]
pub struct ValidationSession {
    api: Arc<dyn ValidationApi>,
    cell: Arc<Mutex<Cell>>,
    events: watch::Sender<ValidationState>,
    history_limit: usize,
}

impl ValidationSession {
    #[must_use]
    pub fn new(api: Arc<dyn ValidationApi>) -> Self {
        Self::with_history_limit(api, DEFAULT_HISTORY_LIMIT)
    }

    #[must_use]
    pub fn with_history_limit(api: Arc<dyn ValidationApi>, history_limit: usize) -> Self {
        let initial = ValidationState::default();
        let (events, _) = watch::channel(initial.clone());
        let cell = Arc::new(Mutex::new(Cell { state: initial, generation: 0 }));
        Self { api, cell, events, history_limit }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> ValidationState {
        self.lock().state.clone()
    }

    /// Follow state changes; the receiver always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ValidationState> {
        self.events.subscribe()
    }

    /// Validate a typed access code. Returns the settled snapshot.
    pub async fn validate(&self, code: &str) -> ValidationState {
        let generation = self.begin();
        let outcome = self.api.validate_code(code).await;
        self.finish(generation, outcome)
    }

    /// Validate a scanned QR payload. Returns the settled snapshot.
    pub async fn validate_qr(&self, qr_data: &str) -> ValidationState {
        let generation = self.begin();
        let outcome = self.api.validate_qr(qr_data).await;
        self.finish(generation, outcome)
    }

    /// Replace the history list with the most recent validations.
    ///
    /// Failures leave the list untouched and are logged only; they never
    /// surface into `error_message` or `phase`.
    pub async fn fetch_history(&self) -> ValidationState {
        match self.api.recent_validations(self.history_limit).await {
            Ok(ApiResponse::Success(rows)) => {
                let mut cell = self.lock();
                cell.state.history = rows;
                self.events.send_replace(cell.state.clone());
            }
            Ok(ApiResponse::Failure(error)) => {
                tracing::warn!(code = %error.code, message = %error.message, "history refresh rejected");
            }
            Err(error) => {
                tracing::warn!(%error, "history refresh failed");
            }
        }
        self.state()
    }

    /// Clear the result card back to `Idle`; history is untouched.
    ///
    /// Advances the generation, so an in-flight validate cannot resurrect
    /// the cleared card when it settles.
    pub fn reset(&self) -> ValidationState {
        let mut cell = self.lock();
        cell.generation += 1;
        clear_card(&mut cell.state);
        self.events.send_replace(cell.state.clone());
        cell.state.clone()
    }

    /// Implicit reset, then `Loading`. Returns the generation owning this
    /// call; only that generation may settle the machine.
    fn begin(&self) -> u64 {
        let mut cell = self.lock();
        cell.generation += 1;
        let generation = cell.generation;
        clear_card(&mut cell.state);
        self.events.send_replace(cell.state.clone());
        cell.state.phase = ValidationPhase::Loading;
        self.events.send_replace(cell.state.clone());
        generation
    }

    fn finish(
        &self,
        generation: u64,
        outcome: Result<ApiResponse<ValidationResult>, ApiClientError>,
    ) -> ValidationState {
        self.settle(generation, outcome);
        self.spawn_history_refresh();
        self.state()
    }

    fn settle(
        &self,
        generation: u64,
        outcome: Result<ApiResponse<ValidationResult>, ApiClientError>,
    ) {
        let mut cell = self.lock();
        if cell.generation != generation {
            tracing::debug!(
                generation,
                current = cell.generation,
                "discarding stale validation settlement"
            );
            return;
        }

        match outcome {
            Ok(ApiResponse::Success(result)) => match result.result {
                AccessDecision::Granted => {
                    cell.state.phase = ValidationPhase::Success;
                    cell.state.result = Some(result);
                    cell.state.error_message = None;
                }
                AccessDecision::Denied => {
                    cell.state.phase = ValidationPhase::Denied;
                    cell.state.error_message = Some(
                        result
                            .reason
                            .clone()
                            .filter(|reason| !reason.is_empty())
                            .unwrap_or_else(|| ACCESS_DENIED_MESSAGE.to_string()),
                    );
                    cell.state.result = Some(result);
                }
            },
            Ok(ApiResponse::Failure(error)) => {
                cell.state.phase = ValidationPhase::Error;
                cell.state.result = None;
                cell.state.error_message = Some(if error.message.is_empty() {
                    VALIDATION_FAILED_MESSAGE.to_string()
                } else {
                    error.message
                });
            }
            Err(error) => {
                tracing::warn!(%error, "validation call failed before reaching the server");
                cell.state.phase = ValidationPhase::Error;
                cell.state.result = None;
                cell.state.error_message = Some(NETWORK_ERROR_MESSAGE.to_string());
            }
        }
        self.events.send_replace(cell.state.clone());
    }

    /// Fired after every validate, stale or not; the task result is dropped.
    fn spawn_history_refresh(&self) {
        let session = self.clone();
        tokio::spawn(async move {
            session.fetch_history().await;
        });
    }

    fn lock(&self) -> MutexGuard<'_, Cell> {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn clear_card(state: &mut ValidationState) {
    state.phase = ValidationPhase::Idle;
    state.result = None;
    state.error_message = None;
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
