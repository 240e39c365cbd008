//! Session controller: token-based hydration, login, logout.
//!
//! DESIGN
//! ======
//! [`Session`] owns the officer's auth state exclusively; nothing else
//! mutates it. Commands return the settled snapshot (or the failure) and
//! publish every intermediate state to subscribers. The token slot is only
//! touched here: hydration consumes it, login fills it, logout and any auth
//! failure clear it.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::services::auth::{AuthApi, AuthError, LoginPayload, SecurityUser};
use crate::storage::TokenStore;

/// Point-in-time view of the officer's session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<SecurityUser>,
    pub is_loading: bool,
}

impl SessionState {
    /// Derived, never stored: a session is authenticated iff a user is set.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Owned session controller; clone freely, all clones share one state.
#[derive(Clone)]
pub struct Session {
    auth: Arc<dyn AuthApi>,
    tokens: Arc<dyn TokenStore>,
    cell: Arc<Mutex<SessionState>>,
    events: watch::Sender<SessionState>,
}

impl Session {
    /// New controller in its pre-hydration state: no user, loading.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let initial = SessionState { user: None, is_loading: true };
        let (events, _) = watch::channel(initial.clone());
        Self { auth, tokens, cell: Arc::new(Mutex::new(initial)), events }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.cell.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Follow state changes; the receiver always holds the latest snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.events.subscribe()
    }

    /// Rebuild the session from the stored token.
    ///
    /// No token: settles unauthenticated immediately, without any network
    /// call. With one, a failed profile fetch discards the token, since it is
    /// expired or invalid and would fail the same way on every start.
    pub async fn hydrate(&self) -> SessionState {
        if self.tokens.get().is_none() {
            return self.update(|state| {
                state.user = None;
                state.is_loading = false;
            });
        }

        match self.auth.current_user().await {
            Ok(user) => self.update(|state| {
                state.user = Some(user);
                state.is_loading = false;
            }),
            Err(error) => {
                tracing::warn!(%error, "session hydration failed; clearing stored token");
                self.tokens.remove();
                self.update(|state| {
                    state.user = None;
                    state.is_loading = false;
                })
            }
        }
    }

    /// Exchange credentials for an authenticated session.
    ///
    /// Success persists the returned token before the state settles, so a
    /// restart straight after login still hydrates.
    ///
    /// # Errors
    ///
    /// Returns the failure as a single display message; any stored token is
    /// discarded and the session is left unauthenticated.
    pub async fn login(&self, payload: &LoginPayload) -> Result<SecurityUser, AuthError> {
        self.update(|state| state.is_loading = true);

        match self.auth.login(payload).await {
            Ok(success) => {
                self.tokens.set(&success.token);
                let user = success.user;
                self.update(|state| {
                    state.user = Some(user.clone());
                    state.is_loading = false;
                });
                Ok(user)
            }
            Err(error) => {
                self.tokens.remove();
                self.update(|state| {
                    state.user = None;
                    state.is_loading = false;
                });
                Err(error)
            }
        }
    }

    /// Drop the session. Synchronous: no network round-trip.
    pub fn logout(&self) -> SessionState {
        self.tokens.remove();
        self.update(|state| {
            state.user = None;
            state.is_loading = false;
        })
    }

    /// Apply a mutation and publish the snapshot while the lock is held, so
    /// racing commands publish in cell order and the channel never settles on
    /// a snapshot the cell has already left behind.
    fn update(&self, apply: impl FnOnce(&mut SessionState)) -> SessionState {
        let mut state = self.cell.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut state);
        let snapshot = state.clone();
        self.events.send_replace(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
