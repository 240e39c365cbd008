//! Route guards for the portal shell.
//!
//! DESIGN
//! ======
//! Guards are pure functions over session facts, so any frontend (or the CLI)
//! can apply them without dragging in a router. The caller supplies the two
//! booleans and acts on the returned decision.

use crate::state::SessionState;

/// What the shell should do with a requested route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session is still being restored, show a placeholder and wait.
    Loading,
    /// No authenticated officer, send the caller to the login screen.
    RedirectToLogin,
    /// Officer already signed in, send the caller to the portal.
    RedirectToPortal,
    /// Render the requested route.
    Render,
}

/// Decide whether a protected route may render.
///
/// While the session is loading nothing is known yet, so the route neither
/// renders nor redirects.
#[must_use]
pub fn protected(is_authenticated: bool, is_loading: bool) -> RouteDecision {
    if is_loading {
        RouteDecision::Loading
    } else if is_authenticated {
        RouteDecision::Render
    } else {
        RouteDecision::RedirectToLogin
    }
}

/// Decide whether a public route (the login screen) may render.
///
/// A signed-in officer has no business on the login screen and is bounced to
/// the portal instead.
#[must_use]
pub fn public_only(is_authenticated: bool, is_loading: bool) -> RouteDecision {
    match protected(is_authenticated, is_loading) {
        RouteDecision::Render => RouteDecision::RedirectToPortal,
        RouteDecision::RedirectToLogin => RouteDecision::Render,
        other => other,
    }
}

/// Decide where a request for an unknown route should land.
///
/// Nothing renders here: signed-in officers go to the portal, everyone else
/// to the login screen.
#[must_use]
pub fn fallback(is_authenticated: bool, is_loading: bool) -> RouteDecision {
    match protected(is_authenticated, is_loading) {
        RouteDecision::Render => RouteDecision::RedirectToPortal,
        other => other,
    }
}

/// `protected` over a session snapshot.
#[must_use]
pub fn protected_for(session: &SessionState) -> RouteDecision {
    protected(session.is_authenticated(), session.is_loading)
}

/// `public_only` over a session snapshot.
#[must_use]
pub fn public_only_for(session: &SessionState) -> RouteDecision {
    public_only(session.is_authenticated(), session.is_loading)
}

/// `fallback` over a session snapshot.
#[must_use]
pub fn fallback_for(session: &SessionState) -> RouteDecision {
    fallback(session.is_authenticated(), session.is_loading)
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
