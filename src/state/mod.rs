//! Owned controller state, split by domain.
//!
//! DESIGN
//! ======
//! State is split by domain (`session`, `validation`) so front ends can
//! depend on small focused models. Controllers are cheap `Clone` handles over
//! a shared interior; every command publishes a fresh snapshot through a
//! watch channel, so rendering subscribes without the controllers knowing it
//! exists.

pub mod session;
pub mod validation;

pub use session::{Session, SessionState};
pub use validation::{ValidationPhase, ValidationSession, ValidationState};

#[cfg(test)]
pub mod test_support;
