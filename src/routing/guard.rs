//! Pre-navigation access control.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs before every navigation. Storage may have changed out of band
//! (another tab logged out), so `before_each` rehydrates first and then
//! hands the fresh session to the pure `decide`.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use super::paths::{self, LOGIN, STUDENT_DASHBOARD};
use crate::state::session::{Session, SessionStore};
use crate::util::storage::Storage;

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

impl GuardDecision {
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::Redirect(to) => Some(*to),
        }
    }
}

/// Decide whether `target` may be entered with `session`.
pub fn decide(target: &str, session: &Session) -> GuardDecision {
    let logged_in = session.is_logged_in();
    let public = paths::is_public(target);

    if !logged_in && !public {
        GuardDecision::Redirect(LOGIN)
    } else if logged_in && public {
        GuardDecision::Redirect(paths::HOME)
    } else if logged_in && paths::is_home(target) {
        match session.current_user() {
            Some(user) if user.is_student() => GuardDecision::Redirect(STUDENT_DASHBOARD),
            _ => GuardDecision::Allow,
        }
    } else {
        GuardDecision::Allow
    }
}

/// Rehydrate the store, then decide. `from` is accepted for router parity
/// and does not affect the decision.
pub fn before_each<S: Storage, A>(store: &mut SessionStore<S, A>, to: &str, from: Option<&str>) -> GuardDecision {
    store.rehydrate();
    let decision = decide(to, store.session());
    if let GuardDecision::Redirect(target) = decision {
        log::debug!("guard: {} -> {to} redirected to {target}", from.unwrap_or("<initial>"));
    }
    decision
}
