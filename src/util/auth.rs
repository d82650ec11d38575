//! Leptos glue between the session store and the router.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app root provides one `RwSignal<SessionStore<..>>` as context; every
//! location change runs the guard against it and redirects when needed.
//!
//! CONCURRENCY
//! ===========
//! The signal is never held across a network await. `login_shared` and
//! `logout_shared` clone the API handle out, await the request unlocked, and
//! commit the result in one short update, so a navigation during the request
//! still sees the store. If the store is nevertheless unavailable the guard
//! decides as if logged out rather than letting the navigation through.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::Credentials;
use crate::routing::guard::{GuardDecision, before_each, decide};
use crate::state::session::{Session, SessionStore};
use crate::util::storage::Storage;

fn store_gone() -> AuthError {
    AuthError::Config("session store disposed".to_owned())
}

/// Wrap the store in a signal and provide it as context.
pub fn provide_session_store<S, A>(store: SessionStore<S, A>) -> RwSignal<SessionStore<S, A>>
where
    S: Storage + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    let signal = RwSignal::new(store);
    provide_context(signal);
    signal
}

/// Run the guard against the shared store.
///
/// Subscribers are only notified when rehydration changed the session.
pub fn guard_navigation<S, A>(store: RwSignal<SessionStore<S, A>>, to: &str, from: Option<&str>) -> GuardDecision
where
    S: Storage + Send + Sync + 'static,
    A: Send + Sync + 'static,
{
    let outcome = store.try_update_untracked(|s| {
        let before = s.session().clone();
        let decision = before_each(s, to, from);
        (decision, before != *s.session())
    });
    match outcome {
        Some((decision, changed)) => {
            if changed {
                store.notify();
            }
            decision
        }
        None => {
            log::warn!("session store unavailable, guarding {to} as logged out");
            decide(to, &Session::empty())
        }
    }
}

/// Log in without holding the store across the request.
///
/// # Errors
///
/// Same as [`SessionStore::login`], plus `Config` if the store was disposed.
pub async fn login_shared<S, A>(store: RwSignal<SessionStore<S, A>>, credentials: &Credentials) -> Result<Session, AuthError>
where
    S: Storage + Send + Sync + 'static,
    A: AuthApi + Clone + Send + Sync + 'static,
{
    let api = store.try_with_untracked(|s| s.api().clone()).ok_or_else(store_gone)?;
    let response = api.login(credentials).await;
    store.try_update(|s| s.commit_login(response)).unwrap_or_else(|| Err(store_gone()))
}

/// Log out without holding the store across the request.
pub async fn logout_shared<S, A>(store: RwSignal<SessionStore<S, A>>)
where
    S: Storage + Send + Sync + 'static,
    A: AuthApi + Clone + Send + Sync + 'static,
{
    let Some((api, token)) = store.try_with_untracked(|s| (s.api().clone(), s.token())) else {
        log::warn!("logout skipped: session store disposed");
        return;
    };
    if let Err(err) = api.logout(token.as_deref()).await {
        log::debug!("remote logout ignored: {err}");
    }
    if store.try_update(SessionStore::finish_logout).is_none() {
        log::warn!("logout commit skipped: session store disposed");
    }
}

/// Run the route guard on every location change.
pub fn install_route_guard<S, A, F>(store: RwSignal<SessionStore<S, A>>, navigate: F)
where
    S: Storage + Send + Sync + 'static,
    A: Send + Sync + 'static,
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let location = use_location();
    let previous = StoredValue::new(None::<String>);
    Effect::new(move || {
        let to = location.pathname.get();
        let from = previous.get_value();
        previous.set_value(Some(to.clone()));

        if let GuardDecision::Redirect(target) = guard_navigation(store, &to, from.as_deref()) {
            navigate(target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
