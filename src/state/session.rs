//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the single owner of the `Session`. The route guard
//! rehydrates it before every navigation; pages read it through the
//! accessors and call `login`/`logout`/`register` in response to user
//! actions.
//!
//! LIFECYCLE
//! =========
//! Created empty and rehydrated once from storage in `new`. Mutated only by
//! `login`, `logout` and `rehydrate` (`commit_login` and `finish_logout` are
//! the synchronous halves of the first two). A failed login or an undecodable
//! snapshot resets it to empty and purges the stored entry, so memory and
//! storage never disagree about who is logged in.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::snapshot;
use crate::config::ApiConfig;
use crate::error::AuthError;
use crate::net::api::AuthApi;
use crate::net::types::{Credentials, LoginResponse, RegistrationDetails, RegistrationOutcome, User};
use crate::util::storage::Storage;

/// The current authenticated identity, or none.
///
/// Logged-in is defined as "a user is present"; there is no separate flag to
/// drift out of sync.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    current_user: Option<User>,
}

impl Session {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn logged_in(user: User) -> Self {
        Self { current_user: Some(user) }
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    /// Token to send as `Authorization: Bearer`.
    ///
    /// Sanctum tokens arrive as `"<id>|<secret>"`; only the secret is sent.
    pub fn bearer_token(&self) -> Option<&str> {
        self.current_user.as_ref()?.bearer_token()
    }
}

pub struct SessionStore<S, A> {
    session: Session,
    storage: S,
    api: A,
    storage_key: String,
    legacy_token_keys: Vec<String>,
}

impl<S: Storage, A> SessionStore<S, A> {
    /// Build the store and rehydrate it once from storage.
    pub fn new(storage: S, api: A, config: &ApiConfig) -> Self {
        let mut store = Self {
            session: Session::empty(),
            storage,
            api,
            storage_key: config.storage_key.clone(),
            legacy_token_keys: config.legacy_token_keys.clone(),
        };
        store.rehydrate();
        store
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.current_user()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Direct storage access, e.g. to react to another tab's writes.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Rebuild the session from storage. Never fails: a missing entry means
    /// logged out, a corrupt one is purged and also means logged out.
    pub fn rehydrate(&mut self) {
        let Some(raw) = self.storage.get(&self.storage_key) else {
            self.session = Session::empty();
            return;
        };
        match snapshot::decode(&raw) {
            Ok(user) => {
                if self.session.current_user() != Some(&user) {
                    log::debug!("session rehydrated for user {}", user.id);
                    self.session = Session::logged_in(user);
                }
            }
            Err(err) => {
                log::warn!("discarding stored session: {err}");
                self.storage.remove(&self.storage_key);
                self.session = Session::empty();
            }
        }
    }

    /// Bearer token for API calls, read from storage rather than memory so a
    /// login in another tab is picked up before the next guard pass.
    ///
    /// The session snapshot is authoritative; legacy keys are consulted only
    /// when no snapshot is stored at all.
    pub fn token(&self) -> Option<String> {
        if let Some(raw) = self.storage.get(&self.storage_key) {
            let Ok(user) = snapshot::decode(&raw) else {
                return None;
            };
            return user.bearer_token().map(str::to_owned);
        }
        self.legacy_token_keys
            .iter()
            .find_map(|key| self.storage.get(key))
            .filter(|t| !t.is_empty())
    }

    /// Apply the outcome of a `/login` call: persist and adopt the user, or
    /// reset to empty on any error.
    ///
    /// Split from [`SessionStore::login`] so callers holding the store behind
    /// a lock can run the request first and commit afterwards.
    ///
    /// # Errors
    ///
    /// Returns the request error, or `Decode` when the response cannot be
    /// normalized into a user.
    pub fn commit_login(&mut self, response: Result<LoginResponse, AuthError>) -> Result<Session, AuthError> {
        match Self::persistable(response) {
            Ok((user, encoded)) => {
                self.storage.set(&self.storage_key, &encoded);
                log::info!("user {} logged in", user.id);
                self.session = Session::logged_in(user);
                Ok(self.session.clone())
            }
            Err(err) => {
                log::info!("login failed: {}", err.code());
                self.reset();
                Err(err)
            }
        }
    }

    fn persistable(response: Result<LoginResponse, AuthError>) -> Result<(User, String), AuthError> {
        let user = response?.into_user()?;
        let encoded = snapshot::encode(&user)?;
        Ok((user, encoded))
    }

    /// Local half of logout: drop the session and every stored credential.
    pub fn finish_logout(&mut self) {
        self.reset();
        for key in &self.legacy_token_keys {
            self.storage.remove(key);
        }
        log::info!("session cleared");
    }

    fn reset(&mut self) {
        self.session = Session::empty();
        self.storage.remove(&self.storage_key);
    }
}

impl<S: Storage, A: AuthApi> SessionStore<S, A> {
    /// Authenticate and persist the resulting session.
    ///
    /// # Errors
    ///
    /// Propagates `Network`/`Rejected`/`Decode`. On any error the session is
    /// left empty.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
        let response = self.api.login(credentials).await;
        self.commit_login(response)
    }

    /// Best-effort remote logout, then unconditional local teardown.
    pub async fn logout(&mut self) {
        let token = self.token();
        if let Err(err) = self.api.logout(token.as_deref()).await {
            log::debug!("remote logout ignored: {err}");
        }
        self.finish_logout();
    }

    /// Create an account. The caller still has to log in afterwards.
    ///
    /// # Errors
    ///
    /// Propagates `Network`/`Rejected`/`Decode` from the API.
    pub async fn register(&self, details: &RegistrationDetails) -> Result<RegistrationOutcome, AuthError> {
        self.api.register(details).await
    }
}
