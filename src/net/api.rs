//! Auth endpoints: login, sign-up and logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` talks to the backend only through the `AuthApi` trait, so
//! tests can script responses and the browser build can use `HttpAuthApi`.
//!
//! ERROR HANDLING
//! ==============
//! Transport and status failures come back as `AuthError`; callers decide
//! which ones to surface (login/register) and which to swallow (logout).

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;

use super::http::{Method, send_json};
use super::types::{Credentials, LoginResponse, RegistrationDetails, RegistrationOutcome};
use crate::config::ApiConfig;
use crate::error::AuthError;

pub const LOGIN_PATH: &str = "/login";
pub const SIGNUP_PATH: &str = "/signup";
pub const LOGOUT_PATH: &str = "/logout";

/// Network side of authentication.
///
/// Futures are `?Send`: in the browser they run on the single-threaded
/// `spawn_local` executor.
#[async_trait(?Send)]
pub trait AuthApi {
    /// `POST /login {email, password}`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;

    /// `POST /signup {username, email, password, role_id}`.
    async fn register(&self, details: &RegistrationDetails) -> Result<RegistrationOutcome, AuthError>;

    /// Revoke the token server-side. Failure is acceptable to callers.
    async fn logout(&self, token: Option<&str>) -> Result<(), AuthError>;
}

/// `AuthApi` backed by the console's REST backend.
#[derive(Clone, Debug)]
pub struct HttpAuthApi {
    config: ApiConfig,
}

impl HttpAuthApi {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

fn login_body(credentials: &Credentials) -> serde_json::Value {
    serde_json::json!({ "email": credentials.email, "password": credentials.password })
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        log::debug!("login attempt for {}", credentials.email);
        let body = login_body(credentials);
        send_json(Method::Post, &self.config.endpoint(LOGIN_PATH), None, Some(&body)).await
    }

    async fn register(&self, details: &RegistrationDetails) -> Result<RegistrationOutcome, AuthError> {
        let body = serde_json::to_value(details)?;
        send_json(Method::Post, &self.config.endpoint(SIGNUP_PATH), None, Some(&body)).await
    }

    async fn logout(&self, token: Option<&str>) -> Result<(), AuthError> {
        send_json::<serde_json::Value>(Method::Post, &self.config.endpoint(LOGOUT_PATH), token, None)
            .await
            .map(|_| ())
    }
}
