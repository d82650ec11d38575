//! Authenticated REST client for the console's CRUD endpoints.
//!
//! Every backend resource answers `{ "data": ... }`; `request` unwraps that
//! envelope so page code only sees the payload.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::http::{Method, send_json};
use crate::config::ApiConfig;
use crate::error::AuthError;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    config: ApiConfig,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config, token: None }
    }

    /// Attach the bearer token, usually `SessionStore::token()`.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Issue a request against `path` and unwrap the `data` envelope.
    ///
    /// # Errors
    ///
    /// Propagates `Network`, `Rejected` and `Decode` from the transport.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, AuthError> {
        let url = self.config.endpoint(path);
        let envelope: Envelope<T> = send_json(method, &url, self.token(), body.as_ref()).await?;
        Ok(envelope.data)
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn assign_role(&self, user_id: i64, role_id: i64) -> Result<serde_json::Value, AuthError> {
        let path = role_change_path(user_id, RoleChange::Assign);
        self.request(Method::Post, &path, Some(serde_json::json!({ "role_id": role_id }))).await
    }

    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn remove_role(&self, user_id: i64, role_id: i64) -> Result<serde_json::Value, AuthError> {
        let path = role_change_path(user_id, RoleChange::Remove);
        self.request(Method::Post, &path, Some(serde_json::json!({ "role_id": role_id }))).await
    }
}

#[derive(Clone, Copy)]
enum RoleChange {
    Assign,
    Remove,
}

fn role_change_path(user_id: i64, change: RoleChange) -> String {
    let verb = match change {
        RoleChange::Assign => "assign",
        RoleChange::Remove => "remove",
    };
    format!("/users/{user_id}/roles/{verb}")
}
