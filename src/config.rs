//! API endpoint and storage-key configuration.
//!
//! WASM builds have no process environment, so the endpoint is baked in at
//! compile time through `option_env!`. Native builds (SSR, tests) read the
//! variable at runtime first.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use crate::error::AuthError;

/// Environment variable naming the backend API base URL.
pub const API_ENDPOINT_VAR: &str = "APP_API_ENDPOINT";

/// Storage key holding the encoded session snapshot.
pub const DEFAULT_STORAGE_KEY: &str = "user";

/// Keys that may hold a bare bearer token written by older console builds.
pub const LEGACY_TOKEN_KEYS: [&str; 2] = ["auth", "authToken"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend base URL without a trailing slash.
    pub base_url: String,
    /// Primary storage key for the session snapshot.
    pub storage_key: String,
    /// Fallback keys consulted, in order, for a bare bearer token.
    pub legacy_token_keys: Vec<String>,
}

impl ApiConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            legacy_token_keys: LEGACY_TOKEN_KEYS.iter().map(|k| (*k).to_owned()).collect(),
        }
    }

    /// Build config from `APP_API_ENDPOINT`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Config` when the endpoint is unset or blank.
    pub fn from_env() -> Result<Self, AuthError> {
        let runtime = std::env::var(API_ENDPOINT_VAR).ok();
        Self::from_raw(runtime.as_deref().or(option_env!("APP_API_ENDPOINT")))
    }

    fn from_raw(raw: Option<&str>) -> Result<Self, AuthError> {
        match raw.map(str::trim) {
            Some(url) if !url.is_empty() => Ok(Self::new(url)),
            _ => Err(AuthError::Config(format!("{API_ENDPOINT_VAR} not set"))),
        }
    }

    /// Join an API path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
