//! Error type shared by the auth API, the authenticated client, and config.
//!
//! ERROR HANDLING
//! ==============
//! `login`/`register` surface `Network` and `Rejected` to the caller so the UI
//! can show them. `Decode` only escapes from the HTTP layer (malformed
//! response bodies); a corrupt storage snapshot is swallowed during
//! rehydration and never reaches a caller.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by session, auth, and API client operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The request never produced a response (offline, DNS, CORS, etc.).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// A response body or stored snapshot could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// Client configuration is missing or invalid.
    #[error("config error: {0}")]
    Config(String),
}

impl AuthError {
    /// Stable machine-readable code for UI and log correlation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_NETWORK",
            Self::Rejected { .. } => "E_AUTH_REJECTED",
            Self::Decode(_) => "E_DECODE",
            Self::Config(_) => "E_CONFIG",
        }
    }

    /// Only transport failures are worth retrying; a rejection will repeat.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Build a `Rejected` error from a status and an optional error body.
    ///
    /// Laravel-style bodies carry a `message` field; anything else falls back
    /// to a generic status message.
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self::Rejected { status, message }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
