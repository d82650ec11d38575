//! Persisted session snapshot codec.
//!
//! The stored value is base64 (standard alphabet) of the JSON object
//! `{id, name, email, roles, loggedIn, token}`. This is an encoding, not
//! protection: any script on the origin can decode it and read the token.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::net::types::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    roles: BTreeSet<Role>,
    #[serde(rename = "loggedIn", default)]
    logged_in: bool,
    #[serde(default)]
    token: Option<String>,
}

/// Encode a logged-in user for storage.
///
/// # Errors
///
/// Returns `AuthError::Decode` only if JSON serialization fails.
pub fn encode(user: &User) -> Result<String, AuthError> {
    let snapshot = Snapshot {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        roles: user.roles.clone(),
        logged_in: true,
        token: user.token.clone(),
    };
    let json = serde_json::to_vec(&snapshot)?;
    Ok(BASE64.encode(json))
}

/// Decode a stored snapshot back into a user.
///
/// # Errors
///
/// Returns `AuthError::Decode` for invalid base64, invalid JSON, or a
/// snapshot that does not describe a logged-in user with at least one role.
pub fn decode(raw: &str) -> Result<User, AuthError> {
    let bytes = BASE64.decode(raw.trim()).map_err(|e| AuthError::Decode(format!("base64: {e}")))?;
    let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
    if !snapshot.logged_in {
        return Err(AuthError::Decode("snapshot is not logged in".to_owned()));
    }
    if snapshot.roles.is_empty() {
        return Err(AuthError::Decode("snapshot has no roles".to_owned()));
    }
    Ok(User {
        id: snapshot.id,
        name: snapshot.name,
        email: snapshot.email,
        roles: snapshot.roles,
        token: snapshot.token.filter(|t| !t.is_empty()),
    })
}
