//! Wire DTOs for the auth API and the canonical user model.
//!
//! DESIGN
//! ======
//! The backend sometimes answers login with a single `role` object and
//! sometimes with a `roles` list. `LoginResponse::into_user` is the only
//! place that shape is inspected; everything downstream sees `User::roles`
//! as a set.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Role id the console reserves for student accounts.
pub const STUDENT_ROLE_ID: i64 = 2;

/// Role name marking student accounts (compared case-insensitively).
pub const STUDENT_ROLE_NAME: &str = "student";

/// A role attached to a user account.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// The authenticated user as held in the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub roles: BTreeSet<Role>,
    /// Bearer credential as issued by the backend, if any.
    pub token: Option<String>,
}

impl User {
    /// Whether any role matches `name`, ignoring ASCII case.
    pub fn has_role(&self, name: &str) -> bool {
        self.roles.iter().any(|r| r.name.eq_ignore_ascii_case(name))
    }

    /// Token to send as `Authorization: Bearer`.
    ///
    /// Sanctum tokens arrive as `"<id>|<secret>"`; only the secret is sent.
    pub fn bearer_token(&self) -> Option<&str> {
        self.token.as_deref().map(sanctum_secret)
    }

    /// Student accounts land on their own dashboard.
    pub fn is_student(&self) -> bool {
        self.has_role(STUDENT_ROLE_NAME) || self.roles.iter().any(|r| r.id == STUDENT_ROLE_ID)
    }
}

fn sanctum_secret(token: &str) -> &str {
    token.split_once('|').map_or(token, |(_, secret)| secret)
}

/// Login form input.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials").field("email", &self.email).field("password", &"<redacted>").finish()
    }
}

/// Sign-up form input, posted as-is to `/signup`.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationDetails {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<i64>,
}

impl fmt::Debug for RegistrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDetails")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role_id", &self.role_id)
            .finish()
    }
}

/// Body returned by `/signup`; the payload shape is backend-defined.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Raw `/login` response.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub user: WireUser,
    #[serde(default)]
    pub token: Option<String>,
}

/// User object as the backend sends it, before role normalization.
#[derive(Clone, Debug, Deserialize)]
pub struct WireUser {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub roles: Option<Vec<Role>>,
}

impl LoginResponse {
    /// Normalize into the canonical `User`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Decode` when the response carries no role at all;
    /// a logged-in user always has at least one.
    pub fn into_user(self) -> Result<User, AuthError> {
        let WireUser { id, name, email, role, roles } = self.user;
        let mut set: BTreeSet<Role> = roles.unwrap_or_default().into_iter().collect();
        set.extend(role);
        if set.is_empty() {
            return Err(AuthError::Decode("login response carries no role".to_owned()));
        }
        let token = self.token.filter(|t| !t.is_empty());
        Ok(User { id, name, email, roles: set, token })
    }
}
