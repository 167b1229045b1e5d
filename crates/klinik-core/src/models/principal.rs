//! Authenticated principal and the auth records it is derived from.

use serde::{Deserialize, Serialize};

/// Display name used when the auth record carries no usable email.
pub const FALLBACK_DISPLAY_NAME: &str = "User";

/// User record as delivered by the auth collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    /// Backend user ID
    pub id: String,
    /// Login email, absent for phone or anonymous sign-ins
    pub email: Option<String>,
}

impl AuthUser {
    pub fn new(id: impl Into<String>, email: Option<&str>) -> Self {
        Self {
            id: id.into(),
            email: email.map(str::to_string),
        }
    }
}

/// Session record attached to auth state changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
}

impl From<AuthUser> for AuthSession {
    fn from(user: AuthUser) -> Self {
        Self { user }
    }
}

/// Role of a signed-in front-desk user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// The signed-in user as seen by the shell.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    /// Email prefix before the first `@`, or [`FALLBACK_DISPLAY_NAME`]
    pub name: String,
    /// Empty when the auth record has no email
    pub email: String,
    pub role: Role,
}

impl Principal {
    /// Derive a principal from an auth user record.
    ///
    /// Every principal is currently an admin; the auth backend carries no
    /// role claims yet.
    pub fn from_user(user: &AuthUser) -> Self {
        let email = user.email.clone().unwrap_or_default();
        Self {
            id: user.id.clone(),
            name: display_name(&email),
            email,
            role: Role::Admin,
        }
    }
}

impl From<&AuthSession> for Principal {
    fn from(session: &AuthSession) -> Self {
        Principal::from_user(&session.user)
    }
}

/// Email prefix up to the first `@`; an empty prefix falls back too.
fn display_name(email: &str) -> String {
    match email.split('@').next() {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => FALLBACK_DISPLAY_NAME.to_string(),
    }
}
