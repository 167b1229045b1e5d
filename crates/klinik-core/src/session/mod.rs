//! Session tracking against the external auth collaborator.

mod store;

pub use store::*;

use thiserror::Error;

use crate::models::{AuthSession, AuthUser};

/// Auth collaborator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),

    #[error("Auth service error: {0}")]
    Backend(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Kind of auth state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    /// Any other change (token refresh, user update, ...), kept by name
    Other(String),
}

impl AuthEvent {
    /// Parse a backend event name such as `SIGNED_IN`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "SIGNED_IN" => AuthEvent::SignedIn,
            "SIGNED_OUT" => AuthEvent::SignedOut,
            other => AuthEvent::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            AuthEvent::SignedIn => "SIGNED_IN",
            AuthEvent::SignedOut => "SIGNED_OUT",
            AuthEvent::Other(name) => name,
        }
    }
}

/// Callback invoked by the auth collaborator on every state change.
pub type AuthHandler = Box<dyn Fn(AuthEvent, Option<AuthSession>) + Send + Sync>;

/// Handle to an auth-state subscription. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// External authentication collaborator.
pub trait AuthProvider: Send + Sync {
    /// Currently signed-in user, if a session exists.
    fn current_user(&self) -> AuthResult<Option<AuthUser>>;

    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession>;

    fn sign_out(&self) -> AuthResult<()>;

    /// Register a handler for every auth state change.
    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription;
}
