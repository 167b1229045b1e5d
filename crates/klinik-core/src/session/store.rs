//! Session store mirroring auth state into an optional principal.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{AuthEvent, AuthProvider, AuthResult, Subscription};
use crate::config::RestoreFailurePolicy;
use crate::models::{AuthSession, Principal};

type QueuedEvent = (AuthEvent, Option<AuthSession>);

/// Owns the principal and the auth-event subscription.
///
/// Events may be delivered on any thread; they are queued in emission order
/// and applied by [`SessionStore::pump_events`] on the owner's thread.
pub struct SessionStore {
    auth: Arc<dyn AuthProvider>,
    principal: Option<Principal>,
    loading: bool,
    restored: bool,
    events: Receiver<QueuedEvent>,
    // Released when the store is dropped.
    _subscription: Subscription,
}

impl SessionStore {
    /// Subscribe to auth changes. The store starts in the loading state.
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        let (tx, events) = mpsc::channel::<QueuedEvent>();
        let subscription = auth.on_auth_state_change(Box::new(move |event, session| {
            // The receiver is gone once the store is dropped.
            let _ = tx.send((event, session));
        }));
        Self {
            auth,
            principal: None,
            loading: true,
            restored: false,
            events,
            _subscription: subscription,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Query the current session once. Later calls return the current
    /// principal without contacting the collaborator.
    pub fn restore_session(&mut self, on_failure: RestoreFailurePolicy) -> Option<Principal> {
        if self.restored {
            debug!("session already restored");
            return self.principal.clone();
        }
        self.restored = true;

        match self.auth.current_user() {
            Ok(Some(user)) => {
                let principal = Principal::from_user(&user);
                info!(user_id = %principal.id, "restored existing session");
                self.principal = Some(principal);
                self.loading = false;
            }
            Ok(None) => {
                info!("no existing session");
                self.loading = false;
            }
            Err(e) => {
                error!(error = %e, policy = ?on_failure, "session restoration failed");
                if on_failure == RestoreFailurePolicy::SignedOut {
                    self.loading = false;
                }
            }
        }
        self.principal.clone()
    }

    /// Apply one auth state change.
    pub fn on_auth_event(&mut self, event: &AuthEvent, session: Option<&AuthSession>) {
        match (event, session) {
            (AuthEvent::SignedIn, Some(session)) => {
                let principal = Principal::from(session);
                info!(user_id = %principal.id, "signed in");
                self.principal = Some(principal);
            }
            (AuthEvent::SignedIn, None) => {
                warn!("signed-in event without a session, ignoring");
            }
            (AuthEvent::SignedOut, _) => {
                info!("signed out");
                self.principal = None;
            }
            (AuthEvent::Other(name), _) => {
                debug!(event = %name, "ignoring auth event");
            }
        }
    }

    /// Apply all queued auth events. Returns how many were applied.
    pub fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((event, session)) = self.events.try_recv() {
            self.on_auth_event(&event, session.as_ref());
            applied += 1;
        }
        applied
    }

    /// Sign in with email and password.
    pub fn sign_in(&mut self, email: &str, password: &str) -> AuthResult<Principal> {
        match self.auth.sign_in(email, password) {
            Ok(session) => {
                let principal = Principal::from(&session);
                info!(user_id = %principal.id, "sign-in succeeded");
                self.principal = Some(principal.clone());
                Ok(principal)
            }
            Err(e) => {
                warn!(error = %e, "sign-in failed");
                Err(e)
            }
        }
    }

    /// Set the principal directly, as the login surface does after it
    /// authenticated on its own.
    pub fn set_principal(&mut self, principal: Principal) {
        self.principal = Some(principal);
    }

    /// Sign out. On failure the error is logged and the principal is kept.
    pub fn sign_out(&mut self) -> bool {
        match self.auth.sign_out() {
            Ok(()) => {
                self.principal = None;
                true
            }
            Err(e) => {
                error!(error = %e, "error signing out");
                false
            }
        }
    }
}
