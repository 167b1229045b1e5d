//! In-crate fakes for the two external collaborators.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::gateway::{PatientService, ServiceError, ServiceResult};
use crate::models::{AuthSession, AuthUser, Patient, PatientDraft};
use crate::session::{AuthError, AuthEvent, AuthHandler, AuthProvider, AuthResult, Subscription};

#[derive(Default)]
struct FakeAuthState {
    user: Option<AuthUser>,
    current_user_calls: usize,
    sign_in_calls: usize,
    sign_out_calls: usize,
    current_user_error: Option<AuthError>,
    sign_in_error: Option<AuthError>,
    sign_out_error: Option<AuthError>,
}

#[derive(Default)]
pub struct FakeAuth {
    state: Mutex<FakeAuthState>,
    handlers: Arc<Mutex<HashMap<u64, AuthHandler>>>,
    next_id: AtomicU64,
}

impl FakeAuth {
    pub fn with_user(user: AuthUser) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().user = Some(user);
        fake
    }

    pub fn fail_current_user(&self, error: AuthError) {
        self.state.lock().unwrap().current_user_error = Some(error);
    }

    pub fn fail_sign_in(&self, error: AuthError) {
        self.state.lock().unwrap().sign_in_error = Some(error);
    }

    pub fn fail_sign_out(&self, error: AuthError) {
        self.state.lock().unwrap().sign_out_error = Some(error);
    }

    pub fn current_user_calls(&self) -> usize {
        self.state.lock().unwrap().current_user_calls
    }

    /// Sign-in and sign-out calls that reached the backend.
    pub fn session_calls(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.sign_in_calls, state.sign_out_calls)
    }

    pub fn active_subscriptions(&self) -> usize {
        self.handlers.lock().unwrap().len()
    }

    /// Deliver an event to every live handler.
    pub fn emit(&self, event: AuthEvent, session: Option<AuthSession>) {
        for handler in self.handlers.lock().unwrap().values() {
            handler(event.clone(), session.clone());
        }
    }
}

impl AuthProvider for FakeAuth {
    fn current_user(&self) -> AuthResult<Option<AuthUser>> {
        let mut state = self.state.lock().unwrap();
        state.current_user_calls += 1;
        match state.current_user_error.clone() {
            Some(e) => Err(e),
            None => Ok(state.user.clone()),
        }
    }

    fn sign_in(&self, email: &str, _password: &str) -> AuthResult<AuthSession> {
        let mut state = self.state.lock().unwrap();
        state.sign_in_calls += 1;
        if let Some(e) = state.sign_in_error.clone() {
            return Err(e);
        }
        let user = AuthUser::new(format!("id-{email}"), Some(email));
        state.user = Some(user.clone());
        Ok(user.into())
    }

    fn sign_out(&self) -> AuthResult<()> {
        let mut state = self.state.lock().unwrap();
        state.sign_out_calls += 1;
        if let Some(e) = state.sign_out_error.clone() {
            return Err(e);
        }
        state.user = None;
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.handlers.lock().unwrap().insert(id, handler);
        let handlers = self.handlers.clone();
        Subscription::new(move || {
            handlers.lock().unwrap().remove(&id);
        })
    }
}

#[derive(Default)]
pub struct FakePatients {
    failure: Mutex<Option<ServiceError>>,
    next_id: AtomicU64,
}

impl FakePatients {
    pub fn fail_with(&self, error: ServiceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Records created so far.
    pub fn created(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst)
    }
}

impl PatientService for FakePatients {
    fn create_patient(&self, draft: &PatientDraft) -> ServiceResult<Patient> {
        if let Some(e) = self.failure.lock().unwrap().clone() {
            return Err(e);
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(draft
            .clone()
            .into_patient(format!("patient-{id}"), "2026-01-01T00:00:00+00:00".into()))
    }
}
