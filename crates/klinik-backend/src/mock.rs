//! In-memory backend for testing without a network connection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;
use tracing::debug;

use klinik_core::gateway::{PatientService, ServiceError, ServiceResult};
use klinik_core::models::{AuthSession, AuthUser, Patient, PatientDraft};
use klinik_core::session::{AuthError, AuthEvent, AuthHandler, AuthProvider, AuthResult, Subscription};

use crate::wire;

type Handlers = Arc<Mutex<HashMap<u64, Arc<AuthHandler>>>>;

#[derive(Default)]
struct MockState {
    /// email → (user id, password)
    accounts: HashMap<String, (String, String)>,
    session: Option<AuthSession>,
    /// Stored rows, as the backend would return them
    rows: Vec<Value>,
    next_subscription: u64,
    unavailable: Option<String>,
    fail_next_create: Option<ServiceError>,
    fail_sign_out: bool,
}

/// Mock auth + patient backend. Emits `SIGNED_IN` / `SIGNED_OUT` to
/// subscribers the way the hosted service does.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    handlers: Handlers,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign in.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        let id = uuid::Uuid::new_v4().to_string();
        self.lock()
            .accounts
            .insert(email.to_string(), (id, password.to_string()));
        self
    }

    /// Start with `email` already signed in.
    pub fn with_session(self, email: &str) -> Self {
        {
            let mut state = self.lock();
            let id = state
                .accounts
                .get(email)
                .map(|(id, _)| id.clone())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            state.session = Some(AuthUser::new(id, Some(email)).into());
        }
        self
    }

    /// Make every auth call fail as if the service were unreachable.
    pub fn set_unavailable(&self, reason: Option<&str>) {
        self.lock().unavailable = reason.map(str::to_string);
    }

    pub fn fail_next_create(&self, error: ServiceError) {
        self.lock().fail_next_create = Some(error);
    }

    pub fn set_fail_sign_out(&self, fail: bool) {
        self.lock().fail_sign_out = fail;
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers_lock().len()
    }

    /// Stored patients, decoded from their rows.
    pub fn stored_patients(&self) -> Vec<Patient> {
        self.lock()
            .rows
            .iter()
            .filter_map(|row| serde_json::from_value::<wire::PatientRow>(row.clone()).ok())
            .filter_map(|row| row.try_into().ok())
            .collect()
    }

    /// Emit a session refresh, which the shell must ignore.
    pub fn refresh_token(&self) {
        let session = self.lock().session.clone();
        self.emit(AuthEvent::Other("TOKEN_REFRESHED".into()), session);
    }

    /// Emit a server-side sign-out (session revoked elsewhere).
    pub fn revoke_session(&self) {
        self.lock().session = None;
        self.emit(AuthEvent::SignedOut, None);
    }

    fn emit(&self, event: AuthEvent, session: Option<AuthSession>) {
        // Snapshot the handlers so none run under the lock.
        let handlers: Vec<_> = self.handlers_lock().values().cloned().collect();
        debug!(event = event.name(), subscribers = handlers.len(), "emitting auth event");
        for handler in handlers {
            (*handler)(event.clone(), session.clone());
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn handlers_lock(&self) -> MutexGuard<'_, HashMap<u64, Arc<AuthHandler>>> {
        self.handlers.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> AuthResult<()> {
        match &self.lock().unavailable {
            Some(reason) => Err(AuthError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }
}

impl AuthProvider for MockBackend {
    fn current_user(&self) -> AuthResult<Option<AuthUser>> {
        self.check_available()?;
        Ok(self.lock().session.as_ref().map(|s| s.user.clone()))
    }

    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        self.check_available()?;
        let session: AuthSession = {
            let mut state = self.lock();
            let id = match state.accounts.get(email) {
                Some((id, expected)) if expected == password => id.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            };
            let session: AuthSession = AuthUser::new(id, Some(email)).into();
            state.session = Some(session.clone());
            session
        };
        self.emit(AuthEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    fn sign_out(&self) -> AuthResult<()> {
        self.check_available()?;
        {
            let mut state = self.lock();
            if state.fail_sign_out {
                return Err(AuthError::Backend("sign-out rejected".into()));
            }
            state.session = None;
        }
        self.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        let id = {
            let mut state = self.lock();
            state.next_subscription += 1;
            state.next_subscription
        };
        self.handlers_lock().insert(id, Arc::new(handler));

        let handlers = self.handlers.clone();
        Subscription::new(move || {
            handlers.lock().unwrap_or_else(|e| e.into_inner()).remove(&id);
        })
    }
}

impl PatientService for MockBackend {
    fn create_patient(&self, draft: &PatientDraft) -> ServiceResult<Patient> {
        let mut state = self.lock();
        if let Some(error) = state.fail_next_create.take() {
            return Err(error);
        }
        if draft.name.trim().is_empty() {
            return Err(ServiceError::Validation("name is required".into()));
        }

        let mut row = wire::draft_to_insert(draft);
        row["id"] = Value::String(uuid::Uuid::new_v4().to_string());
        row["created_at"] = Value::String(chrono::Utc::now().to_rfc3339());

        let response = serde_json::json!({ "data": row.clone(), "error": null }).to_string();
        let patient =
            wire::parse_patient_row(&response).map_err(|e| ServiceError::Backend(e.to_string()))?;
        state.rows.push(row);
        Ok(patient)
    }
}
