//! Klinik Core Library
//!
//! Headless session and navigation core for a clinic front desk. A native
//! UI renders the snapshots produced here and reports user intents back.
//!
//! # Architecture
//!
//! ```text
//!   Auth backend ──events──► SessionStore ─┐
//!                                          │
//!   Sidebar / screens ──Action──► App ─────┼──► ShellSnapshot ──► native UI
//!                                          │      Loading
//!   Patient form ──draft──► PatientGateway ┘      Unauthenticated (login)
//!                               │                 Authenticated
//!                               ▼                   sidebar + header
//!                        Patient backend            routed content
//!                                                   notification
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Principal, Patient, ViewTag, Notification)
//! - [`session`]: Auth collaborator trait and the session store
//! - [`router`]: View router and content resolution
//! - [`notify`]: Single-slot notification channel
//! - [`gateway`]: Patient creation over the patient-data collaborator
//! - [`shell`]: Composition root and render snapshots
//! - [`db`]: SQLite patient store used in place of the remote backend
//! - [`config`]: User-facing strings and startup policy

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod notify;
pub mod router;
pub mod session;
pub mod shell;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use config::{AppConfig, Messages, RestoreFailurePolicy};
pub use db::{Database, LocalPatientStore};
pub use gateway::{MutationOutcome, PatientGateway, PatientService, ServiceError};
pub use models::{
    AuthSession, AuthUser, Gender, Notification, NotificationKind, Patient, PatientDraft,
    Principal, Role, ScreenDescriptor, ViewTag,
};
pub use notify::NotificationChannel;
pub use router::{resolve, resolve_key, ViewRouter, ViewState};
pub use session::{AuthError, AuthEvent, AuthHandler, AuthProvider, SessionStore, Subscription};
pub use shell::{Action, ActionOutcome, App, ShellPhase, ShellSnapshot};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum KlinikError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Patient service error: {0}")]
    ServiceError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Callback error: {0}")]
    CallbackError(String),
}

impl From<db::DbError> for KlinikError {
    fn from(e: db::DbError) -> Self {
        KlinikError::DatabaseError(e.to_string())
    }
}

impl From<config::ConfigError> for KlinikError {
    fn from(e: config::ConfigError) -> Self {
        KlinikError::ConfigError(e.to_string())
    }
}

impl From<AuthError> for KlinikError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials => KlinikError::InvalidCredentials,
            other => KlinikError::AuthError(other.to_string()),
        }
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for KlinikError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        KlinikError::CallbackError(e.reason)
    }
}

impl<T> From<std::sync::PoisonError<T>> for KlinikError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        KlinikError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

impl From<KlinikError> for AuthError {
    fn from(e: KlinikError) -> Self {
        match e {
            KlinikError::InvalidCredentials => AuthError::InvalidCredentials,
            KlinikError::CallbackError(reason) => AuthError::Unavailable(reason),
            other => AuthError::Backend(other.to_string()),
        }
    }
}

impl From<KlinikError> for ServiceError {
    fn from(e: KlinikError) -> Self {
        match e {
            KlinikError::InvalidInput(reason) => ServiceError::Validation(reason),
            KlinikError::CallbackError(reason) => ServiceError::Unavailable(reason),
            other => ServiceError::Backend(other.to_string()),
        }
    }
}

// =========================================================================
// Foreign Collaborators
// =========================================================================

/// Auth backend implemented by the host application.
#[uniffi::export(with_foreign)]
pub trait FfiAuthProvider: Send + Sync {
    fn current_user(&self) -> Result<Option<FfiAuthUser>, KlinikError>;

    fn sign_in(&self, email: String, password: String) -> Result<FfiAuthUser, KlinikError>;

    fn sign_out(&self) -> Result<(), KlinikError>;

    /// Start delivering auth changes to `sink`. Returns a subscription ID.
    fn subscribe(&self, sink: Arc<AuthEventSink>) -> u64;

    fn unsubscribe(&self, subscription_id: u64);
}

/// Patient backend implemented by the host application.
#[uniffi::export(with_foreign)]
pub trait FfiPatientService: Send + Sync {
    fn create_patient(&self, draft: FfiPatientDraft) -> Result<FfiPatient, KlinikError>;
}

/// Receives auth changes from the host for one subscription.
#[derive(uniffi::Object)]
pub struct AuthEventSink {
    handler: AuthHandler,
}

#[uniffi::export]
impl AuthEventSink {
    /// Deliver an auth change. `event` is the backend's event name, e.g.
    /// `SIGNED_IN` or `SIGNED_OUT`.
    pub fn emit(&self, event: String, user: Option<FfiAuthUser>) {
        let session = user.map(|u| AuthSession::from(AuthUser::from(u)));
        (self.handler)(AuthEvent::from_name(&event), session);
    }
}

struct ForeignAuth(Arc<dyn FfiAuthProvider>);

impl AuthProvider for ForeignAuth {
    fn current_user(&self) -> session::AuthResult<Option<AuthUser>> {
        Ok(self.0.current_user()?.map(AuthUser::from))
    }

    fn sign_in(&self, email: &str, password: &str) -> session::AuthResult<AuthSession> {
        let user = self.0.sign_in(email.to_string(), password.to_string())?;
        Ok(AuthUser::from(user).into())
    }

    fn sign_out(&self) -> session::AuthResult<()> {
        Ok(self.0.sign_out()?)
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        let id = self.0.subscribe(Arc::new(AuthEventSink { handler }));
        let provider = self.0.clone();
        Subscription::new(move || provider.unsubscribe(id))
    }
}

struct ForeignPatients(Arc<dyn FfiPatientService>);

impl PatientService for ForeignPatients {
    fn create_patient(&self, draft: &PatientDraft) -> gateway::ServiceResult<Patient> {
        let patient = self.0.create_patient(draft.clone().into())?;
        Ok(patient.into())
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

fn parse_config(config_json: Option<String>) -> Result<AppConfig, KlinikError> {
    match config_json {
        Some(json) => Ok(AppConfig::from_json(&json)?),
        None => Ok(AppConfig::default()),
    }
}

/// Create a core backed by host-provided auth and patient services.
#[uniffi::export]
pub fn create_core(
    auth: Arc<dyn FfiAuthProvider>,
    patients: Arc<dyn FfiPatientService>,
    config_json: Option<String>,
) -> Result<Arc<KlinikCore>, KlinikError> {
    let config = parse_config(config_json)?;
    let app = App::new(
        Arc::new(ForeignAuth(auth)),
        Arc::new(ForeignPatients(patients)),
        config,
    );
    Ok(Arc::new(KlinikCore {
        app: Mutex::new(app),
    }))
}

/// Create a core that stores patients in a local SQLite file.
#[uniffi::export]
pub fn create_core_with_local_store(
    auth: Arc<dyn FfiAuthProvider>,
    db_path: String,
    config_json: Option<String>,
) -> Result<Arc<KlinikCore>, KlinikError> {
    let config = parse_config(config_json)?;
    let store = LocalPatientStore::open(&db_path)?;
    let app = App::new(Arc::new(ForeignAuth(auth)), Arc::new(store), config);
    Ok(Arc::new(KlinikCore {
        app: Mutex::new(app),
    }))
}

/// Install a log subscriber. Returns false if one was already installed.
#[uniffi::export]
pub fn install_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe shell wrapper for FFI.
#[derive(uniffi::Object)]
pub struct KlinikCore {
    app: Mutex<App>,
}

#[uniffi::export]
impl KlinikCore {
    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Restore the startup session.
    pub fn start(&self) -> Result<FfiShellPhase, KlinikError> {
        let mut app = self.app.lock()?;
        Ok(app.start().into())
    }

    /// Apply queued auth events; returns how many were applied.
    pub fn pump_events(&self) -> Result<u64, KlinikError> {
        let mut app = self.app.lock()?;
        Ok(u64::try_from(app.pump_events()).unwrap_or(u64::MAX))
    }

    /// Current frame.
    pub fn snapshot(&self) -> Result<FfiShell, KlinikError> {
        let mut app = self.app.lock()?;
        Ok(app.snapshot().into())
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub fn click_menu(&self, key: String) -> Result<(), KlinikError> {
        self.dispatch(Action::MenuClicked(key)).map(|_| ())
    }

    pub fn navigate_to_patients(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::NavigateToPatients).map(|_| ())
    }

    pub fn navigate_to_new_patient(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::NavigateToNewPatient).map(|_| ())
    }

    pub fn navigate_to_dashboard(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::NavigateToDashboard).map(|_| ())
    }

    pub fn cancel_patient_form(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::CancelPatientForm).map(|_| ())
    }

    /// The patient form's "to patients" link. Leaves the sidebar highlight.
    pub fn show_patient_list(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::ShowPatientList).map(|_| ())
    }

    pub fn select_patient(&self, patient: FfiPatient) -> Result<(), KlinikError> {
        match self.dispatch(Action::SelectPatient(patient.into()))? {
            ActionOutcome::Applied => Ok(()),
            other => Err(outcome_error(other)),
        }
    }

    // =========================================================================
    // Patients & Notifications
    // =========================================================================

    /// Submit the patient form. Backend failures are reported in the
    /// outcome and as an error notification, not as an `Err`.
    ///
    /// The shell lock is released while the patient backend is called, so
    /// `snapshot` and the other methods stay responsive during the round trip.
    pub fn submit_patient(&self, draft: FfiPatientDraft) -> Result<FfiMutationOutcome, KlinikError> {
        let service = self.app.lock()?.begin_submit().map_err(not_available)?;
        let result = service.create_patient(&draft.into());
        match self.app.lock()?.finish_submit(result) {
            ActionOutcome::Mutation(outcome) => Ok(outcome.into()),
            other => Err(outcome_error(other)),
        }
    }

    pub fn show_notification(
        &self,
        kind: FfiNotificationKind,
        message: String,
    ) -> Result<(), KlinikError> {
        self.dispatch(Action::ShowNotification(kind.into(), message)).map(|_| ())
    }

    pub fn dismiss_notification(&self) -> Result<(), KlinikError> {
        self.dispatch(Action::DismissNotification).map(|_| ())
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Sign in from the login surface. The shell lock is held for the
    /// duration of the auth backend call.
    pub fn sign_in(&self, email: String, password: String) -> Result<FfiPrincipal, KlinikError> {
        match self.dispatch(Action::SignIn { email, password })? {
            ActionOutcome::SignedIn(principal) => Ok(principal.into()),
            ActionOutcome::SignInFailed(e) => Err(e.into()),
            other => Err(outcome_error(other)),
        }
    }

    /// Report a login the host's own surface completed.
    pub fn logged_in(&self, principal: FfiPrincipal) -> Result<FfiPrincipal, KlinikError> {
        match self.dispatch(Action::LoggedIn(principal.try_into()?))? {
            ActionOutcome::SignedIn(principal) => Ok(principal.into()),
            other => Err(outcome_error(other)),
        }
    }

    /// Returns false when the backend refused or nobody is signed in. The
    /// shell lock is held for the duration of the auth backend call.
    pub fn sign_out(&self) -> Result<bool, KlinikError> {
        Ok(self.dispatch(Action::SignOut)? == ActionOutcome::SignedOut)
    }
}

impl KlinikCore {
    fn dispatch(&self, action: Action) -> Result<ActionOutcome, KlinikError> {
        let mut app = self.app.lock()?;
        Ok(app.dispatch(action))
    }
}

fn not_available(phase: ShellPhase) -> KlinikError {
    KlinikError::InvalidInput(format!("Not available while {:?}", phase))
}

fn outcome_error(outcome: ActionOutcome) -> KlinikError {
    match outcome {
        ActionOutcome::Ignored(phase) => not_available(phase),
        other => KlinikError::InvalidInput(format!("Unexpected outcome: {:?}", other)),
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe auth user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAuthUser {
    pub id: String,
    pub email: Option<String>,
}

impl From<FfiAuthUser> for AuthUser {
    fn from(user: FfiAuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

/// FFI-safe principal.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrincipal {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
}

impl TryFrom<FfiPrincipal> for Principal {
    type Error = KlinikError;

    fn try_from(principal: FfiPrincipal) -> Result<Self, Self::Error> {
        let role = Role::parse(&principal.role)
            .ok_or_else(|| KlinikError::InvalidInput(format!("Unknown role: {}", principal.role)))?;
        Ok(Self {
            id: principal.id,
            name: principal.name,
            email: principal.email,
            role,
        })
    }
}

impl From<Principal> for FfiPrincipal {
    fn from(principal: Principal) -> Self {
        Self {
            id: principal.id,
            name: principal.name,
            email: principal.email,
            role: principal.role.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiGender {
    Male,
    Female,
}

impl From<FfiGender> for Gender {
    fn from(gender: FfiGender) -> Self {
        match gender {
            FfiGender::Male => Gender::Male,
            FfiGender::Female => Gender::Female,
        }
    }
}

impl From<Gender> for FfiGender {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Male => FfiGender::Male,
            Gender::Female => FfiGender::Female,
        }
    }
}

/// FFI-safe patient draft.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDraft {
    pub name: String,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: FfiGender,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl From<FfiPatientDraft> for PatientDraft {
    fn from(draft: FfiPatientDraft) -> Self {
        Self {
            name: draft.name,
            national_id: draft.national_id,
            date_of_birth: draft.date_of_birth,
            gender: draft.gender.into(),
            address: draft.address,
            phone: draft.phone,
        }
    }
}

impl From<PatientDraft> for FfiPatientDraft {
    fn from(draft: PatientDraft) -> Self {
        Self {
            name: draft.name,
            national_id: draft.national_id,
            date_of_birth: draft.date_of_birth,
            gender: draft.gender.into(),
            address: draft.address,
            phone: draft.phone,
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: FfiGender,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            national_id: patient.national_id,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender.into(),
            address: patient.address,
            phone: patient.phone,
            created_at: patient.created_at,
        }
    }
}

impl From<FfiPatient> for Patient {
    fn from(patient: FfiPatient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            national_id: patient.national_id,
            date_of_birth: patient.date_of_birth,
            gender: patient.gender.into(),
            address: patient.address,
            phone: patient.phone,
            created_at: patient.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, uniffi::Enum)]
pub enum FfiNotificationKind {
    Success,
    Error,
}

impl From<FfiNotificationKind> for NotificationKind {
    fn from(kind: FfiNotificationKind) -> Self {
        match kind {
            FfiNotificationKind::Success => NotificationKind::Success,
            FfiNotificationKind::Error => NotificationKind::Error,
        }
    }
}

impl From<NotificationKind> for FfiNotificationKind {
    fn from(kind: NotificationKind) -> Self {
        match kind {
            NotificationKind::Success => FfiNotificationKind::Success,
            NotificationKind::Error => FfiNotificationKind::Error,
        }
    }
}

/// FFI-safe notification.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiNotification {
    pub kind: FfiNotificationKind,
    pub message: String,
}

impl From<Notification> for FfiNotification {
    fn from(notification: Notification) -> Self {
        Self {
            kind: notification.kind.into(),
            message: notification.message,
        }
    }
}

/// FFI-safe create result.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiMutationOutcome {
    Created { patient: FfiPatient },
    Failed { message: String },
}

impl From<MutationOutcome> for FfiMutationOutcome {
    fn from(outcome: MutationOutcome) -> Self {
        match outcome {
            MutationOutcome::Created(patient) => FfiMutationOutcome::Created {
                patient: patient.into(),
            },
            MutationOutcome::Failed(message) => FfiMutationOutcome::Failed { message },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiShellPhase {
    Loading,
    Unauthenticated,
    Authenticated,
}

impl From<ShellPhase> for FfiShellPhase {
    fn from(phase: ShellPhase) -> Self {
        match phase {
            ShellPhase::Loading => FfiShellPhase::Loading,
            ShellPhase::Unauthenticated => FfiShellPhase::Unauthenticated,
            ShellPhase::Authenticated => FfiShellPhase::Authenticated,
        }
    }
}

/// FFI-safe sidebar entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSidebarItem {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// FFI-safe authenticated shell.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAuthenticatedShell {
    pub principal: FfiPrincipal,
    pub sidebar: Vec<FfiSidebarItem>,
    pub current_view: String,
    pub active_menu: String,
    pub screen: String,
    pub callbacks: Vec<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub notification: Option<FfiNotification>,
    pub patients: Vec<FfiPatient>,
}

impl From<shell::AuthenticatedShell> for FfiAuthenticatedShell {
    fn from(shell: shell::AuthenticatedShell) -> Self {
        Self {
            principal: shell.header.principal.into(),
            sidebar: shell
                .sidebar
                .into_iter()
                .map(|item| FfiSidebarItem {
                    key: item.key,
                    label: item.label,
                    active: item.active,
                })
                .collect(),
            current_view: shell.view.current_view.as_str().to_string(),
            active_menu: shell.view.active_menu,
            screen: shell.content.screen.as_str().to_string(),
            callbacks: shell
                .content
                .callbacks
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            title: shell.content.title,
            subtitle: shell.content.subtitle,
            notification: shell.notification.map(Into::into),
            patients: shell.patients.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe render snapshot.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiShell {
    Loading { message: String },
    Unauthenticated,
    Authenticated { shell: FfiAuthenticatedShell },
}

impl From<ShellSnapshot> for FfiShell {
    fn from(snapshot: ShellSnapshot) -> Self {
        match snapshot {
            ShellSnapshot::Loading { message } => FfiShell::Loading { message },
            ShellSnapshot::Unauthenticated => FfiShell::Unauthenticated,
            ShellSnapshot::Authenticated(shell) => FfiShell::Authenticated {
                shell: shell.into(),
            },
        }
    }
}
