//! Shell flow integration tests.
//!
//! These drive the composition root end to end against the SQLite patient
//! store and a scripted auth backend.

use std::sync::{Arc, Mutex};

use klinik_core::models::{AuthSession, AuthUser, Gender, NotificationKind, PatientDraft};
use klinik_core::session::{AuthHandler, AuthProvider, AuthResult, Subscription};
use klinik_core::shell::{Action, ActionOutcome, ShellSnapshot};
use klinik_core::{
    AppConfig, App, AuthError, LocalPatientStore, MutationOutcome, ScreenDescriptor, ShellPhase,
    ViewTag,
};

/// Auth backend with an optional existing session.
struct ScriptedAuth {
    existing: Option<AuthUser>,
    handler: Arc<Mutex<Option<AuthHandler>>>,
}

impl ScriptedAuth {
    fn new(existing: Option<AuthUser>) -> Self {
        Self {
            existing,
            handler: Arc::new(Mutex::new(None)),
        }
    }

    fn is_subscribed(&self) -> bool {
        self.handler.lock().unwrap().is_some()
    }
}

impl AuthProvider for ScriptedAuth {
    fn current_user(&self) -> AuthResult<Option<AuthUser>> {
        Ok(self.existing.clone())
    }

    fn sign_in(&self, email: &str, password: &str) -> AuthResult<AuthSession> {
        if password.is_empty() {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(AuthUser::new("front-desk-1", Some(email)).into())
    }

    fn sign_out(&self) -> AuthResult<()> {
        Ok(())
    }

    fn on_auth_state_change(&self, handler: AuthHandler) -> Subscription {
        *self.handler.lock().unwrap() = Some(handler);
        let slot = self.handler.clone();
        Subscription::new(move || {
            slot.lock().unwrap().take();
        })
    }
}

fn make_app(existing: Option<AuthUser>) -> (App, Arc<ScriptedAuth>) {
    let auth = Arc::new(ScriptedAuth::new(existing));
    let store = Arc::new(LocalPatientStore::open_in_memory().unwrap());
    (App::new(auth.clone(), store, AppConfig::default()), auth)
}

fn phases_through_start(app: &mut App) -> Vec<ShellPhase> {
    let before = app.snapshot().phase();
    app.start();
    vec![before, app.snapshot().phase()]
}

#[test]
fn test_startup_without_session_shows_login() {
    let (mut app, _) = make_app(None);
    assert_eq!(
        phases_through_start(&mut app),
        vec![ShellPhase::Loading, ShellPhase::Unauthenticated]
    );
}

#[test]
fn test_startup_with_session_shows_shell() {
    let (mut app, _) = make_app(Some(AuthUser::new("u-jane", Some("jane@clinic.org"))));
    assert_eq!(
        phases_through_start(&mut app),
        vec![ShellPhase::Loading, ShellPhase::Authenticated]
    );
    assert_eq!(app.principal().unwrap().name, "jane");
}

#[test]
fn test_register_patient_flow() {
    let (mut app, _) = make_app(None);
    app.start();

    let signed_in = app.dispatch(Action::SignIn {
        email: "admin@klinik.id".into(),
        password: "rahasia".into(),
    });
    assert!(matches!(signed_in, ActionOutcome::SignedIn(_)));

    // Registration screen → new patient form
    app.dispatch(Action::NavigateToNewPatient);
    let mut draft = PatientDraft::new("Dewi Lestari", Gender::Female);
    draft.national_id = Some("3273010101900003".into());
    draft.phone = Some("0813000000".into());

    let outcome = app.dispatch(Action::SubmitPatient(draft.clone()));
    let ActionOutcome::Mutation(MutationOutcome::Created(record)) = outcome else {
        panic!("expected created patient");
    };
    assert_eq!(record.name, draft.name);

    let ShellSnapshot::Authenticated(shell) = app.snapshot() else {
        panic!("expected authenticated shell");
    };
    assert_eq!(shell.content.screen, ScreenDescriptor::PatientList);
    assert_eq!(shell.patients, vec![record]);
    assert_eq!(shell.notification.as_ref().unwrap().kind, NotificationKind::Success);

    // Same NIK again is rejected by the store
    app.dispatch(Action::NavigateToNewPatient);
    let duplicate = app.dispatch(Action::SubmitPatient(draft));
    assert!(matches!(
        duplicate,
        ActionOutcome::Mutation(MutationOutcome::Failed(_))
    ));
    assert_eq!(app.patients().len(), 1);
    assert_eq!(app.view_state().current_view, ViewTag::NewPatient);
    assert_eq!(app.notification().unwrap().kind, NotificationKind::Error);
}

#[test]
fn test_sign_in_rejected() {
    let (mut app, _) = make_app(None);
    app.start();

    let outcome = app.dispatch(Action::SignIn {
        email: "admin@klinik.id".into(),
        password: String::new(),
    });
    assert_eq!(outcome, ActionOutcome::SignInFailed(AuthError::InvalidCredentials));
    assert_eq!(app.phase(), ShellPhase::Unauthenticated);
}

#[test]
fn test_teardown_releases_subscription() {
    let (app, auth) = make_app(None);
    assert!(auth.is_subscribed());
    drop(app);
    assert!(!auth.is_subscribed());
}
