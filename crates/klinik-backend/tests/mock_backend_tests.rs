//! End-to-end shell tests against the mock backend.

use std::sync::Arc;

use klinik_backend::MockBackend;
use klinik_core::models::{Gender, NotificationKind, PatientDraft};
use klinik_core::shell::{Action, ActionOutcome, ShellSnapshot};
use klinik_core::{App, AppConfig, MutationOutcome, ServiceError, ShellPhase, ViewState, ViewTag};

fn app_for(backend: &Arc<MockBackend>) -> App {
    App::new(backend.clone(), backend.clone(), AppConfig::default())
}

#[test]
fn test_login_flow_via_events() {
    let backend = Arc::new(MockBackend::new().with_account("rina@clinic.org", "secret"));
    let mut app = app_for(&backend);
    assert_eq!(app.start(), ShellPhase::Unauthenticated);

    let outcome = app.dispatch(Action::SignIn {
        email: "rina@clinic.org".into(),
        password: "secret".into(),
    });
    assert!(matches!(outcome, ActionOutcome::SignedIn(_)));

    // The backend also emitted SIGNED_IN; applying it keeps the same principal.
    assert_eq!(app.phase(), ShellPhase::Authenticated);
    assert_eq!(app.principal().unwrap().name, "rina");
}

#[test]
fn test_existing_session_restored() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    let mut app = app_for(&backend);
    assert_eq!(app.snapshot().phase(), ShellPhase::Loading);
    assert_eq!(app.start(), ShellPhase::Authenticated);
    assert_eq!(app.principal().unwrap().name, "jane");
}

#[test]
fn test_unreachable_backend_at_startup() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    backend.set_unavailable(Some("dns failure"));
    let mut app = app_for(&backend);
    assert_eq!(app.start(), ShellPhase::Unauthenticated);
}

#[test]
fn test_token_refresh_is_ignored() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    let mut app = app_for(&backend);
    app.start();
    app.dispatch(Action::NavigateToPatients);

    backend.refresh_token();
    assert_eq!(app.phase(), ShellPhase::Authenticated);
    assert_eq!(app.view_state().current_view, ViewTag::PatientList);
}

#[test]
fn test_revoked_session_shows_login() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    let mut app = app_for(&backend);
    app.start();
    app.dispatch(Action::NavigateToNewPatient);

    backend.revoke_session();
    assert_eq!(app.snapshot(), ShellSnapshot::Unauthenticated);
    // Only an explicit sign-out resets the router.
    assert_eq!(app.view_state().current_view, ViewTag::NewPatient);
}

#[test]
fn test_sign_out_and_failure() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    let mut app = app_for(&backend);
    app.start();
    app.dispatch(Action::NavigateToPatients);

    backend.set_fail_sign_out(true);
    assert_eq!(app.dispatch(Action::SignOut), ActionOutcome::SignOutFailed);
    assert_eq!(app.phase(), ShellPhase::Authenticated);

    backend.set_fail_sign_out(false);
    assert_eq!(app.dispatch(Action::SignOut), ActionOutcome::SignedOut);
    assert_eq!(app.phase(), ShellPhase::Unauthenticated);
    assert_eq!(app.view_state(), &ViewState::default());
}

#[test]
fn test_patient_creation() {
    let backend = Arc::new(MockBackend::new().with_session("jane@clinic.org"));
    let mut app = app_for(&backend);
    app.start();
    app.dispatch(Action::NavigateToNewPatient);

    backend.fail_next_create(ServiceError::Unavailable("timeout".into()));
    let failed = app.dispatch(Action::SubmitPatient(PatientDraft::new("Ani", Gender::Female)));
    assert!(matches!(failed, ActionOutcome::Mutation(MutationOutcome::Failed(_))));
    assert!(app.patients().is_empty());
    assert!(backend.stored_patients().is_empty());
    assert_eq!(app.view_state().current_view, ViewTag::NewPatient);

    let created = app.dispatch(Action::SubmitPatient(PatientDraft::new("Ani", Gender::Female)));
    let ActionOutcome::Mutation(MutationOutcome::Created(record)) = created else {
        panic!("expected created patient");
    };
    assert_eq!(app.patients(), &[record.clone()]);
    assert_eq!(backend.stored_patients(), vec![record]);
    assert_eq!(app.notification().unwrap().kind, NotificationKind::Success);
    assert_eq!(app.view_state().current_view, ViewTag::PatientList);
}

#[test]
fn test_drop_unsubscribes() {
    let backend = Arc::new(MockBackend::new());
    let app = app_for(&backend);
    assert_eq!(backend.subscriber_count(), 1);
    drop(app);
    assert_eq!(backend.subscriber_count(), 0);
}
