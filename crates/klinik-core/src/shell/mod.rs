//! Composition root.
//!
//! [`App`] owns every piece of front-desk state. Renderers read immutable
//! [`ShellSnapshot`]s and report user intents back through
//! [`App::dispatch`].
//!
//! ```text
//! auth events ──► SessionStore ──► phase (Loading / Unauthenticated / Authenticated)
//! Action ──► ViewRouter ─────────► routed content
//! SubmitPatient ──► PatientGateway ──► NotificationChannel + ViewRouter
//! ```

mod action;
mod snapshot;

pub use action::*;
pub use snapshot::*;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::gateway::{PatientGateway, PatientService, ServiceResult};
use crate::models::{Notification, Patient, Principal};
use crate::notify::NotificationChannel;
use crate::router::{ViewRouter, ViewState};
use crate::session::{AuthProvider, SessionStore};

pub struct App {
    config: AppConfig,
    session: SessionStore,
    router: ViewRouter,
    notifications: NotificationChannel,
    gateway: PatientGateway,
}

impl App {
    /// Build the shell and subscribe to auth changes. The subscription is
    /// released when the app is dropped.
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        patients: Arc<dyn PatientService>,
        config: AppConfig,
    ) -> Self {
        Self {
            config,
            session: SessionStore::new(auth),
            router: ViewRouter::new(),
            notifications: NotificationChannel::new(),
            gateway: PatientGateway::new(patients),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Restore the startup session. Only the first call queries the auth
    /// collaborator.
    pub fn start(&mut self) -> ShellPhase {
        self.session.restore_session(self.config.restore_failure);
        self.pump_events();
        let phase = self.current_phase();
        info!(?phase, "shell started");
        phase
    }

    /// Apply queued auth events.
    pub fn pump_events(&mut self) -> usize {
        self.session.pump_events()
    }

    pub fn phase(&mut self) -> ShellPhase {
        self.pump_events();
        self.current_phase()
    }

    fn current_phase(&self) -> ShellPhase {
        if self.session.is_loading() {
            ShellPhase::Loading
        } else if self.session.principal().is_some() {
            ShellPhase::Authenticated
        } else {
            ShellPhase::Unauthenticated
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.session.principal()
    }

    pub fn view_state(&self) -> &ViewState {
        self.router.state()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn patients(&self) -> &[Patient] {
        self.gateway.patients()
    }

    /// Everything a renderer needs for the current frame.
    pub fn snapshot(&mut self) -> ShellSnapshot {
        self.pump_events();
        match (self.current_phase(), self.session.principal()) {
            (ShellPhase::Authenticated, Some(principal)) => {
                let view = self.router.state().clone();
                ShellSnapshot::Authenticated(AuthenticatedShell {
                    header: Header {
                        principal: principal.clone(),
                    },
                    sidebar: snapshot::sidebar(&view.active_menu),
                    content: Content::for_screen(self.router.resolve_current(), &self.config.messages),
                    view,
                    notification: self.notifications.current().cloned(),
                    patients: self.gateway.patients().to_vec(),
                })
            }
            (ShellPhase::Loading, _) => ShellSnapshot::Loading {
                message: self.config.messages.loading.clone(),
            },
            _ => ShellSnapshot::Unauthenticated,
        }
    }

    /// Phase check for a submission whose backend call runs outside the
    /// caller's lock. Pair with [`App::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<Arc<dyn PatientService>, ShellPhase> {
        match self.phase() {
            ShellPhase::Authenticated => Ok(self.gateway.service()),
            phase => {
                warn!(?phase, "patient submission ignored");
                Err(phase)
            }
        }
    }

    /// Apply a result obtained after [`App::begin_submit`]. A result that
    /// arrives once the shell has left the authenticated phase is dropped.
    pub fn finish_submit(&mut self, result: ServiceResult<Patient>) -> ActionOutcome {
        match self.phase() {
            ShellPhase::Authenticated => ActionOutcome::Mutation(self.gateway.apply(
                result,
                &mut self.notifications,
                &mut self.router,
                &self.config.messages,
            )),
            phase => {
                warn!(?phase, "submission finished after sign-out, result dropped");
                ActionOutcome::Ignored(phase)
            }
        }
    }

    pub fn dispatch(&mut self, action: Action) -> ActionOutcome {
        self.pump_events();
        debug!(action = action.name(), "dispatch");

        if let Some(required) = action.required_phase() {
            let phase = self.current_phase();
            if phase != required {
                warn!(action = action.name(), ?phase, "action not valid in this phase");
                return ActionOutcome::Ignored(phase);
            }
        }

        match action {
            Action::MenuClicked(key) => self.router.on_menu_click(&key),
            Action::NavigateToPatients => self.router.to_patients(),
            Action::NavigateToNewPatient => self.router.to_new_patient(),
            Action::NavigateToDashboard => self.router.to_dashboard(),
            Action::CancelPatientForm | Action::ShowPatientList => {
                self.router.show_patient_list_only()
            }
            Action::SelectPatient(patient) => {
                info!(patient_id = %patient.id, "selected patient");
                self.router.to_dashboard();
            }
            Action::ShowNotification(kind, message) => self.notifications.show(kind, message),
            Action::DismissNotification => self.notifications.dismiss(),
            Action::SubmitPatient(draft) => {
                let outcome = self.gateway.create(
                    draft,
                    &mut self.notifications,
                    &mut self.router,
                    &self.config.messages,
                );
                return ActionOutcome::Mutation(outcome);
            }
            Action::SignIn { email, password } => {
                return match self.session.sign_in(&email, &password) {
                    Ok(principal) => ActionOutcome::SignedIn(principal),
                    Err(e) => ActionOutcome::SignInFailed(e),
                };
            }
            Action::LoggedIn(principal) => {
                self.session.set_principal(principal.clone());
                return ActionOutcome::SignedIn(principal);
            }
            Action::SignOut => {
                if self.session.sign_out() {
                    self.router.reset();
                    return ActionOutcome::SignedOut;
                }
                return ActionOutcome::SignOutFailed;
            }
        }
        ActionOutcome::Applied
    }
}
