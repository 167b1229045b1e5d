//! User intents fed back from rendered screens.

use crate::gateway::MutationOutcome;
use crate::models::{NotificationKind, Patient, PatientDraft, Principal};
use crate::session::AuthError;

use super::ShellPhase;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Sidebar entry clicked
    MenuClicked(String),
    NavigateToPatients,
    NavigateToNewPatient,
    /// Returns to the registration screen
    NavigateToDashboard,
    SubmitPatient(PatientDraft),
    /// Patient form cancel
    CancelPatientForm,
    /// Patient form "to patients"; keeps the sidebar highlight
    ShowPatientList,
    SelectPatient(Patient),
    ShowNotification(NotificationKind, String),
    DismissNotification,
    SignIn { email: String, password: String },
    /// The login surface authenticated on its own
    LoggedIn(Principal),
    SignOut,
}

impl Action {
    /// Short name for logging. Never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Action::MenuClicked(_) => "menu-clicked",
            Action::NavigateToPatients => "navigate-to-patients",
            Action::NavigateToNewPatient => "navigate-to-new-patient",
            Action::NavigateToDashboard => "navigate-to-dashboard",
            Action::SubmitPatient(_) => "submit-patient",
            Action::CancelPatientForm => "cancel-patient-form",
            Action::ShowPatientList => "show-patient-list",
            Action::SelectPatient(_) => "select-patient",
            Action::ShowNotification(..) => "show-notification",
            Action::DismissNotification => "dismiss-notification",
            Action::SignIn { .. } => "sign-in",
            Action::LoggedIn(_) => "logged-in",
            Action::SignOut => "sign-out",
        }
    }

    /// Phase the action is only valid in. Navigation and notifications
    /// are accepted in every phase.
    pub fn required_phase(&self) -> Option<ShellPhase> {
        match self {
            Action::SubmitPatient(_) | Action::SelectPatient(_) | Action::SignOut => {
                Some(ShellPhase::Authenticated)
            }
            Action::SignIn { .. } | Action::LoggedIn(_) => Some(ShellPhase::Unauthenticated),
            _ => None,
        }
    }
}

/// What an action did, for callers that need to react to it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// State updated, nothing else to report
    Applied,
    Mutation(MutationOutcome),
    SignedIn(Principal),
    SignInFailed(AuthError),
    SignedOut,
    /// Sign-out failed; the shell stays authenticated
    SignOutFailed,
    /// Not valid in the current phase; nothing was changed
    Ignored(ShellPhase),
}
