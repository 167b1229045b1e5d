//! View router: current view plus sidebar highlight.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{ScreenDescriptor, ViewTag};

/// Router state. Both fields are always read as a pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ViewState {
    pub current_view: ViewTag,
    /// Sidebar highlight key; not necessarily a view tag
    pub active_menu: String,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_view: ViewTag::Registration,
            active_menu: ViewTag::Registration.as_str().to_string(),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ViewRouter {
    state: ViewState,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn current_view(&self) -> ViewTag {
        self.state.current_view
    }

    pub fn active_menu(&self) -> &str {
        &self.state.active_menu
    }

    /// Set view and highlight together.
    pub fn navigate(&mut self, view: ViewTag, menu: &str) {
        debug!(%view, menu, "navigate");
        self.state = ViewState {
            current_view: view,
            active_menu: menu.to_string(),
        };
    }

    /// Sidebar click: highlight the key and select the view it maps to.
    pub fn on_menu_click(&mut self, key: &str) {
        let view = ViewTag::from_menu_key(key);
        if view.as_str() != key {
            debug!(key, "menu key names no view, falling back to registration");
        }
        self.navigate(view, key);
    }

    pub fn to_patients(&mut self) {
        self.navigate(ViewTag::PatientList, ViewTag::PatientList.as_str());
    }

    /// The form sits under the patient list menu entry.
    pub fn to_new_patient(&mut self) {
        self.navigate(ViewTag::NewPatient, ViewTag::PatientList.as_str());
    }

    /// Despite the name, this returns to the registration screen.
    pub fn to_dashboard(&mut self) {
        self.navigate(ViewTag::Registration, ViewTag::Registration.as_str());
    }

    /// Show the patient list without touching the highlight. Used by the
    /// patient form's cancel and back callbacks.
    pub fn show_patient_list_only(&mut self) {
        self.state.current_view = ViewTag::PatientList;
    }

    pub fn reset(&mut self) {
        self.state = ViewState::default();
    }

    pub fn resolve_current(&self) -> ScreenDescriptor {
        resolve(self.state.current_view)
    }
}

/// Screen rendered for a view tag.
pub fn resolve(view: ViewTag) -> ScreenDescriptor {
    match view {
        ViewTag::Dashboard => ScreenDescriptor::DashboardPlaceholder,
        ViewTag::Registration => ScreenDescriptor::PatientRegistration,
        ViewTag::PatientList => ScreenDescriptor::PatientList,
        ViewTag::NewPatient => ScreenDescriptor::PatientForm,
        ViewTag::Report => ScreenDescriptor::ReportPlaceholder,
    }
}

/// Screen rendered for an arbitrary key; unknown keys render registration.
pub fn resolve_key(key: &str) -> ScreenDescriptor {
    resolve(ViewTag::from_menu_key(key))
}
