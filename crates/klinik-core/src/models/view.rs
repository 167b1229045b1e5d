//! View tags, screen descriptors and the sidebar menu.

use serde::{Deserialize, Serialize};

/// Identifier of a routed screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ViewTag {
    Dashboard,
    Registration,
    PatientList,
    Report,
    NewPatient,
}

impl ViewTag {
    pub const ALL: [ViewTag; 5] = [
        ViewTag::Dashboard,
        ViewTag::Registration,
        ViewTag::PatientList,
        ViewTag::Report,
        ViewTag::NewPatient,
    ];

    /// Menu key / wire form of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewTag::Dashboard => "dashboard",
            ViewTag::Registration => "registration",
            ViewTag::PatientList => "patient-list",
            ViewTag::Report => "report",
            ViewTag::NewPatient => "new-patient",
        }
    }

    /// Map a sidebar menu key to the view it selects.
    ///
    /// Total: keys that name no known view select [`ViewTag::Registration`],
    /// the same screen the router falls back to.
    pub fn from_menu_key(key: &str) -> Self {
        match key {
            "dashboard" => ViewTag::Dashboard,
            "registration" => ViewTag::Registration,
            "patient-list" => ViewTag::PatientList,
            "report" => ViewTag::Report,
            "new-patient" => ViewTag::NewPatient,
            _ => ViewTag::Registration,
        }
    }
}

impl std::fmt::Display for ViewTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Callback a rendered screen is allowed to invoke.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenCallback {
    NavigateToPatients,
    NavigateToNewPatient,
    NavigateToDashboard,
    ShowNotification,
    SelectPatient,
    SubmitPatient,
    CancelPatientForm,
    /// Back to the list without moving the sidebar highlight
    ShowPatientList,
}

impl ScreenCallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenCallback::NavigateToPatients => "navigate-to-patients",
            ScreenCallback::NavigateToNewPatient => "navigate-to-new-patient",
            ScreenCallback::NavigateToDashboard => "navigate-to-dashboard",
            ScreenCallback::ShowNotification => "show-notification",
            ScreenCallback::SelectPatient => "select-patient",
            ScreenCallback::SubmitPatient => "submit-patient",
            ScreenCallback::CancelPatientForm => "cancel-patient-form",
            ScreenCallback::ShowPatientList => "show-patient-list",
        }
    }
}

/// Screen selected for the routed content area.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ScreenDescriptor {
    /// Static welcome panel
    DashboardPlaceholder,
    PatientRegistration,
    PatientList,
    PatientForm,
    /// Static "coming soon" visit report panel
    ReportPlaceholder,
}

impl ScreenDescriptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenDescriptor::DashboardPlaceholder => "dashboard-placeholder",
            ScreenDescriptor::PatientRegistration => "patient-registration",
            ScreenDescriptor::PatientList => "patient-list",
            ScreenDescriptor::PatientForm => "patient-form",
            ScreenDescriptor::ReportPlaceholder => "report-placeholder",
        }
    }

    /// Callbacks the screen is wired with.
    pub fn callbacks(&self) -> &'static [ScreenCallback] {
        use ScreenCallback::*;
        match self {
            ScreenDescriptor::DashboardPlaceholder | ScreenDescriptor::ReportPlaceholder => &[],
            ScreenDescriptor::PatientRegistration => &[NavigateToPatients, NavigateToNewPatient],
            ScreenDescriptor::PatientList => &[
                NavigateToDashboard,
                NavigateToNewPatient,
                ShowNotification,
                SelectPatient,
            ],
            ScreenDescriptor::PatientForm => &[
                SubmitPatient,
                CancelPatientForm,
                NavigateToDashboard,
                ShowPatientList,
            ],
        }
    }
}

/// A sidebar menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarEntry {
    pub key: &'static str,
    pub label: &'static str,
}

/// Sidebar entries in display order. The patient form has no entry of its
/// own; it is reached under "patient-list".
pub const SIDEBAR_MENU: [SidebarEntry; 4] = [
    SidebarEntry {
        key: "dashboard",
        label: "Dashboard",
    },
    SidebarEntry {
        key: "registration",
        label: "Pendaftaran Pasien",
    },
    SidebarEntry {
        key: "patient-list",
        label: "Data Pasien",
    },
    SidebarEntry {
        key: "report",
        label: "Laporan Kunjungan",
    },
];
