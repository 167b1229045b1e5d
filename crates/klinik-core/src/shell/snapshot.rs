//! Immutable render snapshots produced by the shell.

use serde::{Deserialize, Serialize};

use crate::config::Messages;
use crate::models::{
    Notification, Patient, Principal, ScreenCallback, ScreenDescriptor, SIDEBAR_MENU,
};
use crate::router::ViewState;

/// Coarse shell state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ShellPhase {
    Loading,
    Unauthenticated,
    Authenticated,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "phase", rename_all = "kebab-case")]
pub enum ShellSnapshot {
    /// Blocking spinner
    Loading { message: String },
    /// Login surface only
    Unauthenticated,
    Authenticated(AuthenticatedShell),
}

impl ShellSnapshot {
    pub fn phase(&self) -> ShellPhase {
        match self {
            ShellSnapshot::Loading { .. } => ShellPhase::Loading,
            ShellSnapshot::Unauthenticated => ShellPhase::Unauthenticated,
            ShellSnapshot::Authenticated(_) => ShellPhase::Authenticated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedShell {
    pub header: Header,
    pub sidebar: Vec<SidebarItem>,
    pub view: ViewState,
    pub content: Content,
    pub notification: Option<Notification>,
    /// Patients created in this session
    pub patients: Vec<Patient>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Header {
    pub principal: Principal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidebarItem {
    pub key: String,
    pub label: String,
    pub active: bool,
}

/// Routed content area.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub screen: ScreenDescriptor,
    pub callbacks: Vec<ScreenCallback>,
    /// Set for the static placeholder panels only
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

impl Content {
    pub fn for_screen(screen: ScreenDescriptor, messages: &Messages) -> Self {
        let (title, subtitle) = match screen {
            ScreenDescriptor::DashboardPlaceholder => (
                Some(messages.dashboard_title.clone()),
                Some(messages.dashboard_subtitle.clone()),
            ),
            ScreenDescriptor::ReportPlaceholder => (
                Some(messages.report_title.clone()),
                Some(messages.report_subtitle.clone()),
            ),
            _ => (None, None),
        };
        Self {
            screen,
            callbacks: screen.callbacks().to_vec(),
            title,
            subtitle,
        }
    }
}

pub(crate) fn sidebar(active_menu: &str) -> Vec<SidebarItem> {
    SIDEBAR_MENU
        .iter()
        .map(|entry| SidebarItem {
            key: entry.key.to_string(),
            label: entry.label.to_string(),
            active: entry.key == active_menu,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_highlights_active_key() {
        let items = sidebar("patient-list");
        let active: Vec<_> = items.iter().filter(|i| i.active).map(|i| i.key.as_str()).collect();
        assert_eq!(active, vec!["patient-list"]);
    }

    #[test]
    fn test_sidebar_unknown_key_highlights_nothing() {
        assert!(sidebar("pengaturan").iter().all(|i| !i.active));
    }

    #[test]
    fn test_placeholder_content_has_text() {
        let messages = Messages::default();
        let dashboard = Content::for_screen(ScreenDescriptor::DashboardPlaceholder, &messages);
        assert_eq!(dashboard.title.as_deref(), Some("Dashboard"));
        assert_eq!(dashboard.subtitle.as_deref(), Some("Selamat datang di Sistem Klinik"));
        assert!(dashboard.callbacks.is_empty());

        let form = Content::for_screen(ScreenDescriptor::PatientForm, &messages);
        assert!(form.title.is_none());
        assert_eq!(form.callbacks.len(), 4);
    }

    #[test]
    fn test_snapshot_serializes_with_phase_tag() {
        let json = serde_json::to_value(ShellSnapshot::Unauthenticated).unwrap();
        assert_eq!(json["phase"], "unauthenticated");
    }
}
