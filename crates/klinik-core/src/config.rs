//! Application configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// What the shell does when the startup session query fails.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RestoreFailurePolicy {
    /// Treat the failure as "no session" and show the login surface
    #[default]
    SignedOut,
    /// Keep the loading spinner up
    StayLoading,
}

/// User-facing strings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub patient_saved: String,
    pub patient_save_failed: String,
    pub loading: String,
    pub dashboard_title: String,
    pub dashboard_subtitle: String,
    pub report_title: String,
    pub report_subtitle: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            patient_saved: "Data pasien berhasil disimpan".into(),
            patient_save_failed: "Gagal menyimpan data pasien".into(),
            loading: "Memuat...".into(),
            dashboard_title: "Dashboard".into(),
            dashboard_subtitle: "Selamat datang di Sistem Klinik".into(),
            report_title: "Laporan Kunjungan".into(),
            report_subtitle: "Fitur laporan kunjungan akan segera tersedia".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub messages: Messages,
    pub restore_failure: RestoreFailurePolicy,
}

impl AppConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load config from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let config = Self::from_json(&std::fs::read_to_string(path)?)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
