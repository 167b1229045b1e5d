//! Patient models.

use serde::{Deserialize, Serialize};

/// Administrative gender as recorded at registration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" | "l" | "laki-laki" => Some(Gender::Male),
            "female" | "p" | "perempuan" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Patient payload submitted for creation. The backend assigns the ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientDraft {
    /// Full name
    pub name: String,
    /// National identity number (NIK)
    pub national_id: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    pub date_of_birth: Option<String>,
    pub gender: Gender,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl PatientDraft {
    /// Create a draft with required fields.
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            name: name.into(),
            national_id: None,
            date_of_birth: None,
            gender,
            address: None,
            phone: None,
        }
    }

    /// Attach backend-assigned fields to produce a full record.
    pub fn into_patient(self, id: String, created_at: String) -> Patient {
        Patient {
            id,
            name: self.name,
            national_id: self.national_id,
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            address: self.address,
            phone: self.phone,
            created_at,
        }
    }
}

/// A patient record as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patient {
    /// Backend-assigned ID
    pub id: String,
    pub name: String,
    pub national_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Gender,
    pub address: Option<String>,
    pub phone: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}
