//! Backend-as-a-service payload parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use klinik_core::models::{AuthSession, AuthUser, Gender, Patient, PatientDraft};
use klinik_core::session::AuthEvent;

/// Wire parsing errors.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid payload: {0}")]
    InvalidFormat(String),

    #[error("Backend error {status}: {message}")]
    Backend { status: u16, message: String },
}

pub type WireResult<T> = Result<T, WireError>;

/// Error object returned alongside `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<ApiError>,
}

impl<T> Envelope<T> {
    fn into_result(self) -> WireResult<Option<T>> {
        match self.error {
            Some(e) => Err(WireError::Backend {
                status: e.status.unwrap_or(500),
                message: e.message,
            }),
            None => Ok(self.data),
        }
    }
}

/// Raw user object. Fields other than `id` and `email` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl From<RawUser> for AuthUser {
    fn from(user: RawUser) -> Self {
        AuthUser {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSession {
    #[serde(default)]
    pub access_token: Option<String>,
    pub user: RawUser,
}

impl From<RawSession> for AuthSession {
    fn from(session: RawSession) -> Self {
        AuthSession {
            user: session.user.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: Option<RawUser>,
}

/// Parse a `getUser` response: `{"data": {"user": ...}, "error": ...}`.
pub fn parse_user_response(json: &str) -> WireResult<Option<AuthUser>> {
    let envelope: Envelope<UserData> = serde_json::from_str(json)?;
    Ok(envelope
        .into_result()?
        .and_then(|data| data.user)
        .map(AuthUser::from))
}

/// Parse a session object; `null` means no session.
pub fn parse_session(json: &str) -> WireResult<Option<AuthSession>> {
    let session: Option<RawSession> = serde_json::from_str(json)?;
    Ok(session.map(AuthSession::from))
}

/// Parse an auth state change callback payload.
pub fn parse_auth_change(
    event_name: &str,
    session_json: &str,
) -> WireResult<(AuthEvent, Option<AuthSession>)> {
    Ok((AuthEvent::from_name(event_name), parse_session(session_json)?))
}

/// A row of the `patients` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRow {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    pub gender: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: String,
}

impl TryFrom<PatientRow> for Patient {
    type Error = WireError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&row.gender)
            .ok_or_else(|| WireError::InvalidFormat(format!("Unknown gender: {}", row.gender)))?;
        Ok(Patient {
            id: row.id,
            name: row.name,
            national_id: row.national_id,
            date_of_birth: row.date_of_birth,
            gender,
            address: row.address,
            phone: row.phone,
            created_at: row.created_at,
        })
    }
}

/// Parse a single inserted row, as returned by `insert(...).select().single()`.
pub fn parse_patient_row(json: &str) -> WireResult<Patient> {
    let envelope: Envelope<PatientRow> = serde_json::from_str(json)?;
    envelope
        .into_result()?
        .ok_or_else(|| WireError::InvalidFormat("Insert returned no row".into()))?
        .try_into()
}

/// Insert body for a draft. The backend fills `id` and `created_at`.
pub fn draft_to_insert(draft: &PatientDraft) -> Value {
    serde_json::json!({
        "name": draft.name,
        "national_id": draft.national_id,
        "date_of_birth": draft.date_of_birth,
        "gender": draft.gender.as_str(),
        "address": draft.address,
        "phone": draft.phone,
    })
}
