//! Patient database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{Gender, Patient, PatientDraft};

impl Database {
    /// Insert a draft, assigning its ID and creation timestamp.
    pub fn insert_patient(&self, draft: &PatientDraft) -> DbResult<Patient> {
        if draft.name.trim().is_empty() {
            return Err(DbError::Constraint("Patient name is required".into()));
        }

        let patient = draft.clone().into_patient(
            uuid::Uuid::new_v4().to_string(),
            chrono::Utc::now().to_rfc3339(),
        );
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, name, national_id, date_of_birth, gender,
                address, phone, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                patient.id,
                patient.name,
                patient.national_id,
                patient.date_of_birth,
                patient.gender.as_str(),
                patient.address,
                patient.phone,
                patient.created_at,
            ],
        )?;
        Ok(patient)
    }

    /// Get a patient by ID.
    pub fn get_patient(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                r#"
                SELECT id, name, national_id, date_of_birth, gender,
                       address, phone, created_at
                FROM patients
                WHERE id = ?
                "#,
                [id],
                PatientRow::from_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all patients in insertion order.
    pub fn list_patients(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, national_id, date_of_birth, gender,
                   address, phone, created_at
            FROM patients
            ORDER BY rowid
            "#,
        )?;

        let rows = stmt.query_map([], PatientRow::from_row)?;

        let mut patients = Vec::new();
        for row in rows {
            patients.push(row?.try_into()?);
        }
        Ok(patients)
    }
}

/// Intermediate row struct for database mapping.
struct PatientRow {
    id: String,
    name: String,
    national_id: Option<String>,
    date_of_birth: Option<String>,
    gender: String,
    address: Option<String>,
    phone: Option<String>,
    created_at: String,
}

impl PatientRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(PatientRow {
            id: row.get(0)?,
            name: row.get(1)?,
            national_id: row.get(2)?,
            date_of_birth: row.get(3)?,
            gender: row.get(4)?,
            address: row.get(5)?,
            phone: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl TryFrom<PatientRow> for Patient {
    type Error = DbError;

    fn try_from(row: PatientRow) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&row.gender)
            .ok_or_else(|| DbError::Constraint(format!("Unknown gender: {}", row.gender)))?;

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
