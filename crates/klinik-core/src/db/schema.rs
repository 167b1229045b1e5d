//! SQLite schema definition.

/// Schema for the local patient store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Patients
-- ============================================================================

CREATE TABLE IF NOT EXISTS patients (
    id TEXT PRIMARY KEY,                         -- assigned on insert
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    national_id TEXT UNIQUE,                     -- NIK, NULL when unknown
    date_of_birth TEXT,
    gender TEXT NOT NULL CHECK (gender IN ('male', 'female')),
    address TEXT,
    phone TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_patients_name ON patients(name);
CREATE INDEX IF NOT EXISTS idx_patients_created_at ON patients(created_at);
"#;
