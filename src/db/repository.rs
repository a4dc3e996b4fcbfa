//! Data access for portal entities: users, health reports, doctor notes.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::*;
use crate::triage::TriageResult;

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

// ═══════════════════════════════════════════
// User Repository
// ═══════════════════════════════════════════

pub fn insert_user(conn: &Connection, user: &User) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO users (id, username, password_hash, role, full_name, email, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.id.to_string(),
            user.username,
            user.password_hash,
            user.role.as_str(),
            user.full_name,
            user.email,
            user.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Looks up an account by the (username, role) pair a login form
/// submits. The role is part of the lookup: an existing username
/// queried under the wrong role comes back as `None`.
pub fn find_user_by_username_role(
    conn: &Connection,
    username: &str,
    role: Role,
) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, username, password_hash, role, full_name, email, created_at
         FROM users WHERE username = ?1 AND role = ?2",
    )?;

    let result = stmt.query_row(params![username, role.as_str()], |row| {
        Ok(UserRow {
            id: row.get::<_, String>(0)?,
            username: row.get::<_, String>(1)?,
            password_hash: row.get::<_, String>(2)?,
            role: row.get::<_, String>(3)?,
            full_name: row.get::<_, String>(4)?,
            email: row.get::<_, Option<String>>(5)?,
            created_at: row.get::<_, String>(6)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(user_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn count_users_with_role(conn: &Connection, role: Role) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE role = ?1",
        params![role.as_str()],
        |row| row.get(0),
    )?;
    Ok(count)
}

struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    role: String,
    full_name: String,
    email: Option<String>,
    created_at: String,
}

fn user_from_row(row: UserRow) -> Result<User, DatabaseError> {
    Ok(User {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        username: row.username,
        password_hash: row.password_hash,
        role: Role::from_str(&row.role)?,
        full_name: row.full_name,
        email: row.email,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

// ═══════════════════════════════════════════
// Health Report Repository
// ═══════════════════════════════════════════

pub fn insert_report(conn: &Connection, report: &HealthReport) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO health_reports (id, patient_id, age, gender, symptoms, medical_history,
         current_medications, file_path, file_name, ai_analysis, health_priority, ai_summary, submitted_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            report.id.to_string(),
            report.patient_id.to_string(),
            report.age,
            report.gender,
            report.symptoms,
            report.medical_history,
            report.current_medications,
            report.file_path,
            report.file_name,
            report.triage.analysis,
            report.triage.priority,
            report.triage.summary,
            report.submitted_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn get_report(conn: &Connection, id: &Uuid) -> Result<Option<HealthReport>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, age, gender, symptoms, medical_history, current_medications,
         file_path, file_name, ai_analysis, health_priority, ai_summary, submitted_at
         FROM health_reports WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id.to_string()], |row| {
        Ok(ReportRow {
            id: row.get::<_, String>(0)?,
            patient_id: row.get::<_, String>(1)?,
            age: row.get::<_, Option<String>>(2)?,
            gender: row.get::<_, Option<String>>(3)?,
            symptoms: row.get::<_, Option<String>>(4)?,
            medical_history: row.get::<_, Option<String>>(5)?,
            current_medications: row.get::<_, Option<String>>(6)?,
            file_path: row.get::<_, Option<String>>(7)?,
            file_name: row.get::<_, Option<String>>(8)?,
            ai_analysis: row.get::<_, String>(9)?,
            health_priority: row.get::<_, String>(10)?,
            ai_summary: row.get::<_, String>(11)?,
            submitted_at: row.get::<_, String>(12)?,
        })
    });

    match result {
        Ok(row) => Ok(Some(report_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A patient's own reports, newest first.
pub fn list_reports_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<HealthReport>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, age, gender, symptoms, medical_history, current_medications,
         file_path, file_name, ai_analysis, health_priority, ai_summary, submitted_at
         FROM health_reports WHERE patient_id = ?1 ORDER BY submitted_at DESC",
    )?;

    let rows = stmt.query_map(params![patient_id.to_string()], |row| {
        Ok(ReportRow {
            id: row.get::<_, String>(0)?,
            patient_id: row.get::<_, String>(1)?,
            age: row.get::<_, Option<String>>(2)?,
            gender: row.get::<_, Option<String>>(3)?,
            symptoms: row.get::<_, Option<String>>(4)?,
            medical_history: row.get::<_, Option<String>>(5)?,
            current_medications: row.get::<_, Option<String>>(6)?,
            file_path: row.get::<_, Option<String>>(7)?,
            file_name: row.get::<_, Option<String>>(8)?,
            ai_analysis: row.get::<_, String>(9)?,
            health_priority: row.get::<_, String>(10)?,
            ai_summary: row.get::<_, String>(11)?,
            submitted_at: row.get::<_, String>(12)?,
        })
    })?;

    let mut reports = Vec::new();
    for row in rows {
        reports.push(report_from_row(row?)?);
    }
    Ok(reports)
}

/// Every report joined with its patient's identity, newest first.
/// Backs the doctor dashboard.
pub fn list_reports_with_patients(conn: &Connection) -> Result<Vec<ReportWithPatient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.patient_id, r.age, r.gender, r.symptoms, r.medical_history,
         r.current_medications, r.file_path, r.file_name, r.ai_analysis, r.health_priority,
         r.ai_summary, r.submitted_at, u.full_name, u.email
         FROM health_reports r JOIN users u ON r.patient_id = u.id
         ORDER BY r.submitted_at DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let report = ReportRow {
            id: row.get::<_, String>(0)?,
            patient_id: row.get::<_, String>(1)?,
            age: row.get::<_, Option<String>>(2)?,
            gender: row.get::<_, Option<String>>(3)?,
            symptoms: row.get::<_, Option<String>>(4)?,
            medical_history: row.get::<_, Option<String>>(5)?,
            current_medications: row.get::<_, Option<String>>(6)?,
            file_path: row.get::<_, Option<String>>(7)?,
            file_name: row.get::<_, Option<String>>(8)?,
            ai_analysis: row.get::<_, String>(9)?,
            health_priority: row.get::<_, String>(10)?,
            ai_summary: row.get::<_, String>(11)?,
            submitted_at: row.get::<_, String>(12)?,
        };
        let patient_name = row.get::<_, String>(13)?;
        let patient_email = row.get::<_, Option<String>>(14)?;
        Ok((report, patient_name, patient_email))
    })?;

    let mut reports = Vec::new();
    for row in rows {
        let (report_row, patient_name, patient_email) = row?;
        reports.push(ReportWithPatient {
            report: report_from_row(report_row)?,
            patient_name,
            patient_email,
        });
    }
    Ok(reports)
}

struct ReportRow {
    id: String,
    patient_id: String,
    age: Option<String>,
    gender: Option<String>,
    symptoms: Option<String>,
    medical_history: Option<String>,
    current_medications: Option<String>,
    file_path: Option<String>,
    file_name: Option<String>,
    ai_analysis: String,
    health_priority: String,
    ai_summary: String,
    submitted_at: String,
}

fn report_from_row(row: ReportRow) -> Result<HealthReport, DatabaseError> {
    Ok(HealthReport {
        id: Uuid::parse_str(&row.id).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        patient_id: Uuid::parse_str(&row.patient_id)
            .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        age: row.age,
        gender: row.gender,
        symptoms: row.symptoms,
        medical_history: row.medical_history,
        current_medications: row.current_medications,
        file_path: row.file_path,
        file_name: row.file_name,
        triage: TriageResult {
            analysis: row.ai_analysis,
            priority: row.health_priority,
            summary: row.ai_summary,
        },
        submitted_at: parse_timestamp(&row.submitted_at)?,
    })
}

// ═══════════════════════════════════════════
// Doctor Note Repository
// ═══════════════════════════════════════════

pub fn insert_note(conn: &Connection, note: &DoctorNote) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctor_notes (id, report_id, doctor_id, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            note.id.to_string(),
            note.report_id.to_string(),
            note.doctor_id.to_string(),
            note.notes,
            note.created_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

/// Notes on one report joined with each author's name, newest first.
pub fn list_notes_for_report(
    conn: &Connection,
    report_id: &Uuid,
) -> Result<Vec<NoteWithDoctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT n.id, n.report_id, n.doctor_id, n.notes, n.created_at, u.full_name
         FROM doctor_notes n JOIN users u ON n.doctor_id = u.id
         WHERE n.report_id = ?1 ORDER BY n.created_at DESC",
    )?;

    let rows = stmt.query_map(params![report_id.to_string()], |row| {
        Ok(NoteRow {
            id: row.get::<_, String>(0)?,
            report_id: row.get::<_, String>(1)?,
            doctor_id: row.get::<_, String>(2)?,
            notes: row.get::<_, String>(3)?,
            created_at: row.get::<_, String>(4)?,
            doctor_name: row.get::<_, String>(5)?,
        })
    })?;

    let mut notes = Vec::new();
    for row in rows {
        notes.push(note_from_row(row?)?);
    }
    Ok(notes)
}

struct NoteRow {
    id: String,
    report_id: String,
    doctor_id: String,
    notes: String,
    created_at: String,
    doctor_name: String,
}

fn note_from_row(row: NoteRow) -> Result<NoteWithDoctor, DatabaseError> {
    Ok(NoteWithDoctor {
        note: DoctorNote {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            report_id: Uuid::parse_str(&row.report_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            doctor_id: Uuid::parse_str(&row.doctor_id)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
            notes: row.notes,
            created_at: parse_timestamp(&row.created_at)?,
        },
        doctor_name: row.doctor_name,
    })
}
