use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::triage::TriageResult;

/// A patient's submitted health report together with its triage result.
///
/// The triage fields are written once at submission time and never
/// updated — they are the immutable record of what the automation said
/// (or that it was degraded) when the report arrived.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
    /// Path of the stored attachment, when one was uploaded.
    pub file_path: Option<String>,
    /// Original client-side filename of the attachment.
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub triage: TriageResult,
    pub submitted_at: DateTime<Utc>,
}

/// A report joined with its patient's identity, for the doctor dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWithPatient {
    #[serde(flatten)]
    pub report: HealthReport,
    pub patient_name: String,
    pub patient_email: Option<String>,
}
