use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A doctor's free-text note attached to one health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorNote {
    pub id: Uuid,
    pub report_id: Uuid,
    pub doctor_id: Uuid,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A note joined with the authoring doctor's name, for review views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteWithDoctor {
    #[serde(flatten)]
    pub note: DoctorNote,
    pub doctor_name: String,
}
