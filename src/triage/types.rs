use serde::{Deserialize, Serialize};

/// Structured triage output for one submission.
///
/// Constructed exactly once per report and persisted immediately; it is
/// immutable history from that point on. `priority` is "High", "Medium"
/// or "Low" by convention, but whatever string the model emitted after
/// its `PRIORITY:` tag is stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageResult {
    pub analysis: String,
    pub priority: String,
    pub summary: String,
}

impl TriageResult {
    /// Degraded result when no service credential is configured.
    /// Returned without attempting any network call.
    pub fn unavailable_fallback() -> Self {
        Self {
            analysis: "AI analysis unavailable - OpenAI API key not configured".to_string(),
            priority: "Medium".to_string(),
            summary: "Manual review required".to_string(),
        }
    }

    /// Degraded result when the completion call fails for any reason.
    pub fn error_fallback() -> Self {
        Self {
            analysis: "AI analysis encountered an error. Manual review recommended.".to_string(),
            priority: "Medium".to_string(),
            summary: "Pending doctor review".to_string(),
        }
    }
}
