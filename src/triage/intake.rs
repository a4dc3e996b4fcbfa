//! Intake normalization: the first pipeline stage.

/// Sentinel substituted for any field the patient left out.
pub const NOT_PROVIDED: &str = "Not provided";

/// Raw intake fields exactly as the submission form provided them.
/// `None` means the field was absent from the request entirely.
#[derive(Debug, Clone, Default)]
pub struct IntakeFields {
    pub age: Option<String>,
    pub gender: Option<String>,
    pub symptoms: Option<String>,
    pub medical_history: Option<String>,
    pub current_medications: Option<String>,
}

/// Intake fields with every absence replaced by [`NOT_PROVIDED`], so
/// prompt formatting stays stable no matter what the form sent.
///
/// Values that were present pass through untouched, including empty
/// strings. There is no content validation here: free text, any
/// length, any encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIntake {
    pub age: String,
    pub gender: String,
    pub symptoms: String,
    pub medical_history: String,
    pub current_medications: String,
}

impl IntakeFields {
    /// Pure, total normalization: no failure modes.
    pub fn normalize(&self) -> NormalizedIntake {
        NormalizedIntake {
            age: field_or_sentinel(&self.age),
            gender: field_or_sentinel(&self.gender),
            symptoms: field_or_sentinel(&self.symptoms),
            medical_history: field_or_sentinel(&self.medical_history),
            current_medications: field_or_sentinel(&self.current_medications),
        }
    }
}

fn field_or_sentinel(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_PROVIDED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_become_sentinel() {
        let fields = IntakeFields {
            age: Some("30".into()),
            ..Default::default()
        };
        let normalized = fields.normalize();

        assert_eq!(normalized.age, "30");
        assert_eq!(normalized.gender, NOT_PROVIDED);
        assert_eq!(normalized.symptoms, NOT_PROVIDED);
        assert_eq!(normalized.medical_history, NOT_PROVIDED);
        assert_eq!(normalized.current_medications, NOT_PROVIDED);
    }

    #[test]
    fn all_absent_is_all_sentinel() {
        let normalized = IntakeFields::default().normalize();
        assert_eq!(normalized.age, NOT_PROVIDED);
        assert_eq!(normalized.current_medications, NOT_PROVIDED);
    }

    #[test]
    fn present_values_pass_through_verbatim() {
        let fields = IntakeFields {
            age: Some("45".into()),
            gender: Some("male".into()),
            symptoms: Some("chest pain, shortness of breath".into()),
            medical_history: Some("hypertension".into()),
            current_medications: Some("lisinopril 10mg".into()),
        };
        let normalized = fields.normalize();

        assert_eq!(normalized.symptoms, "chest pain, shortness of breath");
        assert_eq!(normalized.current_medications, "lisinopril 10mg");
    }

    #[test]
    fn empty_string_is_not_absent() {
        // An empty form value was still provided; only a missing field
        // gets the sentinel.
        let fields = IntakeFields {
            symptoms: Some("".into()),
            ..Default::default()
        };
        let normalized = fields.normalize();
        assert_eq!(normalized.symptoms, "");
        assert_eq!(normalized.gender, NOT_PROVIDED);
    }
}
