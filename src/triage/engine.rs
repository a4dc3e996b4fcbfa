use std::sync::Arc;

use super::client::{CompletionClient, CompletionRequest, OpenAiClient};
use super::intake::NormalizedIntake;
use super::parser::parse_triage_response;
use super::prompt::{build_triage_prompt, TRIAGE_SYSTEM_PROMPT};
use super::types::TriageResult;
use crate::config::AppConfig;

/// Response-length ceiling for one triage completion.
pub const TRIAGE_MAX_TOKENS: u32 = 500;

/// Sampling temperature. Identical submissions may produce different
/// analyses across runs.
pub const TRIAGE_TEMPERATURE: f32 = 0.7;

/// The triage pipeline: prompt construction, one completion call, and
/// the tagged-line parse, behind a degradation policy that never lets
/// a failure reach the caller.
pub struct TriageEngine {
    client: Option<Arc<dyn CompletionClient + Send + Sync>>,
}

impl TriageEngine {
    /// Build from configuration. Without a credential the engine comes
    /// up in degraded mode rather than failing startup.
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.openai_api_key {
            Some(key) => {
                tracing::info!(model = %config.triage_model, "Triage completion service configured");
                Self::with_client(Arc::new(OpenAiClient::new(
                    key,
                    &config.openai_base_url,
                    &config.triage_model,
                    config.triage_timeout_secs,
                )))
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set; reports will be stored for manual review");
                Self::disabled()
            }
        }
    }

    pub fn with_client(client: Arc<dyn CompletionClient + Send + Sync>) -> Self {
        Self {
            client: Some(client),
        }
    }

    /// An engine with no credential. Every run short-circuits to the
    /// unavailable fallback without attempting a network call.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Whether a completion client is configured.
    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Run the pipeline for one submission.
    ///
    /// Guaranteed to return: every failure path collapses into a fixed
    /// degraded [`TriageResult`]. Performs at most one network call,
    /// with no retry.
    pub fn run(&self, intake: &NormalizedIntake) -> TriageResult {
        let client = match &self.client {
            Some(client) => client,
            None => return TriageResult::unavailable_fallback(),
        };

        let prompt = build_triage_prompt(intake);
        let request = CompletionRequest {
            system: TRIAGE_SYSTEM_PROMPT,
            prompt: &prompt,
            max_tokens: TRIAGE_MAX_TOKENS,
            temperature: TRIAGE_TEMPERATURE,
        };

        match client.complete(&request) {
            Ok(raw) => parse_triage_response(&raw),
            Err(e) => {
                tracing::warn!(error = %e, "Triage completion failed; storing degraded result");
                TriageResult::error_fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triage::client::MockCompletionClient;
    use crate::triage::intake::IntakeFields;

    fn sample_intake() -> NormalizedIntake {
        IntakeFields {
            age: Some("30".into()),
            symptoms: Some("headache".into()),
            ..Default::default()
        }
        .normalize()
    }

    #[test]
    fn missing_credential_short_circuits() {
        let engine = TriageEngine::disabled();
        let result = engine.run(&sample_intake());
        assert_eq!(result, TriageResult::unavailable_fallback());
    }

    #[test]
    fn service_failure_yields_error_fallback() {
        let mock = Arc::new(MockCompletionClient::failing("connection refused"));
        let engine = TriageEngine::with_client(mock.clone());

        let result = engine.run(&sample_intake());
        assert_eq!(result, TriageResult::error_fallback());
        assert_eq!(mock.call_count(), 1); // Fail fast, no retry
    }

    #[test]
    fn successful_call_parses_tagged_output() {
        let mock = Arc::new(MockCompletionClient::new(
            "ANALYSIS: tension headache likely\nPRIORITY: Low\nSUMMARY: rest and hydration",
        ));
        let engine = TriageEngine::with_client(mock.clone());

        let result = engine.run(&sample_intake());
        assert_eq!(result.analysis, "tension headache likely");
        assert_eq!(result.priority, "Low");
        assert_eq!(result.summary, "rest and hydration");
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn untagged_output_still_produces_complete_result() {
        let mock = Arc::new(MockCompletionClient::new("The patient seems fine."));
        let engine = TriageEngine::with_client(mock);

        let result = engine.run(&sample_intake());
        assert_eq!(result.analysis, "The patient seems fine.");
        assert_eq!(result.priority, "Medium");
        assert_eq!(result.summary, "The patient seems fine.");
    }

    #[test]
    fn empty_model_output_gets_placeholder_summary() {
        let mock = Arc::new(MockCompletionClient::new(""));
        let engine = TriageEngine::with_client(mock);

        let result = engine.run(&sample_intake());
        assert_eq!(result.priority, "Medium");
        assert_eq!(result.summary, "Pending analysis");
    }

    #[test]
    fn from_config_without_key_is_disabled() {
        let config = AppConfig {
            openai_api_key: None,
            ..AppConfig::default()
        };
        let engine = TriageEngine::from_config(&config);
        assert!(engine.client.is_none());
        assert_eq!(engine.run(&sample_intake()), TriageResult::unavailable_fallback());
    }

    #[test]
    fn from_config_with_key_is_armed() {
        let config = AppConfig {
            openai_api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let engine = TriageEngine::from_config(&config);
        assert!(engine.client.is_some());
    }
}
