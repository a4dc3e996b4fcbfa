use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::TriageError;

/// One completion call: a fixed system instruction, a single user
/// turn, a response-length ceiling and a sampling temperature.
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Completion service abstraction (allows mocking).
pub trait CompletionClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, TriageError>;
}

/// HTTP client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(api_key: &str, base_url: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }
}

/// Request body for POST /chat/completions
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response body from POST /chat/completions
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    // The service may emit an explicit null here; treat it as empty.
    content: Option<String>,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest<'_>) -> Result<String, TriageError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: request.system },
                ChatMessage { role: "user", content: request.prompt },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    TriageError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    TriageError::Timeout(self.timeout_secs)
                } else {
                    TriageError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TriageError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .map_err(|e| TriageError::MalformedResponse(e.to_string()))?;

        let choice = parsed.choices.into_iter().next().ok_or(TriageError::NoChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Mock completion client for testing — canned response or forced
/// failure, with a call counter to assert how often the service was
/// actually invoked.
pub struct MockCompletionClient {
    response: String,
    fail_with: Option<String>,
    calls: AtomicUsize,
}

impl MockCompletionClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            fail_with: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A client whose every call fails with the given message.
    pub fn failing(message: &str) -> Self {
        Self {
            response: String::new(),
            fail_with: Some(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionClient for MockCompletionClient {
    fn complete(&self, _request: &CompletionRequest<'_>) -> Result<String, TriageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(message) => Err(TriageError::HttpClient(message.clone())),
            None => Ok(self.response.clone()),
        }
    }
}
