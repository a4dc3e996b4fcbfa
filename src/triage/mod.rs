//! Submission-to-triage pipeline.
//!
//! A patient submission flows through three stages: intake
//! normalization, one completion call to the configured language-model
//! service, and a line-tagged parse of whatever text comes back. The
//! pipeline itself never fails. A missing credential or a failed call
//! degrades to a fixed fallback result that tells doctors the analysis
//! needs manual review.

pub mod client;
pub mod engine;
pub mod intake;
pub mod parser;
pub mod prompt;
pub mod types;

pub use client::*;
pub use engine::*;
pub use intake::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Completion service unreachable at {0}")]
    Connection(String),

    #[error("Completion request timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Completion service returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response contained no choices")]
    NoChoices,
}
