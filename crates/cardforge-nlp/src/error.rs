//! Extractor error types.
//!
//! These error types represent failures when consulting an
//! answer-extraction backend. The pipeline recovers from them per
//! candidate; they exist so callers and logs can classify failures
//! without string matching.

use thiserror::Error;

/// Errors that can occur when extracting an answer.
#[derive(Debug, Error)]
pub enum ExtractorError {
    /// The QA service returned an error response.
    #[error("QA service error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Authentication with the QA service failed.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// No usable answer could be extracted from the context.
    #[error("no answer could be extracted: {0}")]
    Unanswerable(String),
}
