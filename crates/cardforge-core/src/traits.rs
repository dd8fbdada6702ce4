//! Collaborator trait definitions for the analyzer and answer extractor.
//!
//! These async traits are implemented by the `cardforge-nlp` crate and
//! injected into the pipeline as `Arc<dyn …>` at process start, so tests
//! can substitute doubles. The underlying model objects are built once and
//! shared read-only across requests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::Analysis;

// ---------------------------------------------------------------------------
// Linguistic analyzer trait
// ---------------------------------------------------------------------------

/// Trait for linguistic analyzers that mine structure out of raw notes.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Human-readable analyzer name (e.g. "rule").
    fn name(&self) -> &str;

    /// Analyze raw text into entities, noun chunks, and sentences.
    ///
    /// Implementations must preserve document order within each list.
    async fn analyze(&self, text: &str) -> anyhow::Result<Analysis>;
}

// ---------------------------------------------------------------------------
// Answer extractor trait
// ---------------------------------------------------------------------------

/// Trait for answer-extraction backends that answer a question from a
/// context string.
#[async_trait]
pub trait AnswerExtractor: Send + Sync {
    /// Human-readable extractor name (e.g. "lexical").
    fn name(&self) -> &str;

    /// Extract an answer span for the request's question from its context.
    ///
    /// Implementations must fail with an `Err` when no usable answer can be
    /// produced — never silently return a bogus high confidence.
    async fn extract(&self, request: &ExtractRequest) -> anyhow::Result<Extraction>;
}

/// Request to extract an answer from a context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRequest {
    /// The natural-language question.
    pub question: String,
    /// The text the answer must come from.
    pub context: String,
}

/// Response from an answer extraction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// The extracted answer span.
    pub answer: String,
    /// Extraction certainty in [0, 1].
    pub confidence: f32,
}
