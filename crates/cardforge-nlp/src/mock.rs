//! Mock analyzer and extractor for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use cardforge_core::model::Analysis;
use cardforge_core::traits::{Analyzer, AnswerExtractor, ExtractRequest, Extraction};

use crate::error::ExtractorError;

/// A mock analyzer that returns a canned [`Analysis`] for every input.
pub struct MockAnalyzer {
    analysis: Analysis,
    call_count: AtomicU32,
}

impl MockAnalyzer {
    /// Create a mock returning the given analysis.
    pub fn new(analysis: Analysis) -> Self {
        Self {
            analysis,
            call_count: AtomicU32::new(0),
        }
    }

    /// Create a mock that reports no linguistic structure at all.
    pub fn empty() -> Self {
        Self::new(Analysis::default())
    }

    /// Get the number of calls made to this analyzer.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Analyzer for MockAnalyzer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn analyze(&self, _text: &str) -> anyhow::Result<Analysis> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        Ok(self.analysis.clone())
    }
}

/// A mock extractor for testing the pipeline without a real backend.
///
/// Returns configurable extractions based on question substring matching.
pub struct MockExtractor {
    /// Pairs of question substring → canned extraction.
    responses: Vec<(String, Extraction)>,
    /// Confidence used when no substring matches.
    default_confidence: f32,
    /// Questions containing this fragment fail with `Unanswerable`.
    fail_on: Option<String>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<ExtractRequest>>,
}

impl MockExtractor {
    /// Create a mock with the given substring→extraction mappings.
    pub fn new(responses: Vec<(String, Extraction)>) -> Self {
        Self {
            responses,
            default_confidence: 0.9,
            fail_on: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that answers everything with the same confidence.
    pub fn with_fixed_confidence(confidence: f32) -> Self {
        Self {
            default_confidence: confidence,
            ..Self::new(Vec::new())
        }
    }

    /// Create a mock that fails for questions containing `fragment`.
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            fail_on: Some(fragment.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Get the number of calls made to this extractor.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this extractor.
    pub fn last_request(&self) -> Option<ExtractRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnswerExtractor for MockExtractor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn extract(&self, request: &ExtractRequest) -> anyhow::Result<Extraction> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(fragment) = &self.fail_on {
            if request.question.contains(fragment.as_str()) {
                return Err(
                    ExtractorError::Unanswerable(format!("mock failure: {}", request.question))
                        .into(),
                );
            }
        }

        let extraction = self
            .responses
            .iter()
            .find(|(key, _)| request.question.contains(key.as_str()))
            .map(|(_, e)| e.clone())
            .unwrap_or_else(|| Extraction {
                answer: format!("mock answer to: {}", request.question),
                confidence: self.default_confidence,
            });

        Ok(extraction)
    }
}
