//! Answer-extraction backends.
//!
//! Two implementations of the `AnswerExtractor` trait: an in-process
//! lexical-overlap extractor that needs no external service, and a client
//! for remote QA inference endpoints speaking the common
//! `{question, context}` → `{answer, score}` shape.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use cardforge_core::traits::{AnswerExtractor, ExtractRequest, Extraction};

use crate::error::ExtractorError;
use crate::text::{split_sentences, stopword_set, tokenize};

// ---------------------------------------------------------------------------
// Lexical-overlap extractor
// ---------------------------------------------------------------------------

/// Extractive QA via lexical overlap.
///
/// Ranks the context's sentences by how many of the question's content
/// words they contain and returns the best sentence as the answer span.
/// The matched fraction doubles as the confidence score, so questions
/// about things the context never mentions score near zero and fall under
/// the pipeline's thresholds.
pub struct LexicalExtractor {
    stopwords: HashSet<String>,
}

impl LexicalExtractor {
    pub fn new() -> Self {
        Self {
            stopwords: stopword_set(),
        }
    }
}

impl Default for LexicalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerExtractor for LexicalExtractor {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn extract(&self, request: &ExtractRequest) -> anyhow::Result<Extraction> {
        let query: Vec<String> = tokenize(&request.question)
            .into_iter()
            .filter(|token| !self.stopwords.contains(token))
            .collect();
        if query.is_empty() {
            return Err(
                ExtractorError::Unanswerable("question has no content words".into()).into(),
            );
        }

        let sentences = split_sentences(&request.context);
        if sentences.is_empty() {
            return Err(ExtractorError::Unanswerable("context has no sentences".into()).into());
        }

        let mut best: Option<(f32, &String)> = None;
        for sentence in &sentences {
            let tokens: HashSet<String> = tokenize(sentence).into_iter().collect();
            if tokens.is_empty() {
                continue;
            }
            let matched = query.iter().filter(|q| tokens.contains(*q)).count();
            let score = matched as f32 / query.len() as f32;
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, sentence));
            }
        }

        let (score, sentence) = best
            .ok_or_else(|| ExtractorError::Unanswerable("context has no usable tokens".into()))?;

        Ok(Extraction {
            answer: sentence.trim().to_string(),
            confidence: score.clamp(0.0, 1.0),
        })
    }
}

// ---------------------------------------------------------------------------
// Remote QA service extractor
// ---------------------------------------------------------------------------

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for a remote extractive-QA inference endpoint.
pub struct QaServiceExtractor {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl QaServiceExtractor {
    pub fn new(endpoint: &str, api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            endpoint: endpoint.to_string(),
            api_key,
            client,
        }
    }
}

#[derive(Serialize)]
struct QaApiRequest<'a> {
    question: &'a str,
    context: &'a str,
}

#[derive(Deserialize)]
struct QaApiResponse {
    answer: String,
    score: f32,
}

#[async_trait]
impl AnswerExtractor for QaServiceExtractor {
    fn name(&self) -> &str {
        "qa_service"
    }

    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn extract(&self, request: &ExtractRequest) -> anyhow::Result<Extraction> {
        let body = QaApiRequest {
            question: &request.question,
            context: &request.context,
        };

        let mut http_request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {key}"));
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractorError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else if e.is_connect() {
                ExtractorError::Network(format!(
                    "QA service not reachable at {}: {e}",
                    self.endpoint
                ))
            } else {
                ExtractorError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::AuthenticationFailed(body).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractorError::Api {
                status,
                message: body,
            }
            .into());
        }

        let api_response: QaApiResponse =
            response.json().await.map_err(|e| ExtractorError::Api {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        if api_response.answer.trim().is_empty() {
            return Err(
                ExtractorError::Unanswerable("service returned an empty answer".into()).into(),
            );
        }

        Ok(Extraction {
            answer: api_response.answer,
            confidence: api_response.score,
        })
    }
}
