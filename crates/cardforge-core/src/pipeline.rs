//! The candidate pipeline — the flashcard generation orchestrator.
//!
//! Runs three strategies in fixed priority order against one shared
//! candidate accumulator: entity-driven questions, noun-chunk questions,
//! and a sentence-pattern fallback. Each strategy consults the answer
//! extractor and keeps only candidates above its confidence threshold.
//! Accumulation stops as soon as the cap is reached, even mid-strategy,
//! so a productive early strategy means later ones never run.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::curate::curate;
use crate::error::GenerateError;
use crate::model::{Candidate, Entity, Flashcard, NounChunk, PartOfSpeech, Sentence};
use crate::synth::{question_for_chunk, question_for_entity};
use crate::traits::{Analyzer, AnswerExtractor, ExtractRequest};

/// Configuration for the card generator.
///
/// The confidence thresholds are empirical constants with no documented
/// derivation, so they live in configuration rather than as hard-coded
/// invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Upper bound on cards per note.
    pub max_cards: usize,
    /// Target lower bound. Best effort: thin notes may yield fewer.
    pub min_cards: usize,
    /// Acceptance threshold for entity-driven candidates.
    pub entity_confidence: f32,
    /// Acceptance threshold for noun-chunk candidates.
    pub chunk_confidence: f32,
    /// Threshold above which the extracted answer replaces the raw
    /// predicate in the sentence fallback.
    pub sentence_confidence: f32,
    /// Notes at or below this length never receive generic fallback cards.
    pub fallback_note_len: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_cards: 10,
            min_cards: 5,
            entity_confidence: 0.70,
            chunk_confidence: 0.60,
            sentence_confidence: 0.50,
            fallback_note_len: 50,
        }
    }
}

/// The flashcard generator.
///
/// Holds the process-wide analyzer and extractor behind `Arc` so the same
/// model objects serve every request; all per-request state lives on the
/// stack of [`CardGenerator::generate`]. The extractor is awaited
/// sequentially; there is never more than one in-flight extraction per
/// request.
pub struct CardGenerator {
    analyzer: Arc<dyn Analyzer>,
    extractor: Arc<dyn AnswerExtractor>,
    config: GeneratorConfig,
}

impl CardGenerator {
    pub fn new(
        analyzer: Arc<dyn Analyzer>,
        extractor: Arc<dyn AnswerExtractor>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            analyzer,
            extractor,
            config,
        }
    }

    /// Generate a curated set of flashcards from raw notes.
    ///
    /// Fails with [`GenerateError::InvalidInput`] for empty or blank notes
    /// and with [`GenerateError::Analysis`] when the analyzer itself fails.
    /// Extraction failures for individual candidates are swallowed; the
    /// candidate is dropped and generation continues.
    pub async fn generate(&self, notes: &str) -> Result<Vec<Flashcard>, GenerateError> {
        if notes.trim().is_empty() {
            return Err(GenerateError::InvalidInput);
        }

        let analysis = self
            .analyzer
            .analyze(notes)
            .await
            .map_err(GenerateError::Analysis)?;

        let mut candidates: Vec<Candidate> = Vec::new();

        self.entity_pass(notes, &analysis.entities, &mut candidates)
            .await;
        self.chunk_pass(notes, &analysis.noun_chunks, &mut candidates)
            .await;
        if candidates.len() < self.config.min_cards {
            self.sentence_pass(&analysis.sentences, &mut candidates).await;
        }

        tracing::debug!(
            analyzer = self.analyzer.name(),
            extractor = self.extractor.name(),
            candidates = candidates.len(),
            "candidate accumulation complete"
        );

        Ok(curate(candidates, notes, &self.config))
    }

    /// Strategy A — one question per recognized entity, answered against
    /// the full note.
    async fn entity_pass(&self, notes: &str, entities: &[Entity], acc: &mut Vec<Candidate>) {
        for entity in entities {
            if acc.len() >= self.config.max_cards {
                break;
            }
            let Some(question) = question_for_entity(entity) else {
                continue;
            };
            if let Some(candidate) = self
                .attempt(question, notes, self.config.entity_confidence)
                .await
            {
                acc.push(candidate);
            }
        }
    }

    /// Strategy B — "What is …?" questions from multi-word noun chunks.
    async fn chunk_pass(&self, notes: &str, chunks: &[NounChunk], acc: &mut Vec<Candidate>) {
        for chunk in chunks {
            if acc.len() >= self.config.max_cards {
                break;
            }
            if skip_chunk(chunk, acc) {
                continue;
            }
            let question = question_for_chunk(&chunk.text);
            if let Some(candidate) = self
                .attempt(question, notes, self.config.chunk_confidence)
                .await
            {
                acc.push(candidate);
            }
        }
    }

    /// Strategy C — sentence-pattern fallback on `" is "` / `" are "`.
    ///
    /// Unlike the other strategies the extractor is advisory here: its
    /// answer wins only above the threshold, otherwise the raw predicate
    /// text becomes the answer. An extractor failure falls back to the
    /// predicate too.
    async fn sentence_pass(&self, sentences: &[Sentence], acc: &mut Vec<Candidate>) {
        for sentence in sentences {
            if acc.len() >= self.config.max_cards {
                break;
            }
            let text = sentence.text.trim();
            let Some(split) = split_copula(text) else {
                continue;
            };
            let question = match split.copula {
                Copula::Is => format!("What is {}?", split.subject),
                Copula::Are => format!("What are {}?", split.subject),
            };

            let request = ExtractRequest {
                question: question.clone(),
                context: text.to_string(),
            };
            let (answer, confidence) = match self.extractor.extract(&request).await {
                Ok(extraction) if extraction.confidence > self.config.sentence_confidence => {
                    (extraction.answer, extraction.confidence)
                }
                Ok(extraction) => (split.predicate.to_string(), extraction.confidence),
                Err(error) => {
                    tracing::warn!(%question, %error, "extraction failed, using raw predicate");
                    (split.predicate.to_string(), 0.0)
                }
            };

            if !question.is_empty() && answer.len() > 2 {
                acc.push(Candidate {
                    question,
                    answer,
                    confidence,
                });
            }
        }
    }

    /// One extractor attempt. Failures are recovered here: an `Err` or a
    /// below-threshold confidence both yield `None`, and the pipeline
    /// moves on to the next unit.
    async fn attempt(&self, question: String, context: &str, threshold: f32) -> Option<Candidate> {
        let request = ExtractRequest {
            question,
            context: context.to_string(),
        };
        match self.extractor.extract(&request).await {
            Ok(extraction) if extraction.confidence > threshold => Some(Candidate {
                question: request.question,
                answer: extraction.answer,
                confidence: extraction.confidence,
            }),
            Ok(extraction) => {
                tracing::debug!(
                    question = %request.question,
                    confidence = extraction.confidence,
                    threshold,
                    "candidate below confidence threshold"
                );
                None
            }
            Err(error) => {
                tracing::warn!(
                    question = %request.question,
                    %error,
                    "extraction failed, dropping candidate"
                );
                None
            }
        }
    }
}

/// Strategy B skip rules: single-token chunks, pronoun heads, and chunks
/// whose lowercase text already matches an accumulated question.
fn skip_chunk(chunk: &NounChunk, acc: &[Candidate]) -> bool {
    if chunk.text.split_whitespace().count() <= 1 {
        return true;
    }
    if chunk.head_pos == PartOfSpeech::Pronoun {
        return true;
    }
    let lowered = chunk.text.to_lowercase();
    acc.iter().any(|c| c.question.to_lowercase() == lowered)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Copula {
    Is,
    Are,
}

struct CopulaSplit<'a> {
    copula: Copula,
    subject: &'a str,
    predicate: &'a str,
}

/// Split a sentence at its first `" is "` or `" are "`, in that priority.
fn split_copula(sentence: &str) -> Option<CopulaSplit<'_>> {
    if let Some(idx) = sentence.find(" is ") {
        return Some(CopulaSplit {
            copula: Copula::Is,
            subject: sentence[..idx].trim(),
            predicate: sentence[idx + " is ".len()..].trim(),
        });
    }
    if let Some(idx) = sentence.find(" are ") {
        return Some(CopulaSplit {
            copula: Copula::Are,
            subject: sentence[..idx].trim(),
            predicate: sentence[idx + " are ".len()..].trim(),
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Analysis, EntityCategory};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    use crate::traits::Extraction;

    struct StubAnalyzer {
        analysis: Analysis,
    }

    #[async_trait]
    impl Analyzer for StubAnalyzer {
        fn name(&self) -> &str {
            "stub"
        }

        async fn analyze(&self, _text: &str) -> anyhow::Result<Analysis> {
            Ok(self.analysis.clone())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn analyze(&self, _text: &str) -> anyhow::Result<Analysis> {
            anyhow::bail!("model unavailable")
        }
    }

    /// Deterministic extractor stub: fixed confidence, answer echoes the
    /// question, optional failure on a question substring.
    struct StubExtractor {
        confidence: f32,
        fail_on: Option<String>,
        calls: AtomicU32,
        last_request: Mutex<Option<ExtractRequest>>,
    }

    impl StubExtractor {
        fn with_confidence(confidence: f32) -> Self {
            Self {
                confidence,
                fail_on: None,
                calls: AtomicU32::new(0),
                last_request: Mutex::new(None),
            }
        }

        fn failing_on(confidence: f32, fragment: &str) -> Self {
            Self {
                fail_on: Some(fragment.to_string()),
                ..Self::with_confidence(confidence)
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl AnswerExtractor for StubExtractor {
        fn name(&self) -> &str {
            "stub"
        }

        async fn extract(&self, request: &ExtractRequest) -> anyhow::Result<Extraction> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            *self.last_request.lock().unwrap() = Some(request.clone());
            if let Some(fragment) = &self.fail_on {
                if request.question.contains(fragment.as_str()) {
                    anyhow::bail!("unanswerable: {}", request.question);
                }
            }
            Ok(Extraction {
                answer: format!("answer for {}", request.question),
                confidence: self.confidence,
            })
        }
    }

    fn generator(analysis: Analysis, extractor: Arc<StubExtractor>) -> CardGenerator {
        CardGenerator::new(
            Arc::new(StubAnalyzer { analysis }),
            extractor,
            GeneratorConfig::default(),
        )
    }

    fn entity_analysis(entities: Vec<Entity>) -> Analysis {
        Analysis {
            entities,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_notes_rejected() {
        let gen = generator(
            Analysis::default(),
            Arc::new(StubExtractor::with_confidence(0.9)),
        );
        assert!(matches!(
            gen.generate("").await,
            Err(GenerateError::InvalidInput)
        ));
        assert!(matches!(
            gen.generate("   \n\t").await,
            Err(GenerateError::InvalidInput)
        ));
    }

    #[tokio::test]
    async fn analyzer_failure_propagates() {
        let gen = CardGenerator::new(
            Arc::new(FailingAnalyzer),
            Arc::new(StubExtractor::with_confidence(0.9)),
            GeneratorConfig::default(),
        );
        assert!(matches!(
            gen.generate("some notes").await,
            Err(GenerateError::Analysis(_))
        ));
    }

    #[tokio::test]
    async fn entity_questions_from_confident_extractions() {
        let analysis = entity_analysis(vec![
            Entity::new("Marie Curie", EntityCategory::Person),
            Entity::new("1898", EntityCategory::Date),
        ]);
        let gen = generator(analysis, Arc::new(StubExtractor::with_confidence(0.9)));

        let cards = gen
            .generate("Marie Curie discovered radium in 1898.")
            .await
            .unwrap();

        let questions: Vec<&str> = cards.iter().map(|c| c.question.as_str()).collect();
        assert!(questions.contains(&"Who is Marie Curie?"));
        assert!(questions.contains(&"When did 1898 happen?"));
    }

    #[tokio::test]
    async fn low_confidence_entities_dropped() {
        let analysis = entity_analysis(vec![Entity::new("Marie Curie", EntityCategory::Person)]);
        // 0.70 is not strictly greater than the 0.70 threshold
        let gen = generator(analysis, Arc::new(StubExtractor::with_confidence(0.70)));

        let cards = gen.generate("Marie Curie discovered radium.").await.unwrap();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn unknown_entity_categories_skip_extractor() {
        let analysis = entity_analysis(vec![Entity::new("mystery", EntityCategory::Other)]);
        let extractor = Arc::new(StubExtractor::with_confidence(0.9));
        let gen = generator(analysis, Arc::clone(&extractor));

        let cards = gen.generate("mystery notes here").await.unwrap();
        assert!(cards.is_empty());
        assert_eq!(extractor.calls(), 0);
    }

    #[tokio::test]
    async fn extraction_failure_is_not_fatal() {
        let analysis = entity_analysis(vec![
            Entity::new("Alpha Corp", EntityCategory::Organization),
            Entity::new("Marie Curie", EntityCategory::Person),
        ]);
        let extractor = Arc::new(StubExtractor::failing_on(0.9, "Alpha Corp"));
        let gen = generator(analysis, Arc::clone(&extractor));

        let cards = gen.generate("Alpha Corp hired Marie Curie.").await.unwrap();
        let questions: Vec<&str> = cards.iter().map(|c| c.question.as_str()).collect();
        assert!(!questions.contains(&"Who is Alpha Corp?"));
        assert!(questions.contains(&"Who is Marie Curie?"));
    }

    #[tokio::test]
    async fn cap_reached_in_strategy_a_short_circuits_b_and_c() {
        let entities: Vec<Entity> = (0..15)
            .map(|i| Entity::new(format!("Person {i}"), EntityCategory::Person))
            .collect();
        let analysis = Analysis {
            entities,
            noun_chunks: vec![NounChunk::new("the periodic table", PartOfSpeech::Noun)],
            sentences: vec![Sentence::new("Radium is an element.")],
        };
        let extractor = Arc::new(StubExtractor::with_confidence(0.9));
        let gen = generator(analysis, Arc::clone(&extractor));

        let cards = gen
            .generate("A long enough note about many different people.")
            .await
            .unwrap();

        assert_eq!(cards.len(), 10);
        // Only the first 10 entities were ever sent to the extractor.
        assert_eq!(extractor.calls(), 10);
        assert_eq!(cards[0].question, "Who is Person 0?");
        assert_eq!(cards[9].question, "Who is Person 9?");
    }

    #[tokio::test]
    async fn chunk_skip_rules_avoid_extractor_calls() {
        let analysis = Analysis {
            noun_chunks: vec![
                NounChunk::new("radium", PartOfSpeech::Noun),
                NounChunk::new("they themselves", PartOfSpeech::Pronoun),
                NounChunk::new("the periodic table", PartOfSpeech::Noun),
            ],
            ..Default::default()
        };
        let extractor = Arc::new(StubExtractor::with_confidence(0.9));
        let gen = generator(analysis, Arc::clone(&extractor));

        let cards = gen.generate("Notes about the periodic table.").await.unwrap();

        assert_eq!(extractor.calls(), 1);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is the periodic table?");
    }

    #[tokio::test]
    async fn sentence_fallback_uses_raw_predicate_on_low_confidence() {
        let analysis = Analysis {
            sentences: vec![Sentence::new("Paris is the capital of France.")],
            ..Default::default()
        };
        let gen = generator(analysis, Arc::new(StubExtractor::with_confidence(0.3)));

        let cards = gen.generate("Paris is the capital of France.").await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].question, "What is Paris?");
        assert_eq!(cards[0].answer, "the capital of France.");
    }

    #[tokio::test]
    async fn sentence_fallback_prefers_confident_extraction() {
        let analysis = Analysis {
            sentences: vec![Sentence::new("Paris is the capital of France.")],
            ..Default::default()
        };
        let gen = generator(analysis, Arc::new(StubExtractor::with_confidence(0.8)));

        let cards = gen.generate("Paris is the capital of France.").await.unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].answer, "answer for What is Paris?");
    }

    #[tokio::test]
    async fn sentence_fallback_skipped_when_enough_candidates() {
        let entities: Vec<Entity> = (0..5)
            .map(|i| Entity::new(format!("Person {i}"), EntityCategory::Person))
            .collect();
        let analysis = Analysis {
            entities,
            sentences: vec![Sentence::new("Radium is an element.")],
            ..Default::default()
        };
        let extractor = Arc::new(StubExtractor::with_confidence(0.9));
        let gen = generator(analysis, Arc::clone(&extractor));

        let cards = gen.generate("A note naming five people.").await.unwrap();

        assert_eq!(cards.len(), 5);
        // 5 entity extractions, no sentence extraction.
        assert_eq!(extractor.calls(), 5);
    }

    #[tokio::test]
    async fn deterministic_for_fixed_collaborators() {
        let analysis = Analysis {
            entities: vec![Entity::new("Marie Curie", EntityCategory::Person)],
            sentences: vec![Sentence::new("Radium is an element.")],
            ..Default::default()
        };
        let gen = generator(analysis, Arc::new(StubExtractor::with_confidence(0.9)));

        let notes = "Marie Curie discovered radium. Radium is an element.";
        let first = gen.generate(notes).await.unwrap();
        let second = gen.generate(notes).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn split_copula_priority_and_bounds() {
        let split = split_copula("Paris is the capital of France.").unwrap();
        assert_eq!(split.copula, Copula::Is);
        assert_eq!(split.subject, "Paris");
        assert_eq!(split.predicate, "the capital of France.");

        // " is " wins over a later " are ".
        let split = split_copula("The fact is that cats are mammals.").unwrap();
        assert_eq!(split.copula, Copula::Is);
        assert_eq!(split.subject, "The fact");

        let split = split_copula("Cats are mammals.").unwrap();
        assert_eq!(split.copula, Copula::Are);
        assert_eq!(split.subject, "Cats");
        assert_eq!(split.predicate, "mammals.");

        assert!(split_copula("No copula here.").is_none());
    }
}
