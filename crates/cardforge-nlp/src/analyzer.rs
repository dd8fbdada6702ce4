//! Rule-based linguistic analyzer.
//!
//! A lightweight stand-in for a statistical NLP model: regular expressions
//! and keyword tables mine entities, noun chunks, and sentence boundaries
//! out of raw notes. Tagging precision is best-effort; the pipeline's
//! confidence thresholds do the real filtering downstream.

use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;

use cardforge_core::model::{Analysis, Entity, EntityCategory, NounChunk, PartOfSpeech, Sentence};
use cardforge_core::traits::Analyzer;

use crate::text::{split_sentences, stopword_set};

/// Suffix tokens that mark a capitalized span as an organization.
const ORG_SUFFIXES: &[&str] = &[
    "inc",
    "corp",
    "corporation",
    "ltd",
    "llc",
    "company",
    "university",
    "institute",
    "association",
    "organization",
    "agency",
    "committee",
    "foundation",
    "society",
];

/// Honorifics that mark the following span as a person.
const HONORIFICS: &[&str] = &[
    "dr",
    "mr",
    "mrs",
    "ms",
    "prof",
    "professor",
    "president",
    "king",
    "queen",
    "sir",
];

/// Prepositions whose object is tagged as a geo-political entity.
const LOCATIVE_PREPOSITIONS: &[&str] = &["in", "at", "from", "near", "to", "of"];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their",
];

const PRONOUNS: &[&str] = &[
    "i",
    "you",
    "he",
    "she",
    "it",
    "we",
    "they",
    "me",
    "him",
    "us",
    "them",
    "himself",
    "herself",
    "itself",
    "themselves",
    "who",
    "whom",
];

/// Pattern-based analyzer implementing [`Analyzer`].
pub struct RuleAnalyzer {
    money_re: Regex,
    percent_re: Regex,
    quantity_re: Regex,
    time_re: Regex,
    date_re: Regex,
    ordinal_re: Regex,
    cardinal_re: Regex,
    proper_re: Regex,
    stopwords: HashSet<String>,
}

impl RuleAnalyzer {
    pub fn new() -> Self {
        Self {
            money_re: Regex::new(
                r"\$\d[\d,]*(?:\.\d+)?(?:\s*(?:million|billion|trillion))?|\b\d[\d,]*(?:\.\d+)?\s+(?:dollars|euros|pounds)\b",
            )
            .expect("valid money regex"),
            percent_re: Regex::new(r"\b\d+(?:\.\d+)?(?:%|\s*percent\b)").expect("valid percent regex"),
            quantity_re: Regex::new(
                r"\b\d[\d,]*(?:\.\d+)?\s*(?:kg|km|cm|mm|kilograms?|kilometres?|kilometers?|metres?|meters?|miles?|grams?|litres?|liters?|tonnes?|tons?|ounces?|degrees?)\b",
            )
            .expect("valid quantity regex"),
            time_re: Regex::new(r"\b\d{1,2}:\d{2}(?:\s*(?:am|pm|AM|PM))?\b")
                .expect("valid time regex"),
            date_re: Regex::new(
                r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)(?:\s+\d{1,2}(?:st|nd|rd|th)?)?(?:,?\s*\d{4})?\b|\b(?:1[0-9]{3}|20[0-9]{2})\b|\b\d{1,2}/\d{1,2}/\d{2,4}\b",
            )
            .expect("valid date regex"),
            ordinal_re: Regex::new(
                r"\b\d+(?:st|nd|rd|th)\b|\b(?i:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b",
            )
            .expect("valid ordinal regex"),
            cardinal_re: Regex::new(r"\b\d[\d,]*(?:\.\d+)?\b").expect("valid cardinal regex"),
            proper_re: Regex::new(r"\b[A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*\b")
                .expect("valid proper-noun regex"),
            stopwords: stopword_set(),
        }
    }

    /// Mine entity spans in document order.
    ///
    /// Each pattern family has a priority; when spans overlap, the earlier
    /// span wins, and at equal starts the higher-priority family wins
    /// (e.g. "1898" is a date, not a bare cardinal).
    fn entities(&self, text: &str) -> Vec<Entity> {
        struct Span {
            start: usize,
            end: usize,
            category: EntityCategory,
            priority: u8,
        }

        let mut spans: Vec<Span> = Vec::new();

        let families: [(&Regex, EntityCategory, u8); 6] = [
            (&self.money_re, EntityCategory::Money, 0),
            (&self.percent_re, EntityCategory::Percent, 1),
            (&self.quantity_re, EntityCategory::Quantity, 2),
            (&self.time_re, EntityCategory::Time, 3),
            (&self.date_re, EntityCategory::Date, 4),
            (&self.ordinal_re, EntityCategory::Ordinal, 5),
        ];
        for (re, category, priority) in families {
            for m in re.find_iter(text) {
                spans.push(Span {
                    start: m.start(),
                    end: m.end(),
                    category,
                    priority,
                });
            }
        }

        for m in self.cardinal_re.find_iter(text) {
            spans.push(Span {
                start: m.start(),
                end: m.end(),
                category: EntityCategory::Cardinal,
                priority: 6,
            });
        }

        for m in self.proper_re.find_iter(text) {
            let (start, span_text) = self.strip_leading_stopwords(m.start(), m.as_str());
            if span_text.is_empty() {
                continue;
            }
            if let Some(category) = self.classify_proper(text, start, span_text) {
                spans.push(Span {
                    start,
                    end: start + span_text.len(),
                    category,
                    priority: 7,
                });
            }
        }

        spans.sort_by_key(|s| (s.start, s.priority));

        let mut entities = Vec::new();
        let mut last_end = 0usize;
        for span in spans {
            if span.start < last_end {
                continue;
            }
            entities.push(Entity::new(&text[span.start..span.end], span.category));
            last_end = span.end;
        }
        entities
    }

    /// Drop sentence-case stop words ("The", "In", …) from the front of a
    /// capitalized span, keeping byte offsets aligned with the note.
    fn strip_leading_stopwords<'a>(&self, mut start: usize, mut span: &'a str) -> (usize, &'a str) {
        loop {
            match span.split_once(char::is_whitespace) {
                Some((first, rest)) if self.stopwords.contains(&first.to_lowercase()) => {
                    let rest = rest.trim_start();
                    start += span.len() - rest.len();
                    span = rest;
                }
                Some(_) => break,
                None => {
                    if self.stopwords.contains(&span.to_lowercase()) {
                        start += span.len();
                        span = "";
                    }
                    break;
                }
            }
        }
        (start, span)
    }

    /// Best-effort classification of a capitalized span.
    ///
    /// Single sentence-case tokens without a cue are too ambiguous to tag
    /// and yield `None`.
    fn classify_proper(
        &self,
        text: &str,
        start: usize,
        span_text: &str,
    ) -> Option<EntityCategory> {
        let tokens: Vec<&str> = span_text.split_whitespace().collect();
        let last = tokens.last()?.to_lowercase();
        if tokens.len() == 1 && HONORIFICS.contains(&last.as_str()) {
            return None;
        }
        if ORG_SUFFIXES.contains(&last.as_str()) {
            return Some(EntityCategory::Organization);
        }

        let preceding = text[..start]
            .split_whitespace()
            .last()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .unwrap_or_default();

        if HONORIFICS.contains(&preceding.as_str())
            || HONORIFICS.contains(&tokens[0].to_lowercase().as_str())
        {
            return Some(EntityCategory::Person);
        }
        if LOCATIVE_PREPOSITIONS.contains(&preceding.as_str()) {
            return Some(EntityCategory::GeoPolitical);
        }
        if tokens.len() >= 2 {
            return Some(EntityCategory::Person);
        }
        None
    }

    /// Chunk each sentence into noun phrases: runs of content words with an
    /// optional leading determiner, broken at stop words. Pronouns form
    /// their own chunks so the pipeline can recognize and skip them.
    fn noun_chunks(&self, sentences: &[String]) -> Vec<NounChunk> {
        fn flush(chunks: &mut Vec<NounChunk>, current: &mut Vec<String>) {
            if current.is_empty() {
                return;
            }
            let head_pos = match current.last().and_then(|head| head.chars().next()) {
                Some(c) if c.is_uppercase() => PartOfSpeech::ProperNoun,
                _ => PartOfSpeech::Noun,
            };
            chunks.push(NounChunk::new(current.join(" "), head_pos));
            current.clear();
        }

        let mut chunks = Vec::new();
        for sentence in sentences {
            let mut current: Vec<String> = Vec::new();
            let mut determiner: Option<String> = None;

            for raw in sentence.split_whitespace() {
                let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
                if token.is_empty() {
                    flush(&mut chunks, &mut current);
                    determiner = None;
                    continue;
                }
                let lower = token.to_lowercase();
                if PRONOUNS.contains(&lower.as_str()) {
                    flush(&mut chunks, &mut current);
                    determiner = None;
                    chunks.push(NounChunk::new(token, PartOfSpeech::Pronoun));
                } else if DETERMINERS.contains(&lower.as_str()) {
                    flush(&mut chunks, &mut current);
                    determiner = Some(token.to_string());
                } else if self.stopwords.contains(&lower) {
                    flush(&mut chunks, &mut current);
                    determiner = None;
                } else {
                    if let Some(det) = determiner.take() {
                        current.push(det);
                    }
                    current.push(token.to_string());
                }
            }
            flush(&mut chunks, &mut current);
        }
        chunks
    }
}

impl Default for RuleAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Analyzer for RuleAnalyzer {
    fn name(&self) -> &str {
        "rule"
    }

    async fn analyze(&self, text: &str) -> anyhow::Result<Analysis> {
        let sentences = split_sentences(text);
        let entities = self.entities(text);
        let noun_chunks = self.noun_chunks(&sentences);

        Ok(Analysis {
            entities,
            noun_chunks,
            sentences: sentences.into_iter().map(Sentence::new).collect(),
        })
    }
}
