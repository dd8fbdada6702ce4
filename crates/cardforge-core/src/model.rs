//! Core data model types for cardforge.
//!
//! These are the fundamental types the entire cardforge system uses to
//! represent analyzed notes, candidate question/answer pairs, and the
//! finished cards returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Semantic category assigned to an entity span by the analyzer.
///
/// Categories the question synthesizer has no template for are collapsed
/// into [`EntityCategory::Other`] and skipped downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityCategory {
    Person,
    Organization,
    /// Nationality, religious or political group.
    Group,
    /// Country, city, state.
    GeoPolitical,
    Location,
    Date,
    Event,
    Time,
    /// Bare number.
    Cardinal,
    Money,
    Percent,
    Quantity,
    Ordinal,
    Product,
    WorkOfArt,
    Law,
    Language,
    Facility,
    /// Any category without a question template.
    Other,
}

impl fmt::Display for EntityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityCategory::Person => "person",
            EntityCategory::Organization => "organization",
            EntityCategory::Group => "group",
            EntityCategory::GeoPolitical => "geo_political",
            EntityCategory::Location => "location",
            EntityCategory::Date => "date",
            EntityCategory::Event => "event",
            EntityCategory::Time => "time",
            EntityCategory::Cardinal => "cardinal",
            EntityCategory::Money => "money",
            EntityCategory::Percent => "percent",
            EntityCategory::Quantity => "quantity",
            EntityCategory::Ordinal => "ordinal",
            EntityCategory::Product => "product",
            EntityCategory::WorkOfArt => "work_of_art",
            EntityCategory::Law => "law",
            EntityCategory::Language => "language",
            EntityCategory::Facility => "facility",
            EntityCategory::Other => "other",
        };
        write!(f, "{name}")
    }
}

impl FromStr for EntityCategory {
    type Err = String;

    /// Parses a category name. Common tagger abbreviations ("org", "gpe",
    /// "norp", "fac", "loc") are accepted; anything unrecognized maps to
    /// [`EntityCategory::Other`] rather than failing, since unknown
    /// categories are legal analyzer output and simply produce no question.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "person" => EntityCategory::Person,
            "org" | "organization" => EntityCategory::Organization,
            "norp" | "group" => EntityCategory::Group,
            "gpe" | "geo_political" => EntityCategory::GeoPolitical,
            "loc" | "location" => EntityCategory::Location,
            "date" => EntityCategory::Date,
            "event" => EntityCategory::Event,
            "time" => EntityCategory::Time,
            "cardinal" => EntityCategory::Cardinal,
            "money" => EntityCategory::Money,
            "percent" => EntityCategory::Percent,
            "quantity" => EntityCategory::Quantity,
            "ordinal" => EntityCategory::Ordinal,
            "product" => EntityCategory::Product,
            "work_of_art" => EntityCategory::WorkOfArt,
            "law" => EntityCategory::Law,
            "language" => EntityCategory::Language,
            "fac" | "facility" => EntityCategory::Facility,
            _ => EntityCategory::Other,
        })
    }
}

/// A span of text tagged with a semantic category by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// The span text as it appears in the note.
    pub text: String,
    /// The category driving question-template selection.
    pub category: EntityCategory,
}

impl Entity {
    pub fn new(text: impl Into<String>, category: EntityCategory) -> Self {
        Self {
            text: text.into(),
            category,
        }
    }
}

/// Part of speech guessed for a noun chunk's head word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Pronoun,
    Other,
}

/// A maximal noun-phrase span identified by the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NounChunk {
    /// The chunk text as it appears in the note.
    pub text: String,
    /// Part of speech of the chunk's head word.
    pub head_pos: PartOfSpeech,
}

impl NounChunk {
    pub fn new(text: impl Into<String>, head_pos: PartOfSpeech) -> Self {
        Self {
            text: text.into(),
            head_pos,
        }
    }
}

/// A contiguous non-empty sentence of the note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
}

impl Sentence {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Everything the analyzer reports for one note.
///
/// Document order is preserved within each list; the pipeline's strategy
/// order depends on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub noun_chunks: Vec<NounChunk>,
    #[serde(default)]
    pub sentences: Vec<Sentence>,
}

/// A provisional question/answer pair awaiting curation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub question: String,
    pub answer: String,
    /// Extraction certainty in [0, 1]. Fallback answers that bypassed the
    /// extractor carry 0.0.
    pub confidence: f32,
}

/// A finalized question/answer pair returned to the caller.
///
/// Invariant: question and answer are non-empty; fallback-derived answers
/// are longer than 2 characters, QA-derived answers passed the extractor's
/// confidence threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}
