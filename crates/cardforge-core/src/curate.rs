//! Card curation: dedup, truncation, and the generic-card fallback.

use std::collections::HashSet;

use crate::model::{Candidate, Flashcard};
use crate::pipeline::GeneratorConfig;

/// Curate accumulated candidates into the final card sequence.
///
/// Deduplicates by exact question text (first occurrence wins, order
/// preserved), truncates to `config.max_cards`, and pads thin results with
/// up to two generic cards when the note is long enough. Never fails: for
/// thin notes the result may fall short of `config.min_cards`, and trivial
/// input yields an empty set.
pub fn curate(candidates: Vec<Candidate>, notes: &str, config: &GeneratorConfig) -> Vec<Flashcard> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut cards: Vec<Flashcard> = Vec::new();

    for candidate in candidates {
        if cards.len() >= config.max_cards {
            break;
        }
        if seen.insert(candidate.question.clone()) {
            cards.push(Flashcard {
                question: candidate.question,
                answer: candidate.answer,
            });
        }
    }

    if cards.len() < config.min_cards && notes.len() > config.fallback_note_len {
        for (question, answer) in generic_cards(notes) {
            if cards.len() >= config.min_cards {
                break;
            }
            if seen.insert(question.clone()) {
                cards.push(Flashcard { question, answer });
            }
        }
    }

    cards
}

/// The two last-resort generic cards for a note: the text up to the first
/// period as the "main topic", and the first 150 characters as a summary,
/// each marked with an ellipsis.
fn generic_cards(notes: &str) -> [(String, String); 2] {
    let topic = notes.split('.').next().unwrap_or(notes);
    let summary: String = notes.chars().take(150).collect();
    [
        (
            "What is the main topic of these notes?".to_string(),
            format!("{topic}..."),
        ),
        (
            "Can you provide a summary?".to_string(),
            format!("{summary}..."),
        ),
    ]
}
