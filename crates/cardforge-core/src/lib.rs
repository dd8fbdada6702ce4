//! cardforge-core — flashcard generation pipeline, traits, and curation.
//!
//! This crate defines the fundamental data model, the collaborator traits
//! for the linguistic analyzer and the answer extractor, and the generation
//! logic that the rest of the cardforge workspace builds on.

pub mod curate;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod synth;
pub mod traits;
