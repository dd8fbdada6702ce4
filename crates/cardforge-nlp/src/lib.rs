//! cardforge-nlp — analyzer and extractor implementations.
//!
//! Implements the `Analyzer` and `AnswerExtractor` traits from
//! `cardforge-core`: a rule-based linguistic analyzer, a lexical-overlap
//! extractor, and a remote QA-service client, plus mock implementations
//! used by tests across the workspace.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod extractor;
pub mod mock;
mod text;

pub use config::{
    create_analyzer, create_extractor, create_generator, load_config, load_config_from,
    CardforgeConfig, ExtractorConfig,
};
pub use error::ExtractorError;
