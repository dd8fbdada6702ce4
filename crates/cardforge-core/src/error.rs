//! Generation error types.
//!
//! Only structural failures surface to the caller: invalid input and a
//! failed analysis pass. A failed extraction for a single candidate is
//! recovered inside the pipeline; the candidate is dropped and the
//! request continues.

use thiserror::Error;

/// Errors returned by [`CardGenerator::generate`](crate::pipeline::CardGenerator::generate).
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The notes text was empty or blank.
    #[error("notes text is empty or blank")]
    InvalidInput,

    /// The linguistic analyzer itself failed.
    #[error("linguistic analysis failed: {0}")]
    Analysis(anyhow::Error),
}
