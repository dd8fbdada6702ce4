pub mod analyze;
pub mod generate;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

/// Read notes from a file, or from stdin when the path is "-".
pub fn read_notes(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut notes = String::new();
        std::io::stdin()
            .read_to_string(&mut notes)
            .context("failed to read notes from stdin")?;
        Ok(notes)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read notes file: {}", path.display()))
    }
}
