//! The `cardforge analyze` command: a debugging view of what the
//! analyzer reports for a notes file.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use cardforge_core::traits::Analyzer;
use cardforge_nlp::create_analyzer;

use super::read_notes;

pub async fn execute(notes_path: PathBuf) -> Result<()> {
    let notes = read_notes(&notes_path)?;
    let analyzer = create_analyzer();
    let analysis = analyzer.analyze(&notes).await?;

    println!(
        "Analysis: {} entities, {} noun chunks, {} sentences",
        analysis.entities.len(),
        analysis.noun_chunks.len(),
        analysis.sentences.len()
    );

    if !analysis.entities.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Entity", "Category"]);
        for entity in &analysis.entities {
            table.add_row(vec![
                Cell::new(&entity.text),
                Cell::new(entity.category.to_string()),
            ]);
        }
        println!("\nEntities\n{table}");
    }

    if !analysis.noun_chunks.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Noun chunk", "Head POS"]);
        for chunk in &analysis.noun_chunks {
            table.add_row(vec![
                Cell::new(&chunk.text),
                Cell::new(format!("{:?}", chunk.head_pos)),
            ]);
        }
        println!("\nNoun chunks\n{table}");
    }

    Ok(())
}
