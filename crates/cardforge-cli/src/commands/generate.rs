//! The `cardforge generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use cardforge_core::model::Flashcard;
use cardforge_nlp::{create_generator, load_config_from};

use super::read_notes;

pub async fn execute(
    notes_path: PathBuf,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        format == "table" || format == "json",
        "unknown format: '{format}' (expected table or json)"
    );

    let notes = read_notes(&notes_path)?;
    let config = load_config_from(config_path.as_deref())?;
    let generator = create_generator(&config);

    let cards = generator.generate(&notes).await?;
    eprintln!("Generated {} flashcard(s)", cards.len());

    let rendered = match format.as_str() {
        "json" => serde_json::to_string_pretty(&serde_json::json!({ "flashcards": cards }))?,
        _ => render_table(&cards),
    };

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write output to {}", path.display()))?;
            eprintln!("Output saved to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn render_table(cards: &[Flashcard]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Answer"]);
    for (i, card) in cards.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&card.question),
            Cell::new(&card.answer),
        ]);
    }
    table.to_string()
}
