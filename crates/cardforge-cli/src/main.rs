//! cardforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cardforge", version, about = "Flashcard generation from study notes")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate flashcards from a notes file
    Generate {
        /// Path to the notes text file, or "-" for stdin
        #[arg(long)]
        notes: PathBuf,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Write output to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Show the linguistic analysis for a notes file
    Analyze {
        /// Path to the notes text file, or "-" for stdin
        #[arg(long)]
        notes: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cardforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            notes,
            format,
            output,
            config,
        } => commands::generate::execute(notes, format, output, config).await,
        Commands::Analyze { notes } => commands::analyze::execute(notes).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
