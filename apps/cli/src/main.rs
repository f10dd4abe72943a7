//! Deckwright CLI: turn course material and quizzes into flashcards.
//!
//! Reads extracted document text, generates basic and cloze cards, and prints
//! them as JSON or exports them as store-ready notes.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
