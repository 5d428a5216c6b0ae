use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fragenkatalog::app::App;
use fragenkatalog::{logger, Config};

#[derive(Parser)]
#[command(name = "fragenkatalog", about = "Einbürgerungstest question catalog toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape the official catalog into a JSON file
    Scrape {
        /// Output file (defaults to the configured path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run OCR over the image questions of a scraped file
    Ocr {
        /// Scraper output to enrich
        #[arg(short, long)]
        input: PathBuf,
        /// Enriched output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Practice questions in the terminal
    Quiz {
        /// Question set name, resolved through the manifest
        #[arg(short, long)]
        set: Option<String>,
        /// Question file, bypassing the manifest
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Verify that every question has exactly one correct answer
    Check {
        /// Question file to validate
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let config = Config::from_env();
    let app = App::new(config);

    match Cli::parse().command {
        Command::Scrape { output } => app.run_scrape(output).await,
        Command::Ocr { input, output } => app.run_ocr(&input, &output).await,
        Command::Quiz { set, file } => app.run_quiz(set.as_deref(), file.as_deref()).await,
        Command::Check { file } => app.run_check(&file),
    }
}
