//! Subcommand entry points.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::browser;
use crate::catalog::{QuestionFile, QuestionSetManifest};
use crate::config::Config;
use crate::ocr::{self, OcrEngine};
use crate::quiz::{terminal, JsonStatsStore};
use crate::scraper;

pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Crawl the whole catalog and write it as JSON.
    ///
    /// The file is written only after the full run succeeded; a structural
    /// mismatch anywhere aborts with nothing on disk.
    pub async fn run_scrape(&self, output: Option<PathBuf>) -> Result<()> {
        log_banner("Scraping the question catalog");
        info!("Scraping {}", self.config.start_url);

        let (mut browser, page) =
            browser::launch_headless_browser(&self.config.start_url).await?;

        let timeout = Duration::from_secs(self.config.scrape_timeout_secs);
        let catalog = tokio::time::timeout(timeout, scraper::scrape_catalog(&page, &self.config))
            .await
            .context("scrape run exceeded the configured timeout")??;

        let _ = browser.close().await;

        let path = output.unwrap_or_else(|| PathBuf::from(&self.config.scrape_output_file));
        QuestionFile::Catalog(catalog).save(&path)?;
        info!("✓ crawl finished, data written to {}", path.display());
        Ok(())
    }

    /// Enrich a scraped file with recognized question text.
    pub async fn run_ocr(&self, input: &Path, output: &Path) -> Result<()> {
        log_banner("OCR enrichment");
        let file = QuestionFile::load(input)?;
        let engine = OcrEngine::new(&self.config);
        let enriched = ocr::enrich_file(file, &engine).await?;
        enriched.save(output)?;
        info!("✓ OCR completed, results saved to {}", output.display());
        Ok(())
    }

    /// Interactive practice over a question file.
    pub async fn run_quiz(&self, set: Option<&str>, file: Option<&Path>) -> Result<()> {
        let path = self.resolve_question_file(set, file)?;
        let question_file = QuestionFile::load(&path)?;
        let store = JsonStatsStore::open(&self.config.stats_file)?;
        terminal::run(&question_file, store)
    }

    /// Validate the one-correct-answer invariant of a question file.
    pub fn run_check(&self, file: &Path) -> Result<()> {
        let question_file = QuestionFile::load(file)?;
        let violations = question_file.one_correct_violations();

        if violations.is_empty() {
            info!("✓ every question has exactly one correct answer");
            return Ok(());
        }
        for number in &violations {
            warn!(
                "question {} does not have exactly one correct answer",
                number
            );
        }
        anyhow::bail!(
            "{} question(s) violate the one-correct-answer invariant",
            violations.len()
        );
    }

    /// `--file` wins; otherwise the set name is resolved through the
    /// manifest. Without a name the manifest must list exactly one set.
    fn resolve_question_file(&self, set: Option<&str>, file: Option<&Path>) -> Result<PathBuf> {
        if let Some(file) = file {
            return Ok(file.to_path_buf());
        }

        let manifest_path = Path::new(&self.config.manifest_file);
        let manifest = QuestionSetManifest::load(manifest_path)?;

        match set {
            Some(name) => manifest.resolve(manifest_path, name),
            None => {
                let names = manifest.set_names();
                match names.as_slice() {
                    [only] => manifest.resolve(manifest_path, only),
                    [] => anyhow::bail!("the manifest lists no question sets"),
                    _ => anyhow::bail!(
                        "several question sets available ({}), pick one with --set",
                        names.join(", ")
                    ),
                }
            }
        }
    }
}

fn log_banner(title: &str) {
    info!("{}", "=".repeat(60));
    info!(
        "{} - {}",
        title,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
}
