//! # Fragenkatalog
//!
//! Tooling around the BAMF Einbürgerungstest question catalog.
//!
//! The crate is split along the three stages of the pipeline:
//!
//! ### ① Scraping (`browser/` + `scraper/`)
//! - `browser/` holds the headless-browser plumbing (launch, event handler)
//! - `scraper/` walks the official catalog page by page and accumulates the
//!   questions into an explicit [`scraper::ScrapeRun`]
//!
//! ### ② Enrichment (`ocr/`)
//! - downloads question images and runs Tesseract (German) over them,
//!   merging the recognized text back into the catalog
//!
//! ### ③ Practice (`quiz/`)
//! - `quiz::QuizSession` - UI-agnostic question/answer state machine
//! - `quiz::StatsStore` - plain key-value interface for per-question stats
//! - `quiz::terminal` - line-oriented terminal front-end
//!
//! `catalog/` carries the shared data model and the fixed JSON wire format
//! produced by the scraper and consumed by the quiz.

pub mod app;
pub mod browser;
pub mod catalog;
pub mod config;
pub mod error;
pub mod logger;
pub mod ocr;
pub mod quiz;
pub mod scraper;

// Re-export the types most callers need.
pub use catalog::{Answer, Question, QuestionCatalog, QuestionFile, QuestionStat};
pub use config::Config;
pub use error::{OcrError, ScrapeError, StoreError};
pub use quiz::{JsonStatsStore, QuizMode, QuizSession, StatsStore};
pub use scraper::ScrapeRun;
