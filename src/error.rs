use thiserror::Error;

/// Failures while walking the catalog pages.
///
/// Every variant means a structural assumption about the site no longer
/// holds; the run aborts and no output file is written.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The instruction paragraph on the landing page no longer matches the
    /// stored text. The question counts are embedded in that paragraph, so
    /// a change means the catalog layout must be re-checked by hand.
    #[error("the instruction text on the landing page has changed")]
    InstructionTextChanged,

    /// An expected element is missing from the page.
    #[error("expected element not found: {selector}")]
    MissingElement { selector: String },

    /// The region header did not contain a parseable "Aufgabe X von Y".
    #[error("could not parse question number from header: {header:?}")]
    HeaderParse { header: String },

    /// The state dropdown produced no options.
    #[error("no states offered by the catalog start page")]
    NoStates,

    /// Neither the question image nor the question text became visible.
    #[error("question {question_number} has neither image nor text")]
    EmptyQuestion { question_number: u32 },
}

/// Failures of the OCR enrichment pass. The first one aborts the batch.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("failed to download question image {url}: {message}")]
    Download { url: String, message: String },

    #[error("text recognition failed for {path}: {message}")]
    Recognition { path: String, message: String },
}

/// Failures of the statistics store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read stats file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write stats file {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("stats file {path} is not valid JSON: {source}")]
    Corrupt {
        path: String,
        source: serde_json::Error,
    },
}
