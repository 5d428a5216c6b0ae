//! Shared data model and the fixed JSON wire format.

pub mod manifest;
pub mod question;
pub mod stats;

pub use manifest::QuestionSetManifest;
pub use question::{Answer, Question, QuestionCatalog, QuestionFile};
pub use stats::QuestionStat;
