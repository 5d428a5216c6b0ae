//! Question practice.
//!
//! `session` holds the UI-agnostic state machine, `store` the persisted
//! per-question statistics behind a plain key-value interface, and
//! `terminal` a line-oriented front-end over both.

pub mod session;
pub mod store;
pub mod terminal;

pub use session::{AnswerOutcome, QuizMode, QuizSession};
pub use store::{JsonStatsStore, StatsStore};
