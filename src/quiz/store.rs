//! Persisted per-question statistics.
//!
//! The quiz only needs a plain key-value store keyed by question number, so
//! that is the whole interface; the shipped implementation is a single JSON
//! file, rewritten on every put. One answer submission is one
//! read-modify-write, and a single writer is assumed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::catalog::QuestionStat;
use crate::error::StoreError;

pub trait StatsStore {
    fn get(&self, question_number: u32) -> Result<Option<QuestionStat>>;
    fn put(&mut self, stat: QuestionStat) -> Result<()>;
    fn list(&self) -> Result<Vec<QuestionStat>>;

    /// Increment exactly one counter of the stat for `question_number`,
    /// creating the stat on first contact.
    fn record_answer(&mut self, question_number: u32, is_correct: bool) -> Result<QuestionStat> {
        let mut stat = self
            .get(question_number)?
            .unwrap_or_else(|| QuestionStat::new(question_number));
        stat.record(is_correct);
        self.put(stat.clone())?;
        Ok(stat)
    }
}

/// JSON-file backed store. The whole file is loaded on open and rewritten
/// on every put.
pub struct JsonStatsStore {
    path: PathBuf,
    stats: BTreeMap<u32, QuestionStat>,
}

impl JsonStatsStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let stats = if path.exists() {
            let content = std::fs::read_to_string(&path).map_err(|source| StoreError::Read {
                path: path.display().to_string(),
                source,
            })?;
            let list: Vec<QuestionStat> =
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.display().to_string(),
                    source,
                })?;
            list.into_iter().map(|s| (s.question_number, s)).collect()
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, stats })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let list: Vec<&QuestionStat> = self.stats.values().collect();
        let content = serde_json::to_string_pretty(&list)?;
        std::fs::write(&self.path, content).map_err(|source| {
            StoreError::Write {
                path: self.path.display().to_string(),
                source,
            }
            .into()
        })
    }
}

impl StatsStore for JsonStatsStore {
    fn get(&self, question_number: u32) -> Result<Option<QuestionStat>> {
        Ok(self.stats.get(&question_number).cloned())
    }

    fn put(&mut self, stat: QuestionStat) -> Result<()> {
        self.stats.insert(stat.question_number, stat);
        self.persist()
    }

    fn list(&self) -> Result<Vec<QuestionStat>> {
        Ok(self.stats.values().cloned().collect())
    }
}

/// In-memory store for tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStatsStore {
    stats: BTreeMap<u32, QuestionStat>,
}

#[cfg(test)]
impl StatsStore for MemoryStatsStore {
    fn get(&self, question_number: u32) -> Result<Option<QuestionStat>> {
        Ok(self.stats.get(&question_number).cloned())
    }

    fn put(&mut self, stat: QuestionStat) -> Result<()> {
        self.stats.insert(stat.question_number, stat);
        Ok(())
    }

    fn list(&self) -> Result<Vec<QuestionStat>> {
        Ok(self.stats.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "fragenkatalog_stats_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn json_store_round_trips_through_the_file() {
        let path = temp_store_path("roundtrip");
        let _ = std::fs::remove_file(&path);

        {
            let mut store = JsonStatsStore::open(&path).unwrap();
            assert!(store.get(12).unwrap().is_none());
            store.record_answer(12, true).unwrap();
            store.record_answer(12, false).unwrap();
            store.record_answer(7, false).unwrap();
        }

        // A fresh open must see the persisted counters.
        let store = JsonStatsStore::open(&path).unwrap();
        let stat = store.get(12).unwrap().unwrap();
        assert_eq!((stat.correct_count, stat.incorrect_count), (1, 1));
        assert_eq!(store.list().unwrap().len(), 2);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn record_answer_touches_only_its_own_stat() {
        let mut store = MemoryStatsStore::default();
        store.record_answer(1, true).unwrap();
        store.record_answer(2, false).unwrap();

        store.record_answer(1, true).unwrap();

        let one = store.get(1).unwrap().unwrap();
        let two = store.get(2).unwrap().unwrap();
        assert_eq!((one.correct_count, one.incorrect_count), (2, 0));
        assert_eq!((two.correct_count, two.incorrect_count), (0, 1));
    }
}
