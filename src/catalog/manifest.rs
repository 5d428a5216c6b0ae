//! Question-set manifest.
//!
//! Instead of globbing a data directory at runtime, the available question
//! sets are declared explicitly in a small TOML file:
//!
//! ```toml
//! [sets]
//! Hessen = "data/Hessen_AFTER_OCR.json"
//! Bayern = "data/Bayern_AFTER_OCR.json"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSetManifest {
    sets: BTreeMap<String, PathBuf>,
}

impl QuestionSetManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read manifest: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("cannot parse manifest: {}", path.display()))
    }

    pub fn set_names(&self) -> Vec<String> {
        self.sets.keys().cloned().collect()
    }

    /// Path of the named set. Relative paths are resolved against the
    /// manifest's own directory.
    pub fn resolve(&self, manifest_path: &Path, set_name: &str) -> Result<PathBuf> {
        let Some(set_path) = self.sets.get(set_name) else {
            bail!(
                "unknown question set {:?}, available: {}",
                set_name,
                self.set_names().join(", ")
            );
        };
        if set_path.is_absolute() {
            return Ok(set_path.clone());
        }
        let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        Ok(base.join(set_path))
    }
}
