use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::services::json_io::{self, NARROW_INDENT};

/// Per-category description cache, persisted after every insert.
#[derive(Debug)]
pub struct TranslationCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TranslationCache {
    /// A missing file is an empty cache. A file that exists but does not
    /// parse is an error, so it never gets overwritten.
    pub fn load(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            json_io::read_json(path)?
        } else {
            BTreeMap::new()
        };

        tracing::debug!("loaded {} cached translations from {}", entries.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Records a fresh translation and writes the whole cache to disk
    /// before returning.
    pub fn insert(&mut self, key: String, translation: String) -> Result<()> {
        self.entries.insert(key, translation);
        self.save()
    }

    pub fn save(&self) -> Result<()> {
        json_io::write_json(&self.path, &self.entries, NARROW_INDENT)
    }
}
