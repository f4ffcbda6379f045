use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const LOG_FILE_NAME: &str = "tagging.json";

/// One file that could not be tagged
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TagErrorEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub file: String,
    pub mode: String,
    pub error: String,
}

impl TagErrorEntry {
    pub fn new(file: String, mode: String, error: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            file,
            mode,
            error,
        }
    }
}

/// Tagging failures, one JSON array per day: `<base>/<YYYY-MM-DD>/tagging.json`.
/// Nothing is created on disk until the first entry is added.
pub struct ErrorLogManager {
    base_path: PathBuf,
}

impl ErrorLogManager {
    pub fn new(base_path: &Path) -> Self {
        Self {
            base_path: base_path.to_path_buf(),
        }
    }

    /// Get today's date as a string (YYYY-MM-DD)
    fn today_str() -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    fn get_log_path(&self, date: &str) -> PathBuf {
        self.base_path.join(date).join(LOG_FILE_NAME)
    }

    pub fn today_log_path(&self) -> PathBuf {
        self.get_log_path(&Self::today_str())
    }

    /// Append an entry to today's log. An existing log that cannot be read
    /// or parsed is left untouched and the error is returned.
    pub fn add_error(&self, entry: TagErrorEntry) -> anyhow::Result<()> {
        let path = self.today_log_path();

        let mut entries = self.load_entries_from_path(&path)?;
        entries.push(entry);
        self.save_entries(&path, &entries)
    }

    pub fn get_errors_for_date(&self, date: &str) -> anyhow::Result<Vec<TagErrorEntry>> {
        self.load_entries_from_path(&self.get_log_path(date))
    }

    fn load_entries_from_path(&self, path: &Path) -> anyhow::Result<Vec<TagErrorEntry>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let data =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    fn save_entries(&self, path: &Path, entries: &[TagErrorEntry]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let data = serde_json::to_string_pretty(entries)?;
        fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
