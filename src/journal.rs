// file: src/journal.rs
// description: Persistent record of applied strip passes
// reference: json metadata persistence

use crate::error::{Result, StripError};
use crate::models::StripReport;
use crate::strip::RemovalRange;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub pass: String,
    pub path: PathBuf,
    pub range: RemovalRange,
    pub fingerprint_before: String,
    pub fingerprint_after: String,
    pub original_lines: usize,
    pub kept_lines: usize,
    pub applied_at: String,
}

/// Strips are not idempotent, so every applied pass is written down together
/// with the content hash it produced. A file still carrying that hash has
/// already had the pass applied.
pub struct PassJournal {
    storage_path: PathBuf,
    entries: Vec<JournalEntry>,
}

impl PassJournal {
    pub async fn load(storage_path: impl Into<PathBuf>) -> Result<Self> {
        let storage_path = storage_path.into();

        if !storage_path.exists() {
            debug!("No journal found at {}", storage_path.display());
            return Ok(Self {
                storage_path,
                entries: Vec::new(),
            });
        }

        let contents = fs::read_to_string(&storage_path)
            .await
            .map_err(|e| StripError::file(&storage_path, e))?;

        let entries: Vec<JournalEntry> = serde_json::from_str(&contents).map_err(|e| {
            StripError::Journal(format!(
                "Failed to parse {}: {}",
                storage_path.display(),
                e
            ))
        })?;

        debug!("Loaded {} journal entries", entries.len());
        Ok(Self {
            storage_path,
            entries,
        })
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Latest entry for `pass` on `path` whose output matches `fingerprint`.
    pub fn find_applied(&self, pass: &str, path: &Path, fingerprint: &str) -> Option<&JournalEntry> {
        self.entries.iter().rev().find(|entry| {
            entry.pass == pass
                && entry.path == path
                && entry.fingerprint_after == fingerprint
                && entry.fingerprint_before != entry.fingerprint_after
        })
    }

    pub fn record(&mut self, pass: &str, report: &StripReport) -> &JournalEntry {
        self.entries.push(JournalEntry {
            pass: pass.to_string(),
            path: report.path.clone(),
            range: report.range,
            fingerprint_before: report.fingerprint_before.clone(),
            fingerprint_after: report.fingerprint_after.clone(),
            original_lines: report.original_lines,
            kept_lines: report.kept_lines,
            applied_at: Utc::now().to_rfc3339(),
        });

        &self.entries[self.entries.len() - 1]
    }

    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.storage_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StripError::file(parent, e))?;
        }

        let contents = serde_json::to_string_pretty(&self.entries)?;

        fs::write(&self.storage_path, contents)
            .await
            .map_err(|e| StripError::file(&self.storage_path, e))?;

        info!(
            "Saved {} journal entries to {}",
            self.entries.len(),
            self.storage_path.display()
        );
        Ok(())
    }
}
