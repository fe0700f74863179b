// file: src/models/report.rs
// description: Outcome of a single strip operation
// reference: internal data model

use crate::strip::RemovalRange;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StripReport {
    pub path: PathBuf,
    pub range: RemovalRange,
    pub original_lines: usize,
    pub kept_lines: usize,
    pub fingerprint_before: String,
    pub fingerprint_after: String,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

impl StripReport {
    /// Lines removed. Negative when an inverted range duplicated lines.
    pub fn removed(&self) -> i64 {
        self.original_lines as i64 - self.kept_lines as i64
    }

    pub fn changed(&self) -> bool {
        self.fingerprint_before != self.fingerprint_after
    }

    pub fn removed_line(&self) -> String {
        format!("Removed {} orphaned lines", self.removed())
    }

    pub fn reduced_line(&self) -> String {
        format!(
            "File reduced from {} to {} lines",
            self.original_lines, self.kept_lines
        )
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Several reports as one JSON array, so a multi-pass run stays a single
    /// parseable document.
    pub fn to_json_array(reports: &[StripReport], pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(reports)?
        } else {
            serde_json::to_string(reports)?
        };
        Ok(json)
    }
}
