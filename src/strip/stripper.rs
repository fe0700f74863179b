// file: src/strip/stripper.rs
// description: read-slice-write shell around the pure range removal
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{Result, StripError};
use crate::models::StripReport;
use crate::strip::{RemovalRange, SourceDocument};
use crate::utils::Validator;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct StripOptions {
    pub dry_run: bool,
    pub backup: bool,
    pub backup_suffix: String,
    pub strict: bool,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: false,
            backup_suffix: ".orig".to_string(),
            strict: false,
        }
    }
}

pub struct LineRangeStripper {
    options: StripOptions,
}

impl LineRangeStripper {
    pub fn new(options: StripOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StripOptions {
        &self.options
    }

    /// Same options with backups turned off.
    pub fn without_backup(&self) -> Self {
        Self::new(StripOptions {
            backup: false,
            ..self.options.clone()
        })
    }

    /// Removes `range` from the file at `path` and overwrites it in place.
    ///
    /// The file is read fully, then rewritten; nothing is locked in between
    /// and a failed write can leave it truncated.
    pub async fn strip(&self, path: &Path, range: RemovalRange) -> Result<StripReport> {
        let document = SourceDocument::read(path).await?;
        self.strip_document(&document, range).await
    }

    /// Like [`Self::strip`] for a document the caller already loaded.
    pub async fn strip_document(
        &self,
        document: &SourceDocument,
        range: RemovalRange,
    ) -> Result<StripReport> {
        let path = document.path();
        let total = document.len();

        for issue in Validator::inspect_range(&range, total) {
            warn!("{}: range {}: {}", path.display(), range, issue);
        }

        if self.options.strict {
            Validator::validate_range(&range, total)?;
        }

        let stripped = document.with_lines(range.apply(document.lines()));

        let mut report = StripReport {
            path: path.to_path_buf(),
            range,
            original_lines: total,
            kept_lines: stripped.len(),
            fingerprint_before: document.fingerprint(),
            fingerprint_after: stripped.fingerprint(),
            dry_run: self.options.dry_run,
            backup: None,
        };

        if self.options.dry_run {
            info!(
                "Dry run: {} would go from {} to {} lines",
                path.display(),
                report.original_lines,
                report.kept_lines
            );
            return Ok(report);
        }

        if self.options.backup {
            let backup_path = backup_path(path, &self.options.backup_suffix);
            fs::write(&backup_path, document.content())
                .await
                .map_err(|e| StripError::file(&backup_path, e))?;
            debug!("Backed up original to {}", backup_path.display());
            report.backup = Some(backup_path);
        }

        stripped.write().await?;

        info!(
            "Stripped {} from {}: {} -> {} lines",
            range,
            path.display(),
            report.original_lines,
            report.kept_lines
        );

        Ok(report)
    }
}

impl Default for LineRangeStripper {
    fn default() -> Self {
        Self::new(StripOptions::default())
    }
}

/// Strips `[start, end)` from `path` with default options and returns
/// `(original_count, kept_count)`.
pub async fn strip(path: &Path, start: usize, end: usize) -> Result<(usize, usize)> {
    let report = LineRangeStripper::default()
        .strip(path, RemovalRange::new(start, end))
        .await?;
    Ok((report.original_lines, report.kept_lines))
}

fn backup_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
