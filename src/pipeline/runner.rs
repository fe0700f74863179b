// file: src/pipeline/runner.rs
// description: runs configured strip passes in order with the journal guard
// reference: sequential pass orchestration

use crate::config::{Config, PassConfig};
use crate::error::{Result, StripError};
use crate::journal::PassJournal;
use crate::models::StripReport;
use crate::strip::{LineRangeStripper, SourceDocument, StripOptions};
use crate::utils::OperationTimer;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Runs passes one after another. Several passes may share a target, so the
/// runner remembers per target the backup it took and, in dry-run mode, the
/// content the previous pass would have left.
pub struct PassRunner {
    stripper: LineRangeStripper,
    journal: Option<PassJournal>,
    force: bool,
    backups: HashMap<PathBuf, PathBuf>,
    previews: HashMap<PathBuf, SourceDocument>,
}

impl PassRunner {
    pub fn new(stripper: LineRangeStripper, journal: Option<PassJournal>, force: bool) -> Self {
        Self {
            stripper,
            journal,
            force,
            backups: HashMap::new(),
            previews: HashMap::new(),
        }
    }

    /// Builds a runner from configuration, loading the journal when enabled.
    pub async fn from_config(config: &Config, options: StripOptions, force: bool) -> Result<Self> {
        let journal = if config.journal.enabled {
            Some(PassJournal::load(&config.journal.path).await?)
        } else {
            None
        };

        Ok(Self::new(LineRangeStripper::new(options), journal, force))
    }

    pub fn journal(&self) -> Option<&PassJournal> {
        self.journal.as_ref()
    }

    pub async fn run_pass(&mut self, pass: &PassConfig) -> Result<StripReport> {
        let target = pass.target();
        let timer = OperationTimer::new(&format!("pass {}", pass.name));

        let document = match self.previews.get(&target) {
            Some(preview) => preview.clone(),
            None => SourceDocument::read(&target).await?,
        };

        if let Some(journal) = &self.journal
            && let Some(entry) =
                journal.find_applied(&pass.name, &target, &document.fingerprint())
        {
            if !self.force {
                return Err(StripError::Validation(format!(
                    "pass {} was already applied to {} at {}; use --force to run it again",
                    pass.name,
                    target.display(),
                    entry.applied_at
                )));
            }
            warn!(
                "Re-running pass {} on {} (already applied at {})",
                pass.name,
                target.display(),
                entry.applied_at
            );
        }

        // The first backup of a target holds its original bytes; later passes
        // in the same run must not replace it.
        let earlier_backup = self.backups.get(&target).cloned();
        let mut report = match &earlier_backup {
            Some(_) => {
                self.stripper
                    .without_backup()
                    .strip_document(&document, pass.range())
                    .await?
            }
            None => self.stripper.strip_document(&document, pass.range()).await?,
        };

        if let Some(backup) = earlier_backup {
            report.backup = Some(backup);
        } else if let Some(backup) = &report.backup {
            self.backups.insert(target.clone(), backup.clone());
        }

        if report.dry_run {
            let preview = document.with_lines(pass.range().apply(document.lines()));
            self.previews.insert(target, preview);
        } else if let Some(journal) = &mut self.journal {
            journal.record(&pass.name, &report);
            if let Err(e) = journal.save().await {
                error!(
                    "{} was already rewritten by pass {} but the journal could not be saved; \
                     the pass will not be detected as applied",
                    target.display(),
                    pass.name
                );
                return Err(e);
            }
        }

        timer.finish_with_count(report.original_lines);
        Ok(report)
    }

    /// Runs `passes` one after another in the given order, stopping at the
    /// first failure.
    pub async fn run_all(&mut self, passes: &[PassConfig]) -> Result<Vec<StripReport>> {
        info!("Running {} passes", passes.len());

        let mut reports = Vec::with_capacity(passes.len());
        for pass in passes {
            reports.push(self.run_pass(pass).await?);
        }

        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_numbered(path: &Path, count: usize) {
        let content: String = (0..count).map(|i| format!("line {}\n", i)).collect();
        std::fs::write(path, content).unwrap();
    }

    fn pass(name: &str, path: &Path, start: usize, end: usize) -> PassConfig {
        PassConfig {
            name: name.to_string(),
            path: path.to_path_buf(),
            start,
            end,
            description: None,
        }
    }

    async fn runner(journal_path: PathBuf, options: StripOptions, force: bool) -> PassRunner {
        let journal = PassJournal::load(journal_path).await.unwrap();
        PassRunner::new(LineRangeStripper::new(options), Some(journal), force)
    }

    #[tokio::test]
    async fn test_run_all_in_declared_order() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("MainViewController.java");
        write_numbered(&target, 700);

        let passes = vec![
            pass("edit-export-panels", &target, 172, 374),
            pass("mode-methods", &target, 266, 632),
        ];
        let mut runner = runner(temp.path().join("journal.json"), StripOptions::default(), false).await;

        let reports = runner.run_all(&passes).await.unwrap();

        assert_eq!(reports[0].original_lines, 700);
        assert_eq!(reports[0].kept_lines, 498);
        assert_eq!(reports[1].original_lines, 498);
        assert_eq!(reports[1].kept_lines, 266);
        assert_eq!(runner.journal().unwrap().entries().len(), 2);
    }

    #[tokio::test]
    async fn test_reapplying_pass_is_refused() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Main.java");
        write_numbered(&target, 10);
        let journal_path = temp.path().join("journal.json");
        let cleanup = pass("cleanup", &target, 3, 6);

        let mut first = runner(journal_path.clone(), StripOptions::default(), false).await;
        first.run_pass(&cleanup).await.unwrap();

        let mut second = runner(journal_path.clone(), StripOptions::default(), false).await;
        let err = second.run_pass(&cleanup).await.unwrap_err();
        assert!(err.to_string().contains("already applied"));
        assert_eq!(std::fs::read_to_string(&target).unwrap().lines().count(), 7);

        let mut forced = runner(journal_path, StripOptions::default(), true).await;
        let report = forced.run_pass(&cleanup).await.unwrap();
        assert_eq!(report.kept_lines, 4);
    }

    #[tokio::test]
    async fn test_dry_run_is_not_journaled() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Main.java");
        write_numbered(&target, 10);
        let journal_path = temp.path().join("journal.json");
        let options = StripOptions {
            dry_run: true,
            ..StripOptions::default()
        };

        let mut runner = runner(journal_path.clone(), options, false).await;
        runner.run_pass(&pass("cleanup", &target, 3, 6)).await.unwrap();

        assert!(runner.journal().unwrap().entries().is_empty());
        assert!(!journal_path.exists());
    }

    #[tokio::test]
    async fn test_run_all_stops_at_first_failure() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Main.java");
        write_numbered(&target, 10);

        let passes = vec![
            pass("missing", &temp.path().join("Missing.java"), 0, 1),
            pass("cleanup", &target, 3, 6),
        ];
        let mut runner = PassRunner::new(LineRangeStripper::default(), None, false);

        assert!(runner.run_all(&passes).await.is_err());
        assert_eq!(std::fs::read_to_string(&target).unwrap().lines().count(), 10);
    }

    #[tokio::test]
    async fn test_backup_survives_later_passes_on_same_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("MainViewController.java");
        write_numbered(&target, 700);
        let original = std::fs::read(&target).unwrap();

        let passes = vec![
            pass("edit-export-panels", &target, 172, 374),
            pass("mode-methods", &target, 266, 632),
        ];
        let options = StripOptions {
            backup: true,
            ..StripOptions::default()
        };
        let mut runner = PassRunner::new(LineRangeStripper::new(options), None, false);

        let reports = runner.run_all(&passes).await.unwrap();

        let backup = temp.path().join("MainViewController.java.orig");
        assert_eq!(reports[0].backup.as_ref(), Some(&backup));
        assert_eq!(reports[1].backup.as_ref(), Some(&backup));
        assert_eq!(std::fs::read(&backup).unwrap(), original);
        assert_eq!(std::fs::read_to_string(&target).unwrap().lines().count(), 266);
    }

    #[tokio::test]
    async fn test_dry_run_chains_passes_on_same_file() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("MainViewController.java");
        write_numbered(&target, 700);
        let original = std::fs::read(&target).unwrap();

        let passes = vec![
            pass("edit-export-panels", &target, 172, 374),
            pass("mode-methods", &target, 266, 632),
        ];
        let options = StripOptions {
            dry_run: true,
            ..StripOptions::default()
        };
        let mut runner = PassRunner::new(LineRangeStripper::new(options), None, false);

        let reports = runner.run_all(&passes).await.unwrap();

        assert_eq!((reports[0].original_lines, reports[0].kept_lines), (700, 498));
        assert_eq!((reports[1].original_lines, reports[1].kept_lines), (498, 266));
        assert_eq!(std::fs::read(&target).unwrap(), original);
    }

    #[tokio::test]
    async fn test_journal_save_failure_is_reported_after_rewrite() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("Main.java");
        write_numbered(&target, 10);
        let journal_path = temp.path().join("journal.json");

        let mut runner = runner(journal_path.clone(), StripOptions::default(), false).await;
        std::fs::create_dir(&journal_path).unwrap();

        let err = runner
            .run_pass(&pass("cleanup", &target, 3, 6))
            .await
            .unwrap_err();

        assert!(matches!(err, StripError::FileOperation { .. }));
        assert_eq!(std::fs::read_to_string(&target).unwrap().lines().count(), 7);
    }
}
