// file: src/utils/validation.rs
// description: path and removal range validation helpers
// reference: input validation patterns

use crate::error::{Result, StripError};
use crate::strip::RemovalRange;
use std::fmt;
use std::fs;
use std::path::Path;

/// Something about a range that makes the strip do less, or other, than its
/// numbers suggest. These are diagnostics, not failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeIssue {
    Inverted { start: usize, end: usize },
    Empty { at: usize },
    StartPastEnd { start: usize, total: usize },
    EndPastEnd { end: usize, total: usize },
}

impl fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeIssue::Inverted { start, end } => write!(
                f,
                "start {} is after end {}; lines {}..{} will be duplicated",
                start, end, end, start
            ),
            RangeIssue::Empty { at } => write!(f, "empty range at line {}; nothing removed", at),
            RangeIssue::StartPastEnd { start, total } => write!(
                f,
                "start {} is past the last line (file has {} lines)",
                start, total
            ),
            RangeIssue::EndPastEnd { end, total } => write!(
                f,
                "end {} is past the last line (file has {} lines)",
                end, total
            ),
        }
    }
}

impl RangeIssue {
    /// Whether strict mode should refuse the range. An empty range is well
    /// formed; it just removes nothing.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, RangeIssue::Empty { .. })
    }
}

pub struct Validator;

impl Validator {
    pub fn validate_file_path(path: &Path) -> Result<()> {
        let canonical = fs::canonicalize(path).map_err(|e| {
            StripError::Validation(format!(
                "Cannot canonicalize path {}: {}",
                path.display(),
                e
            ))
        })?;

        if !canonical.is_file() {
            return Err(StripError::Validation(format!(
                "Path is not a file: {}",
                canonical.display()
            )));
        }

        Ok(())
    }

    pub fn inspect_range(range: &RemovalRange, total: usize) -> Vec<RangeIssue> {
        let mut issues = Vec::new();

        if range.is_inverted() {
            issues.push(RangeIssue::Inverted {
                start: range.start,
                end: range.end,
            });
        } else if range.start == range.end {
            issues.push(RangeIssue::Empty { at: range.start });
        }

        if range.fits(total) {
            return issues;
        }

        if range.start > total {
            issues.push(RangeIssue::StartPastEnd {
                start: range.start,
                total,
            });
        }

        if range.end > total {
            issues.push(RangeIssue::EndPastEnd {
                end: range.end,
                total,
            });
        }

        issues
    }

    /// Fails on the first fatal issue [`Self::inspect_range`] reports.
    pub fn validate_range(range: &RemovalRange, total: usize) -> Result<()> {
        match Self::inspect_range(range, total)
            .into_iter()
            .find(RangeIssue::is_fatal)
        {
            Some(issue) => Err(StripError::Validation(format!(
                "Range {} rejected: {}",
                range, issue
            ))),
            None => Ok(()),
        }
    }

    pub fn validate_pass_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StripError::Validation(
                "Pass name cannot be empty".to_string(),
            ));
        }

        if name.chars().any(char::is_whitespace) {
            return Err(StripError::Validation(format!(
                "Pass name cannot contain whitespace: {:?}",
                name
            )));
        }

        Ok(())
    }

    pub fn sanitize_file_path(path: &str) -> String {
        path.replace('\\', "/")
            .replace("//", "/")
            .trim()
            .to_string()
    }
}
