// file: src/strip/range.rs
// description: Half-open removal range and the pure line removal transform
// reference: std slice semantics

use serde::{Deserialize, Serialize};
use std::fmt;

/// A positional, 0-based, half-open range of lines `[start, end)`.
///
/// Nothing here is checked against a document. Out-of-bounds and inverted
/// ranges are representable on purpose; see [`remove_range`] for what they do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalRange {
    pub start: usize,
    pub end: usize,
}

impl RemovalRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Number of lines this range names, ignoring any document length.
    pub fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when both bounds fall inside a document of `total` lines.
    pub fn fits(&self, total: usize) -> bool {
        self.start <= total && self.end <= total
    }

    pub fn apply<T: Clone>(&self, lines: &[T]) -> Vec<T> {
        remove_range(lines, self.start, self.end)
    }
}

impl fmt::Display for RemovalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Returns `lines[..start]` followed by `lines[end..]`.
///
/// Both bounds are clamped to `lines.len()`. An inverted range is not
/// corrected: the prefix runs up to `start` and the suffix restarts at `end`,
/// so lines in `[end, start)` appear twice.
pub fn remove_range<T: Clone>(lines: &[T], start: usize, end: usize) -> Vec<T> {
    let total = lines.len();
    let prefix = &lines[..start.min(total)];
    let suffix = &lines[end.min(total)..];

    let mut kept = Vec::with_capacity(prefix.len() + suffix.len());
    kept.extend_from_slice(prefix);
    kept.extend_from_slice(suffix);
    kept
}
