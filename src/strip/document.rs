// file: src/strip/document.rs
// description: UTF-8 source document loading, line splitting and overwrite
// reference: https://docs.rs/tokio/latest/tokio/fs

use crate::error::{Result, StripError};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A text file held in memory as lines that keep their terminators, so
/// joining them reproduces the original bytes exactly.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    path: PathBuf,
    lines: Vec<String>,
}

impl SourceDocument {
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        Self {
            path: path.into(),
            lines: split_lines(content),
        }
    }

    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .await
            .map_err(|e| StripError::file(path, e))?;

        let content = String::from_utf8(bytes).map_err(|source| StripError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let document = Self::from_content(path, &content);
        debug!("Read {} lines from {}", document.len(), path.display());
        Ok(document)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn content(&self) -> String {
        self.lines.concat()
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.content())
    }

    pub fn with_lines(&self, lines: Vec<String>) -> Self {
        Self {
            path: self.path.clone(),
            lines,
        }
    }

    /// Truncates and rewrites the file at [`Self::path`]. Not atomic.
    pub async fn write(&self) -> Result<()> {
        fs::write(&self.path, self.content())
            .await
            .map_err(|e| StripError::file(&self.path, e))?;

        debug!("Wrote {} lines to {}", self.len(), self.path.display());
        Ok(())
    }
}

/// Splits into lines ending at `\n`, `\r\n` or a lone `\r`, keeping the
/// terminator with each line. A trailing line without a terminator is still a
/// line; an empty string has none.
pub fn split_lines(content: &str) -> Vec<String> {
    let bytes = content.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        let line_end = byte == b'\n' || (byte == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
        if line_end {
            lines.push(content[start..=i].to_string());
            start = i + 1;
        }
    }

    if start < bytes.len() {
        lines.push(content[start..].to_string());
    }

    lines
}

pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_split_keeps_terminators() {
        assert_eq!(split_lines("a\nb\r\nc"), vec!["a\n", "b\r\n", "c"]);
        assert_eq!(split_lines("a\n\n"), vec!["a\n", "\n"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn test_split_on_lone_carriage_return() {
        assert_eq!(split_lines("a\rb\rc"), vec!["a\r", "b\r", "c"]);
        assert_eq!(split_lines("a\r\nb\rc\n"), vec!["a\r\n", "b\r", "c\n"]);
        assert_eq!(split_lines("\r"), vec!["\r"]);
        assert_eq!(split_lines("a\rb\rc").concat(), "a\rb\rc");
    }

    #[test]
    fn test_content_round_trips_bytes() {
        let content = "\u{feff}class A {\r\n  int x;\r\n}\n\n// trailing";
        let document = SourceDocument::from_content("A.java", content);
        assert_eq!(document.len(), 5);
        assert_eq!(document.content(), content);
    }

    #[test]
    fn test_fingerprint_is_sha256_hex() {
        assert_eq!(
            fingerprint(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(fingerprint("a\n").len(), 64);
        assert_ne!(fingerprint("a\n"), fingerprint("a"));
    }

    #[tokio::test]
    async fn test_read_and_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Main.java");
        std::fs::write(&path, "one\ntwo\nthree\n").unwrap();

        let document = SourceDocument::read(&path).await.unwrap();
        assert_eq!(document.lines(), ["one\n", "two\n", "three\n"]);

        let trimmed = document.with_lines(vec!["one\n".to_string()]);
        trimmed.write().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\n");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = SourceDocument::read(&temp.path().join("missing.java"))
            .await
            .unwrap_err();
        assert!(matches!(err, StripError::FileOperation { .. }));
    }

    #[tokio::test]
    async fn test_read_invalid_utf8() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("latin1.java");
        std::fs::write(&path, [b'c', b'a', b'f', 0xe9, b'\n']).unwrap();

        let err = SourceDocument::read(&path).await.unwrap_err();
        assert!(matches!(err, StripError::Decode { .. }));
    }
}
