//! Converter runs invoked by the CLI.
//!
//! Each operation reads its source, parses it, merges the result into the
//! fixture document and reports a serializable summary.

pub mod extract;
pub mod restore;
pub mod show;
pub mod suppliers;

pub use extract::{run_extract, ExtractOutput};
pub use restore::{placeholder_records, run_restore, RestoreOutput};
pub use show::{show_config, ShowOutput};
pub use suppliers::{run_suppliers, SuppliersOutput};

use std::path::Path;

use crate::document::{JsonDocument, SaveOutcome};
use crate::error::{RateCardError, Result};

/// Summary of a run, plus the merged document when previewing.
#[derive(Debug, Clone)]
pub struct Conversion<T> {
    pub summary: T,
    /// Document text that would have been written (`--preview` only).
    pub preview: Option<String>,
}

/// Read a UTF-8 source document; a missing file is reported by path.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RateCardError::SourceNotFound {
                path: path.display().to_string(),
            }
        } else {
            RateCardError::Io(e)
        }
    })
}

/// Save the document, or render it instead when previewing.
///
/// Returns whether the file on disk was left untouched because it already
/// matched, and the rendered text when previewing.
fn deliver(doc: &JsonDocument, path: &Path, preview: bool) -> Result<(bool, Option<String>)> {
    if preview {
        return Ok((false, Some(doc.to_pretty_string()?)));
    }
    let unchanged = doc.save(path)? == SaveOutcome::Unchanged;
    Ok((unchanged, None))
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde's skip_serializing_if
fn is_zero(v: &usize) -> bool {
    *v == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde's skip_serializing_if
fn is_false(v: &bool) -> bool {
    !*v
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_source_reports_missing_path() {
        let tmp = TempDir::new().unwrap();
        let err = read_source(&tmp.path().join("raw_rate_card.txt")).unwrap_err();
        match err {
            RateCardError::SourceNotFound { path } => assert!(path.ends_with("raw_rate_card.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn deliver_preview_does_not_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        let doc = JsonDocument::new();
        let (unchanged, preview) = deliver(&doc, &path, true).unwrap();
        assert!(!unchanged);
        assert_eq!(preview.as_deref(), Some("{}"));
        assert!(!path.exists());
    }
}
