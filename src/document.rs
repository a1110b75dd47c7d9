//! The shared JSON fixture document.
//!
//! Each converter owns one top-level key and replaces only that key; every
//! other key is carried through in its original position.

use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{RateCardError, Result};

/// Top-level JSON object with insertion-ordered keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDocument {
    root: Map<String, Value>,
}

/// What `save` did on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Written,
    /// The file already held exactly these bytes.
    Unchanged,
}

impl JsonDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from JSON text. The root must be an object.
    pub fn from_json(text: &str, origin: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(RateCardError::NotAnObject {
                path: origin.to_string(),
            }),
        }
    }

    /// Load a document; a missing file yields an empty document.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text, &path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "document missing, starting empty");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Load a document, falling back to an empty one on any failure.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), "unreadable document, merging into an empty one: {e}");
            Self::new()
        })
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    /// Replace one top-level key, keeping its position if it already exists.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.root.insert(key.to_string(), value);
        Ok(())
    }

    /// Two-space indented JSON with non-ASCII text written as-is.
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Write the document, skipping the write when the bytes are identical.
    pub fn save(&self, path: &Path) -> Result<SaveOutcome> {
        let text = self.to_pretty_string()?;
        if std::fs::read(path).ok().as_deref() == Some(text.as_bytes()) {
            debug!(path = %path.display(), "document unchanged");
            return Ok(SaveOutcome::Unchanged);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, text)?;
        Ok(SaveOutcome::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn missing_file_loads_empty() {
        let tmp = TempDir::new().unwrap();
        let doc = JsonDocument::load(&tmp.path().join("absent.json")).unwrap();
        assert_eq!(doc, JsonDocument::new());
    }

    #[test]
    fn invalid_json_is_an_error_but_lenient_load_is_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(JsonDocument::load(&path), Err(RateCardError::Json(_))));
        assert_eq!(JsonDocument::load_or_empty(&path), JsonDocument::new());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = JsonDocument::from_json("[1, 2]", "list.json").unwrap_err();
        assert!(matches!(err, RateCardError::NotAnObject { .. }));
    }

    #[test]
    fn set_preserves_sibling_order() {
        let mut doc =
            JsonDocument::from_json(r#"{"A": 1, "RATE_CARD_DATA": [], "Z": {"k": true}}"#, "t")
                .unwrap();
        doc.set("RATE_CARD_DATA", &json!([{"id": 1}])).unwrap();
        doc.set("NEW", &json!("x")).unwrap();

        let keys: Vec<&str> = doc.keys().collect();
        assert_eq!(keys, vec!["A", "RATE_CARD_DATA", "Z", "NEW"]);
        assert_eq!(doc.get("Z"), Some(&json!({"k": true})));
    }

    #[test]
    fn sibling_numbers_keep_their_literal_text() {
        let mut doc = JsonDocument::from_json(
            r#"{"BIG": 18446744073709551616, "PRICE": 1e2, "NEG": -0, "HUGE": 1e400}"#,
            "t",
        )
        .unwrap();
        doc.set("RATE_CARD_DATA", &json!([])).unwrap();

        let text = doc.to_pretty_string().unwrap();
        assert!(text.contains(r#""BIG": 18446744073709551616,"#));
        assert!(text.contains(r#""PRICE": 1e2,"#));
        assert!(text.contains(r#""NEG": -0,"#));
        assert!(text.contains(r#""HUGE": 1e400,"#));
    }

    #[test]
    fn out_of_range_number_does_not_drop_siblings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("extractedData.json");
        std::fs::write(&path, r#"{"PROVIDER_GROUPS_DATA": [1], "X": 1e400}"#).unwrap();

        let doc = JsonDocument::load_or_empty(&path);
        let keys: Vec<&str> = doc.keys().collect();
        assert_eq!(keys, vec!["PROVIDER_GROUPS_DATA", "X"]);
    }

    #[test]
    fn pretty_output_keeps_non_ascii() {
        let mut doc = JsonDocument::new();
        doc.set("unit", &"Exhibición").unwrap();
        let text = doc.to_pretty_string().unwrap();
        assert_eq!(text, "{\n  \"unit\": \"Exhibición\"\n}");
    }

    #[test]
    fn save_creates_parents_and_skips_identical_rewrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("src/data/extractedData.json");
        let mut doc = JsonDocument::new();
        doc.set("RATE_CARD_DATA", &json!([])).unwrap();

        assert_eq!(doc.save(&path).unwrap(), SaveOutcome::Written);
        assert_eq!(doc.save(&path).unwrap(), SaveOutcome::Unchanged);

        doc.set("RATE_CARD_DATA", &json!([1])).unwrap();
        assert_eq!(doc.save(&path).unwrap(), SaveOutcome::Written);
        assert_eq!(JsonDocument::load(&path).unwrap(), doc);
    }
}
