//! Placeholder restore for a document that lost its rate card.

use serde::Serialize;
use tracing::info;

use super::{deliver, is_false, Conversion};
use crate::config::Config;
use crate::document::JsonDocument;
use crate::error::Result;
use crate::models::catalog::RateCardRecord;

/// Serializable restore summary.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutput {
    /// Whether placeholders were inserted.
    pub restored: bool,
    pub key: String,
    pub document: String,
    #[serde(skip_serializing_if = "is_false")]
    pub unchanged: bool,
}

/// Minimal rows that keep the front-end usable until a real extraction runs.
#[must_use]
pub fn placeholder_records() -> Vec<RateCardRecord> {
    vec![
        RateCardRecord {
            id: 1,
            category: "Espacios Preferenciales".into(),
            subcategory: None,
            item: "Isla de Exhibición".into(),
            specs: "2x2m, alto tráfico".into(),
            price: 150_000,
            unit: "Mes".into(),
            notes: String::new(),
        },
        RateCardRecord {
            id: 2,
            category: "Digital".into(),
            subcategory: None,
            item: "Banner Home Principal".into(),
            specs: "1920x400px".into(),
            price: 80_000,
            unit: "Semana".into(),
            notes: String::new(),
        },
    ]
}

/// Insert placeholder records only when the rate card key is entirely absent.
///
/// An existing key is left alone even if it holds an empty list. A document
/// that exists but does not parse is an error, not an empty document.
pub fn run_restore(config: &Config, preview: bool) -> Result<Conversion<RestoreOutput>> {
    let doc_path = config.document_path();
    let key = config.settings.rate_card.target_key.clone();
    let mut doc = JsonDocument::load(&doc_path)?;

    if doc.contains(&key) {
        info!(%key, "already present, nothing to restore");
        let preview = if preview {
            Some(doc.to_pretty_string()?)
        } else {
            None
        };
        return Ok(Conversion {
            summary: RestoreOutput {
                restored: false,
                key,
                document: doc_path.display().to_string(),
                unchanged: true,
            },
            preview,
        });
    }

    info!(%key, "restoring placeholder records");
    doc.set(&key, &placeholder_records())?;
    let (unchanged, preview) = deliver(&doc, &doc_path, preview)?;

    Ok(Conversion {
        summary: RestoreOutput {
            restored: true,
            key,
            document: doc_path.display().to_string(),
            unchanged,
        },
        preview,
    })
}
