//! Supplier listing conversion into the provider groups collection.

use serde::Serialize;
use tracing::info;

use super::{deliver, is_false, read_source, Conversion};
use crate::config::Config;
use crate::document::JsonDocument;
use crate::error::Result;
use crate::ingest::{SourceParser, SupplierParser};

/// Serializable supplier conversion summary.
#[derive(Debug, Clone, Serialize)]
pub struct SuppliersOutput {
    pub groups: usize,
    pub contacts: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_tabs: Vec<String>,
    pub document: String,
    #[serde(skip_serializing_if = "is_false")]
    pub unchanged: bool,
}

/// Convert the configured supplier listing and merge it under its target key.
pub fn run_suppliers(config: &Config, preview: bool) -> Result<Conversion<SuppliersOutput>> {
    let source_path = config.suppliers_source();
    let doc_path = config.document_path();
    let source = read_source(&source_path)?;

    let parser = SupplierParser::new(config.settings.suppliers.clone());
    info!(source = %source_path.display(), format = parser.format(), "parsing");
    let listing = parser.parse(&source)?;

    let mut doc = JsonDocument::load_or_empty(&doc_path);
    doc.set(&config.settings.suppliers.target_key, &listing.groups)?;
    let (unchanged, preview) = deliver(&doc, &doc_path, preview)?;

    info!(
        "Successfully converted {} groups to {}",
        listing.groups.len(),
        doc_path.display()
    );

    Ok(Conversion {
        summary: SuppliersOutput {
            groups: listing.groups.len(),
            contacts: listing.contact_count(),
            skipped_tabs: listing.skipped_tabs,
            document: doc_path.display().to_string(),
            unchanged,
        },
        preview,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    const LISTING: &str = "## TAB: FRESCOS (CSV)\n\
        PROVEEDOR,MARCA,EMAIL\n\
        Granja Sol,Sol,ventas@example.com\n";

    #[test]
    fn suppliers_merge_next_to_rate_card() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path());
        std::fs::create_dir_all(cfg.suppliers_source().parent().unwrap()).unwrap();
        std::fs::write(cfg.suppliers_source(), LISTING).unwrap();
        std::fs::create_dir_all(cfg.document_path().parent().unwrap()).unwrap();
        std::fs::write(cfg.document_path(), r#"{"RATE_CARD_DATA": [{"id": 1}]}"#).unwrap();

        let run = run_suppliers(&cfg, false).unwrap();
        assert_eq!(run.summary.groups, 1);
        assert_eq!(run.summary.contacts, 1);
        assert!(run.summary.skipped_tabs.is_empty());

        let doc: Value =
            serde_json::from_str(&std::fs::read_to_string(cfg.document_path()).unwrap()).unwrap();
        assert_eq!(doc["RATE_CARD_DATA"][0]["id"], 1);
        assert_eq!(doc["PROVIDER_GROUPS_DATA"][0]["id"], "frescos");
        assert_eq!(doc["PROVIDER_GROUPS_DATA"][0]["contacts"][0]["id"], "1001");
    }

    #[test]
    fn missing_listing_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let cfg = Config::new(tmp.path());
        assert!(run_suppliers(&cfg, false).is_err());
        assert!(!cfg.document_path().exists());
    }
}
