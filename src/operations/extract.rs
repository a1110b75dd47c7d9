//! Rate card extraction: parse the rate card text and merge it into the document.

use serde::Serialize;
use tracing::info;

use super::{deliver, is_false, is_zero, read_source, Conversion};
use crate::config::Config;
use crate::document::JsonDocument;
use crate::error::Result;
use crate::ingest::{RateCardParser, RateCardStats, SourceParser};

/// Serializable extraction summary.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractOutput {
    pub items: usize,
    pub priced: usize,
    pub spec_lines: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub created_in_pricing: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub fuzzy_matches: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub dropped_spec_lines: usize,
    #[serde(skip_serializing_if = "is_zero")]
    pub malformed_prices: usize,
    /// Document the records were merged into.
    pub document: String,
    #[serde(skip_serializing_if = "is_false")]
    pub unchanged: bool,
}

impl ExtractOutput {
    fn new(stats: RateCardStats, document: String, unchanged: bool) -> Self {
        Self {
            items: stats.items,
            priced: stats.priced,
            spec_lines: stats.spec_lines,
            created_in_pricing: stats.created_in_pricing,
            fuzzy_matches: stats.fuzzy_matches,
            dropped_spec_lines: stats.dropped_spec_lines,
            malformed_prices: stats.malformed_prices,
            document,
            unchanged,
        }
    }
}

/// Parse the configured rate card and merge it under the target key.
///
/// The source is fully parsed before the document is touched, so a missing
/// section marker leaves the document as it was.
pub fn run_extract(config: &Config, preview: bool) -> Result<Conversion<ExtractOutput>> {
    let source_path = config.rate_card_source();
    let doc_path = config.document_path();
    let source = read_source(&source_path)?;

    let parser = RateCardParser::new(config.settings.rate_card.clone());
    info!(source = %source_path.display(), format = parser.format(), "parsing");
    let card = parser.parse(&source)?;

    let mut doc = JsonDocument::load_or_empty(&doc_path);
    doc.set(&parser.settings().target_key, &card.records)?;
    let (unchanged, preview) = deliver(&doc, &doc_path, preview)?;

    info!("Parsed {} rate card items.", card.stats.items);

    Ok(Conversion {
        summary: ExtractOutput::new(card.stats, doc_path.display().to_string(), unchanged),
        preview,
    })
}
