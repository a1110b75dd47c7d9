//! Supplier listing conversion.
//!
//! The listing is a sequence of `## TAB: <TITLE>` sections, each holding a CSV
//! block whose header row names a `PROVEEDOR` column. Every tab becomes a
//! provider group; every CSV row becomes a contact.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::SupplierSettings;
use crate::error::Result;
use crate::ingest::csv;
use crate::ingest::SourceParser;
use crate::models::provider::{ProviderContact, ProviderGroup};

/// Default role of every imported contact.
const DEFAULT_ROLE: &str = "Marketing";
/// Value used when none of a field's candidate columns has data.
const MISSING: &str = "-";

/// Supplier listing parser.
pub struct SupplierParser {
    settings: SupplierSettings,
}

impl Default for SupplierParser {
    fn default() -> Self {
        Self::new(SupplierSettings::default())
    }
}

/// Converted groups plus the titles of tabs that had no CSV block.
#[derive(Debug, Clone, Default)]
pub struct SupplierListing {
    pub groups: Vec<ProviderGroup>,
    pub skipped_tabs: Vec<String>,
}

impl SupplierListing {
    #[must_use]
    pub fn contact_count(&self) -> usize {
        self.groups.iter().map(|g| g.contacts.len()).sum()
    }
}

impl SupplierParser {
    #[must_use]
    pub fn new(settings: SupplierSettings) -> Self {
        Self { settings }
    }

    /// Group id for a tab title: the configured id, else a snake-cased title.
    fn group_id(&self, title: &str) -> String {
        self.settings
            .group_ids
            .get(title)
            .cloned()
            .unwrap_or_else(|| title.to_lowercase().replace(' ', "_"))
    }

    /// Non-blank lines from the header row on.
    fn csv_block(&self, lines: &[&str]) -> Option<String> {
        let start = lines
            .iter()
            .position(|line| line.contains(self.settings.header_keyword.as_str()))?;
        let block: Vec<&str> = lines[start..]
            .iter()
            .copied()
            .filter(|line| !line.trim().is_empty())
            .collect();
        (!block.is_empty()).then(|| block.join("\n") + "\n")
    }
}

impl SourceParser for SupplierParser {
    type Output = SupplierListing;

    fn format(&self) -> &'static str {
        "suppliers"
    }

    fn parse(&self, source: &str) -> Result<SupplierListing> {
        let mut listing = SupplierListing::default();
        let mut next_id = self.settings.first_id;

        // Text before the first tab marker is a preamble, not a tab
        for section in source.split(self.settings.tab_marker.as_str()).skip(1) {
            let section = section.trim();
            if section.is_empty() {
                continue;
            }

            let lines: Vec<&str> = section.lines().collect();
            let title = lines[0].trim().replace("(CSV)", "").trim().to_string();
            let id = self.group_id(&title);
            info!(%title, %id, "processing supplier tab");

            let Some(block) = self.csv_block(&lines[1..]) else {
                warn!(%title, "no CSV content found");
                listing.skipped_tabs.push(title);
                continue;
            };

            let rows = csv::parse_rows(&block, ',');
            let contacts = csv::records(&rows)
                .iter()
                .map(|row| {
                    next_id += 1;
                    contact_from_row(next_id, row)
                })
                .collect();

            listing.groups.push(ProviderGroup {
                id,
                title: title_case(&title),
                contacts,
            });
        }

        Ok(listing)
    }
}

/// First non-empty value among the given columns.
fn first_filled<'a>(row: &'a HashMap<String, String>, columns: &[&str]) -> Option<&'a str> {
    columns
        .iter()
        .filter_map(|col| row.get(*col))
        .map(String::as_str)
        .find(|v| !v.is_empty())
}

fn filled(row: &HashMap<String, String>, column: &str) -> Option<String> {
    row.get(column).filter(|v| !v.is_empty()).cloned()
}

fn contact_from_row(id: u64, row: &HashMap<String, String>) -> ProviderContact {
    let pick = |columns: &[&str]| first_filled(row, columns).unwrap_or(MISSING).to_string();

    ProviderContact {
        id: id.to_string(),
        company: row.get("PROVEEDOR").cloned().unwrap_or_default(),
        brand: first_filled(row, &["MARCA", "NOMBRE", "PROVEEDOR"])
            .unwrap_or_default()
            .to_string(),
        name: pick(&["COMPRADOR", "CONTACTO MKT"]),
        role: DEFAULT_ROLE.to_string(),
        email: pick(&["EMAIL", "EMAIL MKT", "EMAIL COMPRAS"]),
        phone: pick(&["CELULAR", "CELULAR MKT", "CELULAR COMPRAS"]),
        is_favorite: false,
        buyer: row
            .get("COMPRADOR")
            .cloned()
            .unwrap_or_else(|| MISSING.to_string()),
        contact_mkt_name: filled(row, "CONTACTO MKT"),
        contact_compras_name: filled(row, "CONTACTO COMPRAS"),
    }
}

/// Capitalize the first letter of every word and lowercase the rest.
///
/// A word is a run of letters; any other character starts a new word.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }
    out
}
