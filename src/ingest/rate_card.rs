//! Two-pass rate card extraction.
//!
//! The document has a specs region and a pricing region separated by a
//! section marker. The specs pass declares items and collects their
//! specification bullets; the pricing pass attaches unit and price to the
//! items it can find (exact key first, then a substring match in insertion
//! order) and creates the ones it cannot.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::config::RateCardSettings;
use crate::error::{RateCardError, Result};
use crate::ingest::SourceParser;
use crate::models::catalog::{CatalogItem, RateCardRecord};

/// Rate card parser configured with the document's markers.
pub struct RateCardParser {
    settings: RateCardSettings,
}

impl Default for RateCardParser {
    fn default() -> Self {
        Self::new(RateCardSettings::default())
    }
}

/// Finalized records plus what happened while building them.
#[derive(Debug, Clone)]
pub struct RateCard {
    pub records: Vec<RateCardRecord>,
    pub stats: RateCardStats,
}

/// Counters collected over both passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RateCardStats {
    pub items: usize,
    pub spec_lines: usize,
    /// Items that ended with a non-zero price.
    pub priced: usize,
    /// Items first seen in the pricing region.
    pub created_in_pricing: usize,
    /// Pricing lines joined to an item through a substring match.
    pub fuzzy_matches: usize,
    /// Specification bullets seen before any item.
    pub dropped_spec_lines: usize,
    /// Price fields that did not hold a non-negative integer.
    pub malformed_prices: usize,
}

/// Result of looking a pricing-line name up in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Exact(usize),
    Fuzzy(usize),
    Missing,
}

/// Insertion-ordered item dictionary keyed by normalized name.
#[derive(Debug, Default)]
struct Catalog {
    entries: Vec<(String, CatalogItem)>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Insert or replace; a replaced key keeps its original position.
    fn insert(&mut self, key: String, item: CatalogItem) -> usize {
        if let Some(&idx) = self.index.get(&key) {
            self.entries[idx].1 = item;
            idx
        } else {
            let idx = self.entries.len();
            self.index.insert(key.clone(), idx);
            self.entries.push((key, item));
            idx
        }
    }

    fn lookup(&self, key: &str) -> Lookup {
        if let Some(&idx) = self.index.get(key) {
            return Lookup::Exact(idx);
        }
        self.entries
            .iter()
            .position(|(existing, _)| key.contains(existing.as_str()) || existing.contains(key))
            .map_or(Lookup::Missing, Lookup::Fuzzy)
    }

    fn key(&self, idx: usize) -> &str {
        &self.entries[idx].0
    }

    fn item_mut(&mut self, idx: usize) -> &mut CatalogItem {
        &mut self.entries[idx].1
    }

    fn into_items(self) -> impl Iterator<Item = CatalogItem> {
        self.entries.into_iter().map(|(_, item)| item)
    }
}

impl RateCardParser {
    #[must_use]
    pub fn new(settings: RateCardSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &RateCardSettings {
        &self.settings
    }

    /// Split the document into its specs and pricing regions.
    ///
    /// The pricing region runs from the first marker to the next one, if any.
    pub fn split_regions<'a>(&self, content: &'a str) -> Result<(&'a str, &'a str)> {
        let mut regions = content.split(self.settings.section_marker.as_str());
        let specs = regions.next().unwrap_or_default();
        let pricing = regions
            .next()
            .ok_or_else(|| RateCardError::SectionMarkerNotFound {
                marker: self.settings.section_marker.clone(),
            })?;
        Ok((specs, pricing))
    }

    /// Category heading text, if the line is a heading.
    fn heading(&self, line: &str) -> Option<String> {
        let marker = self.settings.heading_marker.as_str();
        line.contains(marker)
            .then(|| line.replace(marker, "").trim().to_string())
    }

    /// Name between the item marker and the closing emphasis.
    fn item_name<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rest = line.strip_prefix(self.settings.item_marker.as_str())?;
        let name = rest
            .split(self.settings.emphasis.as_str())
            .next()
            .unwrap_or_default();
        Some(name.trim())
    }

    /// Text of the first emphasized span, or everything after an unclosed opener.
    fn emphasized<'a>(&self, segment: &'a str) -> Option<&'a str> {
        segment
            .split(self.settings.emphasis.as_str())
            .nth(1)
            .map(str::trim)
    }

    fn specs_pass(&self, region: &str, catalog: &mut Catalog, stats: &mut RateCardStats) {
        let s = &self.settings;
        let mut category = s.specs_category.clone();
        let mut current: Option<usize> = None;

        for line in region.lines().map(str::trim) {
            if let Some(heading) = self.heading(line) {
                category = heading;
                continue;
            }

            let declares_item = line
                .strip_prefix(s.item_marker.as_str())
                .is_some_and(|rest| rest.contains(s.emphasis.as_str()));

            if declares_item {
                let Some(name) = self.item_name(line) else {
                    continue;
                };
                let key = normalize_key(name, &s.alias_separator);
                let item = CatalogItem::new(category.clone(), name.to_string(), s.default_unit.clone());
                current = Some(catalog.insert(key, item));
            } else if let Some(spec) = line.strip_prefix(s.bullet.as_str()) {
                if !line.contains(':') {
                    continue;
                }
                match current {
                    Some(idx) => {
                        catalog.item_mut(idx).spec_lines.push(spec.to_string());
                        stats.spec_lines += 1;
                    }
                    None => stats.dropped_spec_lines += 1,
                }
            }
        }
    }

    fn pricing_pass(&self, region: &str, catalog: &mut Catalog, stats: &mut RateCardStats) {
        let s = &self.settings;
        let mut category = s.pricing_category.clone();

        for line in region.lines().map(str::trim) {
            if let Some(heading) = self.heading(line) {
                category = heading;
                continue;
            }

            if !line.starts_with(s.item_marker.as_str()) {
                continue;
            }

            let mut fields = line.split(s.field_separator.as_str());
            let name = fields
                .next()
                .and_then(|first| self.item_name(first))
                .unwrap_or_default();
            let key = normalize_key(name, &s.alias_separator);

            let idx = match catalog.lookup(&key) {
                Lookup::Exact(idx) => idx,
                Lookup::Fuzzy(idx) => {
                    debug!(name = %key, matched = %catalog.key(idx), "pricing line joined by substring");
                    stats.fuzzy_matches += 1;
                    idx
                }
                Lookup::Missing => {
                    stats.created_in_pricing += 1;
                    let item =
                        CatalogItem::new(category.clone(), name.to_string(), s.default_unit.clone());
                    catalog.insert(key, item)
                }
            };

            let item = catalog.item_mut(idx);
            for field in fields {
                if field.contains(s.unit_label.as_str()) {
                    if let Some(unit) = self.emphasized(field).filter(|u| !u.is_empty()) {
                        item.unit = unit.to_string();
                    }
                }
                if field.contains(s.price_label.as_str()) {
                    match self.emphasized(field).map(str::parse::<u64>) {
                        Some(Ok(price)) => item.price = price,
                        _ => {
                            debug!(item = %item.display_name, field = field.trim(), "ignoring malformed price");
                            stats.malformed_prices += 1;
                        }
                    }
                }
            }

            if item.category == s.specs_category && category != s.pricing_category {
                item.category = category.clone();
            }
        }
    }
}

impl SourceParser for RateCardParser {
    type Output = RateCard;

    fn format(&self) -> &'static str {
        "rate-card"
    }

    fn parse(&self, source: &str) -> Result<RateCard> {
        let (specs, pricing) = self.split_regions(source)?;

        let mut catalog = Catalog::default();
        let mut stats = RateCardStats::default();
        self.specs_pass(specs, &mut catalog, &mut stats);
        self.pricing_pass(pricing, &mut catalog, &mut stats);

        let records: Vec<RateCardRecord> = catalog
            .into_items()
            .zip(1u64..)
            .map(|(item, id)| {
                item.into_record(id, &self.settings.category_labels, &self.settings.spec_delimiter)
            })
            .collect();

        stats.items = records.len();
        stats.priced = records.iter().filter(|r| r.price > 0).count();

        Ok(RateCard { records, stats })
    }
}

/// Identity key of an item: the name before any alias, lowercased.
#[must_use]
pub fn normalize_key(name: &str, alias_separator: &str) -> String {
    name.split(alias_separator)
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "## 2) TARIFARIO RETAIL MEDIA";

    fn parse(source: &str) -> RateCard {
        RateCardParser::default().parse(source).unwrap()
    }

    fn find<'a>(card: &'a RateCard, item: &str) -> &'a RateCardRecord {
        card.records
            .iter()
            .find(|r| r.item == item)
            .unwrap_or_else(|| panic!("no record for {item}"))
    }

    #[test]
    fn alias_suffix_is_stripped_from_key() {
        assert_eq!(normalize_key("Banner Home // BH", " // "), "banner home");
        assert_eq!(normalize_key("Góndola", " // "), "góndola");
    }

    #[test]
    fn specs_pass_collects_items_and_specs() {
        let source = format!(
            "# Formatos\n\
             ### Exhibición\n\
             * **Isla de Exhibición // ISLA**\n\
             * Medida: 2x2m\n\
             * Tráfico: alto\n\
             * **Cabecera**\n\
             * Medida: 1x1m\n\
             {MARKER}\n"
        );
        let card = parse(&source);

        assert_eq!(card.records.len(), 2);
        let isla = find(&card, "Isla de Exhibición // ISLA");
        assert_eq!(isla.id, 1);
        assert_eq!(isla.specs, "Medida: 2x2m | Tráfico: alto");
        assert_eq!(isla.subcategory.as_deref(), Some("Exhibición"));
        assert_eq!(isla.price, 0);
        assert_eq!(isla.unit, "Por pieza");
        assert_eq!(find(&card, "Cabecera").id, 2);
        assert_eq!(card.stats.spec_lines, 3);
    }

    #[test]
    fn spec_lines_before_any_item_are_dropped() {
        let source = format!("* Nota: general\n* **Isla**\n* Medida: 2m\n{MARKER}\n");
        let card = parse(&source);
        assert_eq!(card.records[0].specs, "Medida: 2m");
        assert_eq!(card.stats.dropped_spec_lines, 1);
    }

    #[test]
    fn only_leading_bullet_is_stripped_from_spec_text() {
        let source = format!("* **Isla**\n* Medida: 2 * 3m\n{MARKER}\n");
        let card = parse(&source);
        assert_eq!(card.records[0].specs, "Medida: 2 * 3m");
    }

    #[test]
    fn bullets_without_colon_are_not_specs() {
        let source = format!("* **Isla**\n* sin detalle\n{MARKER}\n");
        let card = parse(&source);
        assert_eq!(card.records[0].specs, "");
    }

    #[test]
    fn pricing_pass_sets_unit_and_price() {
        let source = format!(
            "* **Isla**\n\
             {MARKER}\n\
             * **Isla** — Unidad: **Mes** — Inversión: **150000**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records.len(), 1);
        assert_eq!(card.records[0].unit, "Mes");
        assert_eq!(card.records[0].price, 150_000);
        assert_eq!(card.stats.priced, 1);
    }

    #[test]
    fn fuzzy_join_attaches_to_existing_item() {
        let source = format!(
            "* **Banner**\n\
             * Medida: 1920x400px\n\
             {MARKER}\n\
             * **Banner Home Principal** — Unidad: **Semana** — Inversión: **80000**\n"
        );
        let card = parse(&source);

        assert_eq!(card.records.len(), 1, "no duplicate record is created");
        let banner = &card.records[0];
        assert_eq!(banner.item, "Banner");
        assert_eq!(banner.price, 80_000);
        assert_eq!(banner.unit, "Semana");
        assert_eq!(card.stats.fuzzy_matches, 1);
    }

    #[test]
    fn fuzzy_join_prefers_first_inserted_key() {
        let source = format!(
            "* **Banner**\n\
             * **Banner Home**\n\
             {MARKER}\n\
             * **Banner Home Principal** — Inversión: **10**\n"
        );
        let card = parse(&source);
        assert_eq!(find(&card, "Banner").price, 10);
        assert_eq!(find(&card, "Banner Home").price, 0);
    }

    #[test]
    fn exact_match_wins_over_substring() {
        let source = format!(
            "* **Banner**\n\
             * **Banner Home**\n\
             {MARKER}\n\
             * **Banner Home** — Inversión: **20**\n"
        );
        let card = parse(&source);
        assert_eq!(find(&card, "Banner").price, 0);
        assert_eq!(find(&card, "Banner Home").price, 20);
        assert_eq!(card.stats.fuzzy_matches, 0);
    }

    #[test]
    fn unmatched_pricing_line_creates_item_in_pricing_category() {
        let source = format!(
            "* **Isla**\n\
             {MARKER}\n\
             ### Radio\n\
             * **Spot 30s** — Unidad: **Salida** — Inversión: **500**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records.len(), 2);
        let spot = find(&card, "Spot 30s");
        assert_eq!(spot.id, 2);
        assert_eq!(spot.category, "Radio");
        assert_eq!(spot.specs, "");
        assert_eq!(card.stats.created_in_pricing, 1);
    }

    #[test]
    fn pricing_heading_overrides_default_category() {
        let source = format!(
            "* **Landing Marca**\n\
             {MARKER}\n\
             ### Digital (Landing)\n\
             * **Landing Marca** — Inversión: **300**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records[0].category, "Digital (Landing)");
        assert_eq!(card.records[0].subcategory.as_deref(), Some("Digital (Landing)"));
    }

    #[test]
    fn specific_specs_heading_is_not_overridden() {
        let source = format!(
            "### Exhibición\n\
             * **Isla**\n\
             {MARKER}\n\
             ### Digital (Landing)\n\
             * **Isla** — Inversión: **300**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records[0].category, "Exhibición");
    }

    #[test]
    fn default_pricing_category_is_mapped_to_label() {
        let source = format!("{MARKER}\n* **Cartel** — Inversión: **40**\n");
        let card = parse(&source);
        assert_eq!(card.records[0].category, "Punto de Venta (In Store)");
        assert_eq!(card.records[0].subcategory.as_deref(), Some("PDV"));
    }

    #[test]
    fn non_numeric_price_leaves_default() {
        let source = format!(
            "* **Isla**\n\
             {MARKER}\n\
             * **Isla** — Unidad: **Mes** — Inversión: **a consultar**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records[0].price, 0);
        assert_eq!(card.records[0].unit, "Mes");
        assert_eq!(card.stats.malformed_prices, 1);
    }

    #[test]
    fn negative_price_is_malformed() {
        let source = format!("{MARKER}\n* **Isla** — Inversión: **-5**\n");
        let card = parse(&source);
        assert_eq!(card.records[0].price, 0);
        assert_eq!(card.stats.malformed_prices, 1);
    }

    #[test]
    fn empty_unit_keeps_default() {
        let source = format!("{MARKER}\n* **Isla** — Unidad: **** — Inversión: **5**\n");
        let card = parse(&source);
        assert_eq!(card.records[0].unit, "Por pieza");
        assert!(card.records.iter().all(|r| !r.unit.is_empty()));
    }

    #[test]
    fn redeclared_item_replaces_in_place() {
        let source = format!(
            "* **Isla**\n\
             * Medida: 1m\n\
             * **Cabecera**\n\
             * **ISLA**\n\
             * Medida: 2m\n\
             {MARKER}\n"
        );
        let card = parse(&source);
        assert_eq!(card.records.len(), 2);
        assert_eq!(card.records[0].item, "ISLA");
        assert_eq!(card.records[0].specs, "Medida: 2m");
        assert_eq!(card.records[1].item, "Cabecera");
    }

    #[test]
    fn missing_marker_is_fatal() {
        let err = RateCardParser::default()
            .parse("* **Isla**\n* Medida: 1m\n")
            .unwrap_err();
        assert!(matches!(err, RateCardError::SectionMarkerNotFound { .. }));
    }

    #[test]
    fn pricing_region_ends_at_second_marker() {
        let source = format!(
            "{MARKER}\n* **Isla** — Inversión: **1**\n{MARKER}\n* **Cabecera** — Inversión: **2**\n"
        );
        let card = parse(&source);
        assert_eq!(card.records.len(), 1);
        assert_eq!(card.records[0].item, "Isla");
    }

    #[test]
    fn crlf_input_is_handled() {
        let source = format!("* **Isla**\r\n* Medida: 1m\r\n{MARKER}\r\n* **Isla** — Inversión: **7**\r\n");
        let card = parse(&source);
        assert_eq!(card.records[0].specs, "Medida: 1m");
        assert_eq!(card.records[0].price, 7);
    }

    #[test]
    fn custom_markers_are_honored() {
        let settings = RateCardSettings {
            section_marker: "== PRECIOS ==".into(),
            field_separator: "|".into(),
            ..RateCardSettings::default()
        };
        let parser = RateCardParser::new(settings);
        let card = parser
            .parse("* **Isla**\n== PRECIOS ==\n* **Isla** | Inversión: **9**\n")
            .unwrap();
        assert_eq!(card.records[0].price, 9);
        assert_eq!(parser.format(), "rate-card");
    }
}
