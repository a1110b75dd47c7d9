use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A priced catalog entry accumulated across both rate card passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Heading active when the item was first seen.
    pub category: String,
    /// Item label as written in the source text.
    pub display_name: String,
    /// Specification lines, in source order.
    pub spec_lines: Vec<String>,
    /// Price in whole currency units (0 when absent or unparsable).
    pub price: u64,
    /// Unit label the price applies to.
    pub unit: String,
}

impl CatalogItem {
    #[must_use]
    pub fn new(category: String, display_name: String, unit: String) -> Self {
        Self {
            category,
            display_name,
            spec_lines: Vec::new(),
            price: 0,
            unit,
        }
    }

    /// Finalize into the serialized record shape.
    ///
    /// `labels` maps raw headings to display labels by exact match; the raw
    /// heading is kept as the subcategory.
    #[must_use]
    pub fn into_record(
        self,
        id: u64,
        labels: &BTreeMap<String, String>,
        spec_delimiter: &str,
    ) -> RateCardRecord {
        let category = labels
            .get(&self.category)
            .cloned()
            .unwrap_or_else(|| self.category.clone());

        RateCardRecord {
            id,
            category,
            subcategory: Some(self.category),
            item: self.display_name,
            specs: self.spec_lines.join(spec_delimiter),
            price: self.price,
            unit: self.unit,
            notes: String::new(),
        }
    }
}

/// One row of the rate card fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCardRecord {
    pub id: u64,
    /// Display category.
    pub category: String,
    /// Raw heading before label substitution. Absent on placeholder rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    pub item: String,
    /// Specification lines joined into one display string.
    pub specs: String,
    pub price: u64,
    pub unit: String,
    pub notes: String,
}
