pub mod csv;
pub mod rate_card;
pub mod suppliers;

pub use rate_card::{RateCard, RateCardParser, RateCardStats};
pub use suppliers::{SupplierListing, SupplierParser};

use crate::error::Result;

/// Trait for converters that turn a hand-authored text document into records.
pub trait SourceParser {
    /// Parsed result, including any statistics worth reporting.
    type Output;

    /// Source format identifier.
    fn format(&self) -> &'static str;

    /// Parse the whole document in one run.
    fn parse(&self, source: &str) -> Result<Self::Output>;
}
