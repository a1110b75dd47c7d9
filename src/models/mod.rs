pub mod catalog;
pub mod provider;

pub use catalog::{CatalogItem, RateCardRecord};
pub use provider::{ProviderContact, ProviderGroup};
