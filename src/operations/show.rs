//! Effective configuration report.

use serde::Serialize;

use crate::config::{Config, UserSettings};
use crate::error::Result;

/// Resolved paths and the settings in effect.
#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    pub root: String,
    pub config_file: String,
    pub config_file_exists: bool,
    pub rate_card_source: String,
    pub suppliers_source: String,
    pub document: String,
    pub settings: UserSettings,
}

/// Report the effective configuration, optionally writing it to ratecard.toml first.
pub fn show_config(config: &Config, write_defaults: bool) -> Result<ShowOutput> {
    if write_defaults {
        config.save_settings()?;
    }

    Ok(ShowOutput {
        root: config.project_root.display().to_string(),
        config_file: config.config_path.display().to_string(),
        config_file_exists: config.config_path.exists(),
        rate_card_source: config.rate_card_source().display().to_string(),
        suppliers_source: config.suppliers_source().display().to_string(),
        document: config.document_path().display().to_string(),
        settings: config.settings.clone(),
    })
}
