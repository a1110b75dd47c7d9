use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RateCardError, Result};

/// Settings filename, looked up in the project root.
const CONFIG_FILE: &str = "ratecard.toml";

/// Project-level configuration resolved from a root directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that relative paths in the settings are resolved against.
    pub project_root: PathBuf,
    /// Path to the settings file.
    pub config_path: PathBuf,
    /// User settings loaded from ratecard.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from ratecard.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Input and output locations.
    pub paths: PathSettings,
    /// Rate card extraction markers and defaults.
    pub rate_card: RateCardSettings,
    /// Supplier listing conversion.
    pub suppliers: SupplierSettings,
    /// Summary output configuration.
    pub output: OutputSettings,
}

/// Input and output file locations, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// Hand-authored rate card text.
    pub rate_card_source: String,
    /// Hand-authored supplier listing with embedded CSV tabs.
    pub suppliers_source: String,
    /// JSON fixture document shared by all converters.
    pub document: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            rate_card_source: "scripts/raw_rate_card.txt".into(),
            suppliers_source: "scripts/raw_suppliers.txt".into(),
            document: "src/data/extractedData.json".into(),
        }
    }
}

/// Line markers and defaults of the rate card layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateCardSettings {
    /// Heading separating the specs region from the pricing region.
    pub section_marker: String,
    /// A line containing this is a category heading.
    pub heading_marker: String,
    /// Prefix of an item declaration line.
    pub item_marker: String,
    /// Emphasis delimiter wrapping names and field values.
    pub emphasis: String,
    /// Prefix of a specification bullet.
    pub bullet: String,
    /// Separator between a display name and its alias.
    pub alias_separator: String,
    /// Separator between the fields of a pricing line.
    pub field_separator: String,
    /// Label of the unit field.
    pub unit_label: String,
    /// Label of the price field.
    pub price_label: String,
    /// Category assumed in the specs region before any heading.
    pub specs_category: String,
    /// Category assumed in the pricing region before any heading.
    pub pricing_category: String,
    /// Unit of items whose pricing line carries none.
    pub default_unit: String,
    /// Delimiter used to join specification lines.
    pub spec_delimiter: String,
    /// Top-level document key owned by the extractor.
    pub target_key: String,
    /// Display labels substituted for raw category headings.
    pub category_labels: BTreeMap<String, String>,
}

impl Default for RateCardSettings {
    fn default() -> Self {
        let category_labels = [
            ("PDV", "Punto de Venta (In Store)"),
            ("Web / Owned media", "Digital (Owned Media)"),
            ("Web / Landing", "Digital (Landing)"),
        ]
        .into_iter()
        .map(|(raw, label)| (raw.to_string(), label.to_string()))
        .collect();

        Self {
            section_marker: "## 2) TARIFARIO RETAIL MEDIA".into(),
            heading_marker: "###".into(),
            item_marker: "* **".into(),
            emphasis: "**".into(),
            bullet: "* ".into(),
            alias_separator: " // ".into(),
            field_separator: "—".into(),
            unit_label: "Unidad:".into(),
            price_label: "Inversión:".into(),
            specs_category: "IN STORE".into(),
            pricing_category: "PDV".into(),
            default_unit: "Por pieza".into(),
            spec_delimiter: " | ".into(),
            target_key: "RATE_CARD_DATA".into(),
            category_labels,
        }
    }
}

/// Supplier listing layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplierSettings {
    /// Prefix that opens each supplier tab.
    pub tab_marker: String,
    /// Column name that identifies the CSV header row.
    pub header_keyword: String,
    /// Top-level document key owned by the supplier converter.
    pub target_key: String,
    /// Contact ids are assigned sequentially after this value.
    pub first_id: u64,
    /// Group ids for known tab titles.
    pub group_ids: BTreeMap<String, String>,
}

impl Default for SupplierSettings {
    fn default() -> Self {
        let group_ids = [
            ("PERFUMERIA & LIMPIEZA", "perfumeria"),
            ("PERFUMERIA", "perfumeria"),
            ("PERECEDEROS", "perecederos"),
            ("BEBIDAS", "bebidas"),
            ("ALMACEN", "almacen"),
            ("FRESCOS", "frescos"),
            ("NONFOOD", "nonfood"),
        ]
        .into_iter()
        .map(|(title, id)| (title.to_string(), id.to_string()))
        .collect();

        Self {
            tab_marker: "## TAB: ".into(),
            header_keyword: "PROVEEDOR".into(),
            target_key: "PROVIDER_GROUPS_DATA".into(),
            first_id: 1000,
            group_ids,
        }
    }
}

/// Summary output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format: "minified" (default) or "pretty".
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "minified".into(),
        }
    }
}

impl OutputSettings {
    #[must_use]
    pub fn is_pretty(&self) -> bool {
        self.format == "pretty"
    }
}

impl Config {
    /// Create config for a given project root.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        let config_path = project_root.join(CONFIG_FILE);
        let settings = Self::load_settings(&config_path).unwrap_or_default();

        Self {
            project_root,
            config_path,
            settings,
        }
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| RateCardError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Load settings from ratecard.toml if it exists and parses.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), "ignoring invalid settings: {e}");
                None
            }
        }
    }

    /// Save current settings to ratecard.toml.
    pub fn save_settings(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| RateCardError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Resolve a settings path against the project root. Absolute paths pass through.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.project_root.join(path)
    }

    #[must_use]
    pub fn rate_card_source(&self) -> PathBuf {
        self.resolve(&self.settings.paths.rate_card_source)
    }

    #[must_use]
    pub fn suppliers_source(&self) -> PathBuf {
        self.resolve(&self.settings.paths.suppliers_source)
    }

    #[must_use]
    pub fn document_path(&self) -> PathBuf {
        self.resolve(&self.settings.paths.document)
    }
}
