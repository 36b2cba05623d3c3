//! Application configuration for menucat.
//!
//! User config lives at `~/.menucat/menucat.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{MenuCatError, Result};
use crate::types::RestaurantInfo;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "menucat.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".menucat";

// ---------------------------------------------------------------------------
// Config structs (matching menucat.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Restaurant details stamped onto every exported row.
    #[serde(default)]
    pub restaurant: RestaurantInfo,

    /// Heuristic tunables for the extraction engine.
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Where and how results are written.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[extraction]` section; also the runtime config handed to the engine.
///
/// The defaults describe the markup of the ordering pages the heuristics were
/// tuned against: dish and section names in `<h4>`, prices in `<span>`,
/// descriptions in `<p>`, styled-component class names prefixed `sc-`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// How many ancestor levels a boundary or section walk may climb.
    #[serde(default = "default_max_ancestor_depth")]
    pub max_ancestor_depth: usize,

    /// Currency marker that tags price text.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Tags treated as heading-level (dish and section names).
    #[serde(default = "default_heading_tags")]
    pub heading_tags: Vec<String>,

    /// Tags that mark a distinct content section.
    #[serde(default = "default_section_tags")]
    pub section_tags: Vec<String>,

    /// Tags that mark a content region a heading can belong to (heading walk).
    #[serde(default = "default_landmark_tags")]
    pub landmark_tags: Vec<String>,

    /// Tags that may wrap a single item record.
    #[serde(default = "default_item_container_tags")]
    pub item_container_tags: Vec<String>,

    /// Tags that may carry a `Label (N)` category chip.
    #[serde(default = "default_chip_tags")]
    pub chip_tags: Vec<String>,

    /// Tags that may carry a price.
    #[serde(default = "default_price_tags")]
    pub price_tags: Vec<String>,

    /// Paragraph-level tags that may carry a description.
    #[serde(default = "default_description_tags")]
    pub description_tags: Vec<String>,

    /// Class-name fragment marking a generic content element.
    #[serde(default = "default_content_class_marker")]
    pub content_class_marker: String,

    /// Sections whose text is shorter than this and holds a price are price chips.
    #[serde(default = "default_short_section_len")]
    pub short_section_len: usize,

    /// Longest text accepted by the generic-element name fallback.
    #[serde(default = "default_short_name_len")]
    pub short_name_len: usize,

    /// Marker after which derived descriptions are cut.
    #[serde(default = "default_read_more_marker")]
    pub read_more_marker: String,

    /// Name of the catch-all category used when no category is found.
    #[serde(default = "default_fallback_category")]
    pub fallback_category: String,

    /// Whether to record image sources.
    #[serde(default = "default_true")]
    pub capture_images: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_ancestor_depth: default_max_ancestor_depth(),
            currency_symbol: default_currency_symbol(),
            heading_tags: default_heading_tags(),
            section_tags: default_section_tags(),
            landmark_tags: default_landmark_tags(),
            item_container_tags: default_item_container_tags(),
            chip_tags: default_chip_tags(),
            price_tags: default_price_tags(),
            description_tags: default_description_tags(),
            content_class_marker: default_content_class_marker(),
            short_section_len: default_short_section_len(),
            short_name_len: default_short_name_len(),
            read_more_marker: default_read_more_marker(),
            fallback_category: default_fallback_category(),
            capture_images: true,
        }
    }
}

impl From<&AppConfig> for ExtractionConfig {
    fn from(config: &AppConfig) -> Self {
        config.extraction.clone()
    }
}

fn default_max_ancestor_depth() -> usize {
    5
}
fn default_currency_symbol() -> String {
    "₹".into()
}
fn default_heading_tags() -> Vec<String> {
    vec!["h4".into()]
}
fn default_section_tags() -> Vec<String> {
    vec!["section".into()]
}
fn default_landmark_tags() -> Vec<String> {
    vec!["section".into(), "article".into()]
}
fn default_item_container_tags() -> Vec<String> {
    vec!["div".into()]
}
fn default_chip_tags() -> Vec<String> {
    vec!["p".into()]
}
fn default_price_tags() -> Vec<String> {
    vec!["span".into()]
}
fn default_description_tags() -> Vec<String> {
    vec!["p".into()]
}
fn default_content_class_marker() -> String {
    "sc-".into()
}
fn default_short_section_len() -> usize {
    100
}
fn default_short_name_len() -> usize {
    50
}
fn default_read_more_marker() -> String {
    "read more".into()
}
fn default_fallback_category() -> String {
    "Menu Items".into()
}
fn default_true() -> bool {
    true
}

/// Export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Parse a comma-separated list such as `json,csv`.
    pub fn parse_list(list: &str) -> Result<Vec<Self>> {
        let mut formats = Vec::new();
        for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let format: OutputFormat = part.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        if formats.is_empty() {
            return Err(MenuCatError::config("no output format given"));
        }
        Ok(formats)
    }
}

impl FromStr for OutputFormat {
    type Err = MenuCatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(MenuCatError::config(format!(
                "unknown output format '{other}' (expected json or csv)"
            ))),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the export files are written to.
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File stem for `<basename>.json` / `<basename>.csv`.
    #[serde(default = "default_basename")]
    pub basename: String,

    /// Formats to write.
    #[serde(default = "default_formats")]
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            basename: default_basename(),
            formats: default_formats(),
        }
    }
}

fn default_output_dir() -> String {
    ".".into()
}
fn default_basename() -> String {
    "menu".into()
}
fn default_formats() -> Vec<OutputFormat> {
    vec![OutputFormat::Json, OutputFormat::Csv]
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.menucat/`).
pub fn config_dir() -> Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| MenuCatError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.menucat/menucat.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MenuCatError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| MenuCatError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| MenuCatError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| MenuCatError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| MenuCatError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

/// Check the values the engine cannot run sensibly without.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if let Some(source) = &config.restaurant.source_url {
        Url::parse(source).map_err(|e| {
            MenuCatError::config(format!("restaurant.source_url '{source}' is not a URL: {e}"))
        })?;
    }

    let ex = &config.extraction;
    if ex.max_ancestor_depth == 0 {
        return Err(MenuCatError::config(
            "extraction.max_ancestor_depth must be at least 1",
        ));
    }
    if ex.currency_symbol.trim().is_empty() {
        return Err(MenuCatError::config(
            "extraction.currency_symbol must not be empty",
        ));
    }
    // An empty tag list would match every element.
    let tag_lists = [
        ("heading_tags", &ex.heading_tags),
        ("section_tags", &ex.section_tags),
        ("landmark_tags", &ex.landmark_tags),
        ("item_container_tags", &ex.item_container_tags),
        ("chip_tags", &ex.chip_tags),
        ("price_tags", &ex.price_tags),
        ("description_tags", &ex.description_tags),
    ];
    for (key, tags) in tag_lists {
        if tags.iter().all(|t| t.trim().is_empty()) {
            return Err(MenuCatError::config(format!(
                "extraction.{key} must name at least one tag"
            )));
        }
    }
    if ex.fallback_category.trim().is_empty() {
        return Err(MenuCatError::config(
            "extraction.fallback_category must not be empty",
        ));
    }
    if config.output.formats.is_empty() {
        return Err(MenuCatError::config("output.formats must not be empty"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("max_ancestor_depth"));
        assert!(toml_str.contains("Menu Items"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.extraction, ExtractionConfig::default());
        assert_eq!(parsed.output.formats, vec![OutputFormat::Json, OutputFormat::Csv]);
    }

    #[test]
    fn config_with_restaurant() {
        let toml_str = r#"
[restaurant]
name = "Local"
location = "Connaught Place, New Delhi"
hours = "12:00 PM to 1:00 AM (Mon-Sun)"
contact = "+91 11 33106243"

[extraction]
max_ancestor_depth = 3
fallback_category = "All Items"
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.restaurant.name, "Local");
        assert_eq!(config.extraction.max_ancestor_depth, 3);
        assert_eq!(config.extraction.fallback_category, "All Items");
        // untouched keys keep their defaults
        assert_eq!(config.extraction.heading_tags, vec!["h4".to_string()]);
        assert_eq!(config.output.basename, "menu");
    }

    #[test]
    fn extraction_config_from_app_config() {
        let app = AppConfig::default();
        let ex = ExtractionConfig::from(&app);
        assert_eq!(ex.max_ancestor_depth, 5);
        assert_eq!(ex.currency_symbol, "₹");
        assert_eq!(ex.short_section_len, 100);
    }

    #[test]
    fn output_format_list_parsing() {
        assert_eq!(
            OutputFormat::parse_list("csv, json,csv").expect("parse"),
            vec![OutputFormat::Csv, OutputFormat::Json]
        );
        assert!(OutputFormat::parse_list("xml").is_err());
        assert!(OutputFormat::parse_list(" , ").is_err());
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(validate_config(&config).is_ok());

        config.restaurant.source_url = Some("not a url".into());
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("source_url"));

        config.restaurant.source_url =
            Some("https://www.zomato.com/ncr/local-connaught-place-new-delhi/order".into());
        config.extraction.max_ancestor_depth = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn validation_rejects_empty_tag_lists() {
        let mut config = AppConfig::default();
        config.extraction.price_tags.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("price_tags"));

        let mut config = AppConfig::default();
        config.extraction.item_container_tags = vec!["  ".into()];
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("item_container_tags"));

        let mut config = AppConfig::default();
        config.extraction.section_tags.clear();
        assert!(validate_config(&config).is_err());
    }
}
