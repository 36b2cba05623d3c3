//! Structured form: category name mapped to its item objects.

use std::path::Path;

use menucat_shared::{MenuCatError, MenuCatalog, Result};

/// Pretty-printed JSON for `catalog`, categories in catalog order.
///
/// Rendered straight to text: a `serde_json::Value` map would sort the keys.
pub fn render_json(catalog: &MenuCatalog) -> Result<String> {
    serde_json::to_string_pretty(catalog)
        .map_err(|e| MenuCatError::Export(format!("JSON serialization failed: {e}")))
}

pub fn write_json(path: &Path, catalog: &MenuCatalog) -> Result<()> {
    let json = render_json(catalog)?;
    crate::write_atomic(path, json.as_bytes())
}
