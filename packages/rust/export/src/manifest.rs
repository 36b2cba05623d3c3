//! `manifest.json`: provenance of one extraction run.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use menucat_shared::{
    CURRENT_SCHEMA_VERSION, ExtractionReport, MenuCatError, MenuCatalog, Result,
};

/// Tool version recorded in every manifest.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub run_id: Uuid,
    pub tool_version: String,
    pub restaurant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Path of the snapshot the catalog was extracted from.
    pub snapshot: String,
    pub snapshot_sha256: String,
    /// Category strategy that produced the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    pub category_count: usize,
    pub item_count: usize,
    pub extracted_at: DateTime<Utc>,
    /// File names written next to the manifest.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl RunManifest {
    pub fn new(
        snapshot: &Path,
        snapshot_bytes: &[u8],
        catalog: &MenuCatalog,
        report: &ExtractionReport,
    ) -> Self {
        let restaurant = catalog.restaurant();
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            run_id: Uuid::now_v7(),
            tool_version: TOOL_VERSION.to_string(),
            restaurant: restaurant.name.clone(),
            source_url: restaurant.source_url.clone(),
            snapshot: snapshot.display().to_string(),
            snapshot_sha256: sha256_hex(snapshot_bytes),
            strategy: report.strategy.clone(),
            category_count: catalog.categories().len(),
            item_count: catalog.item_count(),
            extracted_at: Utc::now(),
            outputs: Vec::new(),
        }
    }
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Read a manifest back, rejecting unknown schema versions.
pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let content = std::fs::read_to_string(path).map_err(|e| MenuCatError::io(path, e))?;
    let manifest: RunManifest = serde_json::from_str(&content)
        .map_err(|e| MenuCatError::validation(format!("invalid manifest.json: {e}")))?;

    if manifest.schema_version != CURRENT_SCHEMA_VERSION {
        return Err(MenuCatError::validation(format!(
            "unsupported schema_version: {} (expected {})",
            manifest.schema_version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(manifest)
}
