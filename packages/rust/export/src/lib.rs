//! Export of a finished catalog: JSON, CSV and a run manifest.
//!
//! Files are written to a temporary name first and then renamed into place,
//! so a failed run never leaves a half-written export behind.

pub mod csv;
pub mod json;
pub mod manifest;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use menucat_shared::{MenuCatError, MenuCatalog, OutputFormat, Result};

pub use csv::{HEADER, render_csv, write_csv, write_csv_file};
pub use json::{render_json, write_json};
pub use manifest::{RunManifest, TOOL_VERSION, read_manifest, sha256_hex};

/// Name of the manifest written next to the exports.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Write `catalog` as `<basename>.<ext>` for each of `formats`, then the
/// manifest listing them. Returns every path written, manifest last.
#[instrument(skip_all, fields(dir = %dir.display(), basename = %basename))]
pub fn export(
    dir: &Path,
    basename: &str,
    formats: &[OutputFormat],
    catalog: &MenuCatalog,
    manifest: &mut RunManifest,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| MenuCatError::io(dir, e))?;

    let mut written = Vec::with_capacity(formats.len() + 1);
    manifest.outputs.clear();
    for format in formats {
        let file_name = format!("{basename}.{}", format.extension());
        let path = dir.join(&file_name);
        match format {
            OutputFormat::Json => write_json(&path, catalog)?,
            OutputFormat::Csv => write_csv_file(&path, catalog)?,
        }
        debug!(path = %path.display(), "wrote export");
        manifest.outputs.push(file_name);
        written.push(path);
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    let json = serde_json::to_string_pretty(&*manifest)
        .map_err(|e| MenuCatError::Export(format!("manifest serialization failed: {e}")))?;
    write_atomic(&manifest_path, json.as_bytes())?;
    written.push(manifest_path);

    info!(files = written.len(), items = catalog.item_count(), "export complete");
    Ok(written)
}

/// Write JSON, CSV and manifest.
pub fn export_all(
    dir: &Path,
    basename: &str,
    catalog: &MenuCatalog,
    manifest: &mut RunManifest,
) -> Result<Vec<PathBuf>> {
    export(dir, basename, &[OutputFormat::Json, OutputFormat::Csv], catalog, manifest)
}

/// Write to a dot-prefixed temp file beside `path`, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| MenuCatError::Export(format!("not a file path: {}", path.display())))?;
    let temp = path.with_file_name(format!(".{file_name}.tmp"));

    std::fs::write(&temp, bytes).map_err(|e| MenuCatError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| MenuCatError::io(path, e))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
