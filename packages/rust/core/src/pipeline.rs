//! End-to-end `extract` pipeline: snapshot file → engine → JSON/CSV/manifest.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use menucat_export::RunManifest;
use menucat_extractor::{HtmlSnapshot, MenuExtractor, StaticChipActivator, StrategySurvey};
use menucat_shared::{
    AppConfig, ExtractionConfig, ExtractionReport, MenuCatError, MenuCatalog, OutputFormat,
    RestaurantInfo, Result,
};

/// Configuration for one `run_extract` call.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Saved, fully rendered ordering page.
    pub snapshot: PathBuf,
    pub restaurant: RestaurantInfo,
    pub extraction: ExtractionConfig,
    /// Directory the exports are written to.
    pub output_dir: PathBuf,
    /// File stem of the exports.
    pub basename: String,
    pub formats: Vec<OutputFormat>,
}

impl ExtractConfig {
    /// Everything but the snapshot taken from the loaded config file.
    pub fn from_app(snapshot: impl Into<PathBuf>, app: &AppConfig) -> Self {
        Self {
            snapshot: snapshot.into(),
            restaurant: app.restaurant.clone(),
            extraction: ExtractionConfig::from(app),
            output_dir: PathBuf::from(&app.output.dir),
            basename: app.output.basename.clone(),
            formats: app.output.formats.clone(),
        }
    }
}

/// Result of the `extract` pipeline.
#[derive(Debug)]
pub struct ExtractResult {
    pub catalog: MenuCatalog,
    pub report: ExtractionReport,
    pub manifest: RunManifest,
    /// Every file written, manifest last.
    pub files: Vec<PathBuf>,
    pub elapsed: Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once per category with the items found for it, before merging.
    fn category_done(&self, name: &str, items: usize);
    /// Called when the pipeline completes.
    fn done(&self, result: &ExtractResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn category_done(&self, _name: &str, _items: usize) {}
    fn done(&self, _result: &ExtractResult) {}
}

/// Run the full `extract` pipeline.
///
/// 1. Read the snapshot
/// 2. Extract the catalog
/// 3. Write the requested formats and the manifest
///
/// Only I/O and configuration problems fail the run; a page the engine cannot
/// make sense of produces an empty catalog.
#[instrument(skip_all, fields(snapshot = %config.snapshot.display(), restaurant = %config.restaurant.name))]
pub fn run_extract(config: &ExtractConfig, progress: &dyn ProgressReporter) -> Result<ExtractResult> {
    let start = Instant::now();
    if config.basename.trim().is_empty() {
        return Err(MenuCatError::validation("output basename must not be empty"));
    }

    // --- Phase 1: Snapshot ---
    progress.phase("Reading snapshot");
    let bytes = std::fs::read(&config.snapshot).map_err(|e| MenuCatError::io(&config.snapshot, e))?;
    let html = std::str::from_utf8(&bytes).map_err(|e| {
        MenuCatError::parse(format!(
            "{} is not valid UTF-8: {e}",
            config.snapshot.display()
        ))
    })?;

    // --- Phase 2: Extraction ---
    progress.phase("Extracting menu");
    let snapshot = HtmlSnapshot::parse(html);
    let extractor = MenuExtractor::new(config.extraction.clone());
    let extraction = extractor.extract_observed(
        &snapshot.root(),
        config.restaurant.clone(),
        &StaticChipActivator,
        &mut |name, items| progress.category_done(name, items),
    );
    if extraction.catalog.is_empty() {
        warn!("no menu items found; exporting an empty catalog");
    }

    // --- Phase 3: Export ---
    progress.phase("Writing exports");
    let mut manifest = RunManifest::new(&config.snapshot, &bytes, &extraction.catalog, &extraction.report);
    let files = menucat_export::export(
        &config.output_dir,
        &config.basename,
        &config.formats,
        &extraction.catalog,
        &mut manifest,
    )?;

    let result = ExtractResult {
        catalog: extraction.catalog,
        report: extraction.report,
        manifest,
        files,
        elapsed: start.elapsed(),
    };

    info!(
        categories = result.report.categories,
        items = result.report.items,
        elapsed_ms = result.elapsed.as_millis() as u64,
        "extract pipeline complete"
    );
    progress.done(&result);
    Ok(result)
}

/// What each category strategy would propose for `html`, without extracting
/// items.
pub fn inspect(html: &str, config: &ExtractionConfig) -> Vec<StrategySurvey> {
    let snapshot = HtmlSnapshot::parse(html);
    MenuExtractor::new(config.clone()).survey(&snapshot.root())
}

pub fn inspect_file(path: &Path, config: &ExtractionConfig) -> Result<Vec<StrategySurvey>> {
    let html = std::fs::read_to_string(path).map_err(|e| MenuCatError::io(path, e))?;
    Ok(inspect(&html, config))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("menucat-pipeline-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(format!("../../../fixtures/html/{name}"))
    }

    fn config_for(snapshot: PathBuf, output_dir: &Path) -> ExtractConfig {
        let mut app = AppConfig::default();
        app.restaurant.name = "Punjab Grill".into();
        app.output.dir = output_dir.display().to_string();
        app.output.basename = "punjab_grill_menu".into();
        ExtractConfig::from_app(snapshot, &app)
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ProgressReporter for Recorder {
        fn phase(&self, name: &str) {
            self.events.lock().unwrap().push(format!("phase:{name}"));
        }
        fn category_done(&self, name: &str, items: usize) {
            self.events.lock().unwrap().push(format!("category:{name}:{items}"));
        }
        fn done(&self, result: &ExtractResult) {
            self.events.lock().unwrap().push(format!("done:{}", result.report.items));
        }
    }

    #[test]
    fn run_extract_writes_exports() {
        let tmp = temp_dir();
        let config = config_for(fixture("sections.html"), &tmp);

        let result = run_extract(&config, &SilentProgress).unwrap();

        assert_eq!(result.catalog.categories().len(), 2);
        assert_eq!(result.files.len(), 3);
        assert!(tmp.join("punjab_grill_menu.json").exists());
        assert!(tmp.join("punjab_grill_menu.csv").exists());
        assert_eq!(result.manifest.restaurant, "Punjab Grill");
        assert_eq!(result.manifest.strategy.as_deref(), Some("section-heading"));

        let csv = std::fs::read_to_string(tmp.join("punjab_grill_menu.csv")).unwrap();
        assert!(csv.starts_with("Restaurant Name,"));
        assert_eq!(csv.lines().count(), 1 + result.catalog.item_count());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn progress_sees_phases_and_categories() {
        let tmp = temp_dir();
        let config = config_for(fixture("chips.html"), &tmp);
        let recorder = Recorder::default();

        run_extract(&config, &recorder).unwrap();

        let events = recorder.events.into_inner().unwrap();
        assert_eq!(
            events,
            vec![
                "phase:Reading snapshot",
                "phase:Extracting menu",
                "category:Soups:2",
                "category:Desserts:1",
                "phase:Writing exports",
                "done:3",
            ]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_snapshot_is_io_error() {
        let tmp = temp_dir();
        let config = config_for(tmp.join("nope.html"), &tmp);

        let err = run_extract(&config, &SilentProgress).unwrap_err();
        assert!(matches!(err, MenuCatError::Io { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_utf8_snapshot_is_parse_error() {
        let tmp = temp_dir();
        let snapshot = tmp.join("broken.html");
        std::fs::write(&snapshot, [0xff, 0xfe, 0x00]).unwrap();
        let config = config_for(snapshot, &tmp);

        let err = run_extract(&config, &SilentProgress).unwrap_err();
        assert!(matches!(err, MenuCatError::Parse { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_page_still_exports() {
        let tmp = temp_dir();
        let snapshot = tmp.join("closed.html");
        std::fs::write(&snapshot, "<html><body><p>Closed for renovation</p></body></html>").unwrap();
        let config = config_for(snapshot, &tmp);

        let result = run_extract(&config, &SilentProgress).unwrap();
        assert!(result.catalog.is_empty());
        let json = std::fs::read_to_string(tmp.join("punjab_grill_menu.json")).unwrap();
        assert_eq!(json, "{}");

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn inspect_lists_every_strategy() {
        let survey = inspect_file(&fixture("landmarks.html"), &ExtractionConfig::default()).unwrap();
        let names: Vec<_> = survey.iter().map(|s| s.strategy).collect();
        assert_eq!(names, vec!["section-heading", "labeled-chip", "heading-landmark", "flat"]);
        assert_eq!(survey[2].categories, vec!["Cocktails", "Bar Bites"]);
    }
}
