//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use menucat_core::pipeline::{ExtractConfig, ExtractResult, ProgressReporter};
use menucat_shared::{
    AppConfig, OutputFormat, init_config, load_config, load_config_from, validate_config,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// menucat: extract restaurant menus from rendered ordering pages.
#[derive(Parser)]
#[command(
    name = "menucat",
    version,
    about = "Extract menu categories and dishes from saved restaurant ordering pages.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract the menu from a saved page and write the exports.
    Extract {
        /// Saved, fully rendered HTML page.
        snapshot: PathBuf,

        #[command(flatten)]
        overrides: Overrides,

        /// Print the extraction report as JSON after the summary.
        #[arg(long)]
        report: bool,
    },

    /// Show which categories each strategy would find, without extracting items.
    Inspect {
        /// Saved, fully rendered HTML page.
        snapshot: PathBuf,

        /// Config file (defaults to ~/.menucat/menucat.toml).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags that override the config file.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct Overrides {
    /// Config file (defaults to ~/.menucat/menucat.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// File stem for the exports.
    #[arg(long)]
    pub basename: Option<String>,

    /// Formats to write, comma-separated (json,csv).
    #[arg(long)]
    pub format: Option<String>,

    /// Name of the catch-all category.
    #[arg(long)]
    pub fallback_category: Option<String>,

    /// Ancestor levels a boundary walk may climb.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "menucat=info",
        1 => "menucat=debug",
        _ => "menucat=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract {
            snapshot,
            overrides,
            report,
        } => cmd_extract(&snapshot, &overrides, report),
        Command::Inspect { snapshot, config } => cmd_inspect(&snapshot, config.as_deref()),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

/// Load the config file named on the command line, or the user config.
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

/// Apply command-line overrides on top of a loaded config.
fn apply_overrides(mut config: AppConfig, overrides: &Overrides) -> Result<AppConfig> {
    if let Some(out) = &overrides.out {
        config.output.dir = out.display().to_string();
    }
    if let Some(basename) = &overrides.basename {
        config.output.basename = basename.clone();
    }
    if let Some(list) = &overrides.format {
        config.output.formats = OutputFormat::parse_list(list)?;
    }
    if let Some(name) = &overrides.fallback_category {
        config.extraction.fallback_category = name.clone();
    }
    if let Some(depth) = overrides.max_depth {
        config.extraction.max_ancestor_depth = depth;
    }
    validate_config(&config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(snapshot: &Path, overrides: &Overrides, print_report: bool) -> Result<()> {
    if !snapshot.is_file() {
        return Err(eyre!("snapshot '{}' is not a file", snapshot.display()));
    }

    let config = apply_overrides(resolve_config(overrides.config.as_deref())?, overrides)?;
    let extract_config = ExtractConfig::from_app(snapshot, &config);

    info!(
        snapshot = %snapshot.display(),
        restaurant = %config.restaurant.name,
        "extracting menu"
    );

    let reporter = CliProgress::new();
    let result = menucat_core::pipeline::run_extract(&extract_config, &reporter)?;

    println!();
    if result.catalog.is_empty() {
        println!("  No menu items found.");
    } else {
        println!("  Menu extracted successfully!");
    }
    println!(
        "  Strategy:   {}",
        result.report.strategy.as_deref().unwrap_or("none")
    );
    println!("  Categories: {}", result.report.categories);
    println!("  Items:      {}", result.report.items);
    if result.report.merged_duplicates > 0 {
        println!("  Merged:     {}", result.report.merged_duplicates);
    }
    if result.report.skipped_units > 0 {
        println!("  Skipped:    {}", result.report.skipped_units);
    }
    for file in &result.files {
        println!("  Wrote:      {}", file.display());
    }
    println!("  Time:       {:.2}s", result.elapsed.as_secs_f64());
    println!();

    if print_report {
        println!("{}", serde_json::to_string_pretty(&result.report)?);
    }

    Ok(())
}

fn cmd_inspect(snapshot: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = resolve_config(config_path)?;
    validate_config(&config)?;

    let survey = menucat_core::pipeline::inspect_file(snapshot, &config.extraction)?;

    println!();
    for entry in &survey {
        match &entry.error {
            Some(error) => println!("  {:<18} failed: {error}", entry.strategy),
            None if entry.categories.is_empty() => println!("  {:<18} (nothing)", entry.strategy),
            None => println!("  {:<18} {}", entry.strategy, entry.categories.join(", ")),
        }
    }
    let winner = survey
        .iter()
        .find(|entry| !entry.categories.is_empty())
        .map(|entry| entry.strategy)
        .unwrap_or("none");
    println!();
    println!("  Extraction would use: {winner}");
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn category_done(&self, name: &str, items: usize) {
        self.spinner.set_message(format!("Extracted {name} ({items} items)"));
    }

    fn done(&self, _result: &ExtractResult) {
        self.spinner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_flags_parse() {
        let cli = Cli::try_parse_from([
            "menucat",
            "-vv",
            "extract",
            "page.html",
            "--out",
            "out",
            "--format",
            "csv",
            "--max-depth",
            "3",
            "--fallback-category",
            "All Items",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Extract {
                snapshot,
                overrides,
                report,
            } => {
                assert_eq!(snapshot, PathBuf::from("page.html"));
                assert_eq!(overrides.max_depth, Some(3));
                assert_eq!(overrides.format.as_deref(), Some("csv"));
                assert!(!report);
            }
            _ => panic!("expected extract"),
        }
    }

    #[test]
    fn overrides_win_over_config() {
        let overrides = Overrides {
            out: Some(PathBuf::from("exports")),
            basename: Some("tamasha_menu".into()),
            format: Some("json".into()),
            fallback_category: Some("All Items".into()),
            max_depth: Some(3),
            ..Overrides::default()
        };
        let config = apply_overrides(AppConfig::default(), &overrides).unwrap();

        assert_eq!(config.output.dir, "exports");
        assert_eq!(config.output.basename, "tamasha_menu");
        assert_eq!(config.output.formats, vec![OutputFormat::Json]);
        assert_eq!(config.extraction.fallback_category, "All Items");
        assert_eq!(config.extraction.max_ancestor_depth, 3);
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let zero_depth = Overrides {
            max_depth: Some(0),
            ..Overrides::default()
        };
        assert!(apply_overrides(AppConfig::default(), &zero_depth).is_err());

        let bad_format = Overrides {
            format: Some("xml".into()),
            ..Overrides::default()
        };
        assert!(apply_overrides(AppConfig::default(), &bad_format).is_err());
    }
}
