//! menucat CLI: turn saved restaurant ordering pages into menu catalogs.
//!
//! Reads a rendered page snapshot, extracts categories and dishes with the
//! heuristic engine, and writes JSON, CSV and a run manifest.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
