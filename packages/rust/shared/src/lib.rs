//! Shared types, error model, and configuration for menucat.
//!
//! This crate is the foundation depended on by all other menucat crates.
//! It provides:
//! - [`MenuCatError`]: the unified error type
//! - Domain types ([`MenuCatalog`], [`MenuCategory`], [`MenuItem`], [`VegStatus`])
//! - Configuration ([`AppConfig`], [`ExtractionConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ExtractionConfig, OutputConfig, OutputFormat, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{MenuCatError, Result};
pub use types::{
    CURRENT_SCHEMA_VERSION, ExtractionReport, ItemKey, MenuCatalog, MenuCategory, MenuItem,
    RestaurantInfo, VegStatus,
};
