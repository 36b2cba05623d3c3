//! Pipeline orchestration for menucat.
//!
//! Ties the snapshot on disk, the extraction engine and the exporters into
//! one run (`run_extract`), plus a dry run for new page layouts (`inspect`).

pub mod pipeline;

pub use pipeline::{
    ExtractConfig, ExtractResult, ProgressReporter, SilentProgress, inspect, inspect_file,
    run_extract,
};
