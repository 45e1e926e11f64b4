//! Parsing and validation of `ioplace.toml` configuration files.
//!
//! This crate reads the placer configuration file and produces a strongly-typed
//! [`PlacerConfig`]: the core boundary, the section tuning knobs, metal layers
//! and blockages. The placement core consumes plain values and never touches
//! the filesystem; front ends translate a [`PlacerConfig`] into its inputs.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_path, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
