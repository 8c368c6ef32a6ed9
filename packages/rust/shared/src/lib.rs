//! Shared error model and configuration for docstitch.
//!
//! This crate is the foundation depended on by all other docstitch crates.
//! It provides:
//! - [`DocstitchError`] — the unified error type
//! - Configuration ([`AppConfig`], [`CombineSettings`], [`RenderSettings`], config loading)

pub mod config;
pub mod error;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CombineConfig, CombineSettings, DEFAULT_COMBINE_OUTPUT, DEFAULT_MARKDOWN_SUFFIX,
    DEFAULT_RENDER_INPUT, DEFAULT_RENDER_OUTPUT, DEFAULT_SEPARATOR, RenderConfig, RenderSettings,
    config_dir, config_file_path, init_config, load_config, load_config_from,
};
pub use error::{DocstitchError, Result};
