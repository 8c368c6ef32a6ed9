//! Application configuration for docstitch.
//!
//! User config lives at `~/.docstitch/docstitch.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocstitchError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "docstitch.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".docstitch";

/// File-name suffix selecting the files to combine.
pub const DEFAULT_MARKDOWN_SUFFIX: &str = ".md";

/// Name of the combined file written into the root directory.
pub const DEFAULT_COMBINE_OUTPUT: &str = "combined_output.md";

/// Appended after every file's content.
pub const DEFAULT_SEPARATOR: &str = "\n\n";

/// HTML file handed to the renderer.
pub const DEFAULT_RENDER_INPUT: &str = "input.html";

/// PDF file the renderer writes.
pub const DEFAULT_RENDER_OUTPUT: &str = "output.pdf";

// ---------------------------------------------------------------------------
// Config structs (matching docstitch.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Markdown concatenation settings.
    #[serde(default)]
    pub combine: CombineConfig,

    /// HTML-to-PDF settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// `[combine]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineConfig {
    /// Only files whose name ends with this suffix are combined.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// File name of the combined output, relative to the root directory.
    #[serde(default = "default_output_name")]
    pub output_name: String,

    /// String appended after each file's content.
    #[serde(default = "default_separator")]
    pub separator: String,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            output_name: default_output_name(),
            separator: default_separator(),
        }
    }
}

fn default_suffix() -> String {
    DEFAULT_MARKDOWN_SUFFIX.into()
}
fn default_output_name() -> String {
    DEFAULT_COMBINE_OUTPUT.into()
}
fn default_separator() -> String {
    DEFAULT_SEPARATOR.into()
}

/// `[render]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Path to the `wkhtmltopdf` executable. Searched on `PATH` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkhtmltopdf: Option<String>,

    /// HTML input file.
    #[serde(default = "default_input")]
    pub input: String,

    /// PDF output file.
    #[serde(default = "default_output")]
    pub output: String,

    /// Pass `--quiet` to the renderer.
    #[serde(default = "default_true")]
    pub quiet: bool,

    /// Extra renderer options, e.g. `page-size = "A4"`. An empty value is a bare flag.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            wkhtmltopdf: None,
            input: default_input(),
            output: default_output(),
            quiet: true,
            options: BTreeMap::new(),
        }
    }
}

fn default_input() -> String {
    DEFAULT_RENDER_INPUT.into()
}
fn default_output() -> String {
    DEFAULT_RENDER_OUTPUT.into()
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Runtime settings (merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime combine settings — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct CombineSettings {
    /// Directory to search recursively; the output is written here too.
    pub root: PathBuf,
    /// File-name suffix to match.
    pub suffix: String,
    /// Output file name inside `root`.
    pub output_name: String,
    /// Appended after each file's content.
    pub separator: String,
}

impl CombineSettings {
    /// Full path of the combined output file.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }
}

impl From<&AppConfig> for CombineSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            root: PathBuf::from("."),
            suffix: config.combine.suffix.clone(),
            output_name: config.combine.output_name.clone(),
            separator: config.combine.separator.clone(),
        }
    }
}

/// Runtime render settings — merged from config file + CLI flags.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    /// Explicit renderer path; `None` means search for it.
    pub renderer: Option<PathBuf>,
    /// HTML input file.
    pub input: PathBuf,
    /// PDF output file.
    pub output: PathBuf,
    /// Pass `--quiet` to the renderer.
    pub quiet: bool,
    /// Extra renderer options as `(key, value)` pairs, in order.
    pub options: Vec<(String, String)>,
}

impl From<&AppConfig> for RenderSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            renderer: config.render.wkhtmltopdf.as_ref().map(PathBuf::from),
            input: PathBuf::from(&config.render.input),
            output: PathBuf::from(&config.render.output),
            quiet: config.render.quiet,
            options: config
                .render
                .options
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.docstitch/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocstitchError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.docstitch/docstitch.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocstitchError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        DocstitchError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_in(&config_dir()?)
}

fn init_config_in(dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| DocstitchError::io(dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| DocstitchError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| DocstitchError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
