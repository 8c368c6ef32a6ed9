//! HTML-to-PDF conversion through an external `wkhtmltopdf` binary.
//!
//! The renderer is resolved from an explicit path or the `PATH`, fed the
//! configured options plus any options embedded in the document's
//! `<meta name="pdfkit-*">` tags, and run to completion.

mod meta;

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use docstitch_shared::{DocstitchError, RenderSettings, Result};

pub use meta::{META_PREFIX, extract_meta_options};

/// Executable name searched for on `PATH`.
pub const RENDERER_NAME: &str = "wkhtmltopdf";

/// Install locations checked when the renderer is not on `PATH`.
#[cfg(windows)]
const DEFAULT_INSTALL_LOCATIONS: &[&str] = &[r"C:\Program Files\wkhtmltopdf\bin\wkhtmltopdf.exe"];
#[cfg(not(windows))]
const DEFAULT_INSTALL_LOCATIONS: &[&str] = &["/usr/local/bin/wkhtmltopdf", "/usr/bin/wkhtmltopdf"];

/// Result of a successful render.
#[derive(Debug, Clone)]
pub struct RenderSummary {
    /// Path of the generated PDF.
    pub output_path: PathBuf,
    /// Size of the generated PDF in bytes.
    pub bytes_written: u64,
    /// Renderer executable that was run.
    pub renderer: PathBuf,
    /// Arguments passed to the renderer.
    pub args: Vec<OsString>,
}

// ---------------------------------------------------------------------------
// Renderer resolution
// ---------------------------------------------------------------------------

/// Resolve the renderer executable.
///
/// An explicit path must point at an existing file. Without one, `PATH` is
/// searched, then the platform's default install locations.
pub fn locate_renderer(explicit: Option<&Path>) -> Result<PathBuf> {
    locate_renderer_in(
        explicit,
        std::env::var_os("PATH"),
        DEFAULT_INSTALL_LOCATIONS,
    )
}

fn locate_renderer_in(
    explicit: Option<&Path>,
    search_path: Option<OsString>,
    defaults: &[&str],
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(DocstitchError::renderer_not_found(format!(
            "'{}' does not exist",
            path.display()
        )));
    }

    if let Ok(path) = which::which_in(RENDERER_NAME, search_path, ".") {
        debug!(path = %path.display(), "renderer found on PATH");
        return Ok(path);
    }

    defaults
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            DocstitchError::renderer_not_found(format!(
                "{RENDERER_NAME} is not on PATH or in {}; install it or pass --renderer",
                defaults.join(", ")
            ))
        })
}

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

/// Normalize an option key to its `--long` form.
fn normalize_key(key: &str) -> Result<String> {
    let bare = key.trim().trim_start_matches('-');
    if bare.is_empty() || bare.contains(char::is_whitespace) {
        return Err(DocstitchError::validation(format!(
            "invalid renderer option '{key}'"
        )));
    }
    Ok(format!("--{bare}"))
}

/// Build the renderer argument list.
///
/// Order: `--quiet` (if enabled), configured options, then document meta
/// options not already set, then the input and output paths. Configured
/// options win over meta options with the same key. An empty value is
/// emitted as a bare flag.
pub fn build_args(settings: &RenderSettings, meta: &[(String, String)]) -> Result<Vec<OsString>> {
    let mut args: Vec<OsString> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    if settings.quiet {
        args.push("--quiet".into());
        seen.push("--quiet".into());
    }

    for (origin, (key, value)) in settings
        .options
        .iter()
        .map(|o| ("config", o))
        .chain(meta.iter().map(|o| ("meta", o)))
    {
        let key = normalize_key(key)?;
        if seen.contains(&key) {
            debug!(%key, origin, "option already set, skipping");
            continue;
        }
        args.push(key.clone().into());
        if !value.is_empty() {
            args.push(value.into());
        }
        seen.push(key);
    }

    args.push(settings.input.clone().into_os_string());
    args.push(settings.output.clone().into_os_string());
    Ok(args)
}

// ---------------------------------------------------------------------------
// Render
// ---------------------------------------------------------------------------

/// Convert `settings.input` to a PDF at `settings.output`.
#[instrument(skip_all, fields(input = %settings.input.display(), output = %settings.output.display()))]
pub async fn render(settings: &RenderSettings) -> Result<RenderSummary> {
    let input_is_file = tokio::fs::metadata(&settings.input)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !input_is_file {
        return Err(DocstitchError::validation(format!(
            "no such file: {}",
            settings.input.display()
        )));
    }

    let raw = tokio::fs::read(&settings.input)
        .await
        .map_err(|e| DocstitchError::io(&settings.input, e))?;
    let meta = extract_meta_options(&String::from_utf8_lossy(&raw));
    if !meta.is_empty() {
        debug!(count = meta.len(), "document carries renderer options");
    }

    let renderer = locate_renderer(settings.renderer.as_deref())?;
    let args = build_args(settings, &meta)?;

    debug!(renderer = %renderer.display(), ?args, "running renderer");

    // Without --quiet the renderer's progress goes straight to the terminal.
    let stderr_mode = if settings.quiet {
        Stdio::piped()
    } else {
        Stdio::inherit()
    };

    let output = Command::new(&renderer)
        .args(&args)
        .stdin(Stdio::null())
        .stderr(stderr_mode)
        .output()
        .await
        .map_err(|e| DocstitchError::io(&renderer, e))?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        let mut stderr = stderr;
        if stderr.contains("cannot connect to X server") {
            stderr.push_str(
                "\n\nThis wkhtmltopdf build needs an X server; use the patched-qt build or run under xvfb.",
            );
        }
        return Err(DocstitchError::Render {
            code: output.status.code().unwrap_or(-1),
            stderr,
        });
    }

    if !stderr.is_empty() {
        warn!(%stderr, "renderer reported warnings");
    }

    let bytes_written = tokio::fs::metadata(&settings.output)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if bytes_written == 0 {
        return Err(DocstitchError::validation(format!(
            "renderer produced no output at '{}'; re-run with --no-quiet to see its diagnostics",
            settings.output.display()
        )));
    }

    info!(
        output = %settings.output.display(),
        bytes = bytes_written,
        "PDF written"
    );

    Ok(RenderSummary {
        output_path: settings.output.clone(),
        bytes_written,
        renderer,
        args,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
