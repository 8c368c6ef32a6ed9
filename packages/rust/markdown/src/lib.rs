//! Markdown discovery and concatenation.
//!
//! Walks a directory tree for Markdown files and stitches their contents into
//! a single combined document written back into the root directory.

mod discover;

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use docstitch_shared::{CombineSettings, DocstitchError, Result};

pub use discover::find_markdown_files;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Result of a combine run that wrote an output file.
#[derive(Debug, Clone)]
pub struct CombineSummary {
    /// Path of the combined file.
    pub output_path: PathBuf,
    /// Input files, in the order their contents appear in the output.
    pub files: Vec<PathBuf>,
    /// Size of the combined file in bytes.
    pub bytes_written: usize,
}

/// Progress callback for reporting combine status.
pub trait CombineProgress: Send + Sync {
    /// Called once discovery has finished.
    fn discovered(&self, count: usize);
    /// Called after each file's content has been appended.
    fn appended(&self, path: &Path, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl CombineProgress for SilentProgress {
    fn discovered(&self, _count: usize) {}
    fn appended(&self, _path: &Path, _current: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Combine
// ---------------------------------------------------------------------------

/// Concatenate the UTF-8 contents of `files`, appending `separator` after each.
pub fn combine_files(files: &[PathBuf], separator: &str) -> Result<String> {
    combine_with_progress(files, separator, &SilentProgress)
}

fn combine_with_progress(
    files: &[PathBuf],
    separator: &str,
    progress: &dyn CombineProgress,
) -> Result<String> {
    let mut combined = String::new();

    for (i, path) in files.iter().enumerate() {
        let content = std::fs::read_to_string(path).map_err(|e| DocstitchError::io(path, e))?;
        combined.push_str(&content);
        combined.push_str(separator);
        progress.appended(path, i + 1, files.len());
    }

    Ok(combined)
}

/// Combine every matching file under `settings.root` into `settings.output_path()`.
///
/// The output file itself is never treated as an input. Returns `None` and
/// writes nothing when no matching files exist.
#[instrument(skip_all, fields(root = %settings.root.display(), suffix = %settings.suffix))]
pub fn combine_dir(
    settings: &CombineSettings,
    progress: &dyn CombineProgress,
) -> Result<Option<CombineSummary>> {
    let output_path = settings.output_path();

    let files: Vec<PathBuf> = find_markdown_files(&settings.root, &settings.suffix)?
        .into_iter()
        .filter(|p| *p != output_path)
        .collect();

    progress.discovered(files.len());

    if files.is_empty() {
        info!("no matching files found, nothing written");
        return Ok(None);
    }

    debug!(count = files.len(), "combining files");

    let combined = combine_with_progress(&files, &settings.separator, progress)?;

    std::fs::write(&output_path, &combined).map_err(|e| DocstitchError::io(&output_path, e))?;

    info!(
        output = %output_path.display(),
        files = files.len(),
        bytes = combined.len(),
        "combined output written"
    );

    Ok(Some(CombineSummary {
        output_path,
        files,
        bytes_written: combined.len(),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
