//! Recursive discovery of files by name suffix.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use docstitch_shared::{DocstitchError, Result};

/// Find every file under `root` whose file name ends with `suffix`.
///
/// Siblings are visited in file-name order, descending into each
/// directory as it is reached, so the result is stable across runs.
/// Symlinks to files count as files; symlinked directories are not followed.
/// Entries that cannot be read below the root are skipped with a warning.
pub fn find_markdown_files(root: &Path, suffix: &str) -> Result<Vec<PathBuf>> {
    let meta = std::fs::metadata(root).map_err(|e| DocstitchError::io(root, e))?;
    if !meta.is_dir() {
        return Err(DocstitchError::validation(format!(
            "'{}' is not a directory",
            root.display()
        )));
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = ?e.path(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if is_file(&entry) && entry.file_name().to_string_lossy().ends_with(suffix) {
            debug!(path = %entry.path().display(), "found file");
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn is_file(entry: &DirEntry) -> bool {
    let ft = entry.file_type();
    ft.is_file() || (ft.is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ds-discover-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "x").unwrap();
    }

    #[test]
    fn finds_all_and_only_matching_files() {
        let tmp = temp_dir();
        touch(&tmp.join("README.md"));
        touch(&tmp.join("notes.txt"));
        touch(&tmp.join("docs/guide.md"));
        touch(&tmp.join("docs/deep/nested/api.md"));
        touch(&tmp.join("docs/image.png"));
        touch(&tmp.join("docs/draft.md.bak"));
        touch(&tmp.join("UPPER.MD"));

        let mut found = find_markdown_files(&tmp, ".md").unwrap();
        found.sort();

        let mut expected = vec![
            tmp.join("README.md"),
            tmp.join("docs/deep/nested/api.md"),
            tmp.join("docs/guide.md"),
        ];
        expected.sort();
        assert_eq!(found, expected);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn directories_with_suffix_are_not_files() {
        let tmp = temp_dir();
        std::fs::create_dir_all(tmp.join("folder.md")).unwrap();
        touch(&tmp.join("folder.md/inner.md"));

        let found = find_markdown_files(&tmp, ".md").unwrap();
        assert_eq!(found, vec![tmp.join("folder.md/inner.md")]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn order_is_sorted_by_name_depth_first() {
        let tmp = temp_dir();
        touch(&tmp.join("b.md"));
        touch(&tmp.join("a/z.md"));
        touch(&tmp.join("a/y.md"));
        touch(&tmp.join("c.md"));

        let found = find_markdown_files(&tmp, ".md").unwrap();
        assert_eq!(
            found,
            vec![
                tmp.join("a/y.md"),
                tmp.join("a/z.md"),
                tmp.join("b.md"),
                tmp.join("c.md"),
            ]
        );

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn custom_suffix() {
        let tmp = temp_dir();
        touch(&tmp.join("one.markdown"));
        touch(&tmp.join("two.md"));

        let found = find_markdown_files(&tmp, ".markdown").unwrap();
        assert_eq!(found, vec![tmp.join("one.markdown")]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = temp_dir();
        assert!(find_markdown_files(&tmp, ".md").unwrap().is_empty());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_root_is_io_error() {
        let missing = std::env::temp_dir().join(format!("ds-missing-{}", uuid::Uuid::now_v7()));
        let err = find_markdown_files(&missing, ".md").unwrap_err();
        assert!(matches!(err, DocstitchError::Io { .. }));
    }

    #[test]
    fn file_root_is_rejected() {
        let tmp = temp_dir();
        let file = tmp.join("single.md");
        touch(&file);

        let err = find_markdown_files(&file, ".md").unwrap_err();
        assert!(matches!(err, DocstitchError::Validation { .. }));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directories_are_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = temp_dir();
        touch(&tmp.join("visible.md"));
        touch(&tmp.join("locked/hidden.md"));
        let locked = tmp.join("locked");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not stop root.
        if std::fs::read_dir(&locked).is_err() {
            let found = find_markdown_files(&tmp, ".md").unwrap();
            assert_eq!(found, vec![tmp.join("visible.md")]);
        }

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_included() {
        let tmp = temp_dir();
        touch(&tmp.join("real/target.md"));
        std::os::unix::fs::symlink(tmp.join("real/target.md"), tmp.join("link.md")).unwrap();

        let found = find_markdown_files(&tmp, ".md").unwrap();
        assert!(found.contains(&tmp.join("link.md")));
        assert!(found.contains(&tmp.join("real/target.md")));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
