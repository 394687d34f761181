//! # File Discovery
//!
//! Shell-glob style discovery of `*.<ext>` files in a single directory.

use std::path::{Path, PathBuf};

use confcheck_core::CheckError;

/// Extensions checked when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["json", "yml"];

/// List the files directly inside `dir` whose extension is in `extensions`.
///
/// Matches what `*.json`-style globbing selects: regular files (symlinks are
/// followed), case-sensitive extensions, and no dotfiles. Results are sorted
/// so that "first failure" is deterministic across platforms.
///
/// # Errors
///
/// Returns [`CheckError::Io`] if the directory cannot be listed.
pub fn discover<S: AsRef<str>>(dir: &Path, extensions: &[S]) -> Result<Vec<PathBuf>, CheckError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CheckError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CheckError::io(dir, e))?;
        let path = entry.path();

        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!(path = %path.display(), "skipping non UTF-8 file name");
            continue;
        };
        if name.starts_with('.') || !path.is_file() {
            continue;
        }

        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.as_ref() == ext));
        if matches {
            files.push(path);
        }
    }

    files.sort();
    tracing::debug!(dir = %dir.display(), count = files.len(), "discovered config files");
    Ok(files)
}
