//! Source file discovery.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Cannot read source directory {path:?}: {source}")]
    Root {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error walking {root:?}: {source}")]
    Walk {
        root: PathBuf,
        source: walkdir::Error,
    },
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Recursively collects the files under `root` whose extension matches
/// `extension` (without the leading dot), as sorted absolute paths.
pub fn find_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, CrawlError> {
    let extension = extension.trim_start_matches('.');
    let root = root.canonicalize().map_err(|source| CrawlError::Root {
        path: root.to_path_buf(),
        source,
    })?;
    // canonicalize succeeds on unreadable directories too.
    std::fs::read_dir(&root).map_err(|source| CrawlError::Root {
        path: root.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|source| CrawlError::Walk {
            root: root.clone(),
            source,
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
