//! Recursive discovery of landscape images under an output directory

use crate::io::error::{MoranError, Result, WithPath, invalid_parameter};
use crate::io::naming::NamePattern;
use std::path::{Path, PathBuf};

/// Collect the files a batch should analyze
///
/// A directory target is walked recursively and keeps every file whose name
/// contains the pattern's marker. A file target is taken as-is. Paths are
/// sorted lexicographically, then truncated to `limit` when one is given.
///
/// # Errors
///
/// Returns an error if:
/// - `limit` is zero (`InvalidParameter`)
/// - The target does not exist (`FileSystem`)
/// - A directory cannot be read (`FileSystem`)
pub fn collect_images(
    target: &Path,
    pattern: &NamePattern,
    limit: Option<usize>,
) -> Result<Vec<PathBuf>> {
    if limit == Some(0) {
        return Err(invalid_parameter(
            "limit",
            &0,
            &"batch size must be at least one",
        ));
    }

    let mut files = if target.is_file() {
        vec![target.to_path_buf()]
    } else if target.is_dir() {
        walk(target, pattern)?
    } else {
        return Err(MoranError::FileSystem {
            path: target.to_path_buf(),
            operation: "discover images",
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "target is neither a file nor a directory",
            ),
        });
    };

    files.sort();
    if let Some(limit) = limit {
        files.truncate(limit);
    }

    Ok(files)
}

fn walk(root: &Path, pattern: &NamePattern) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = std::fs::read_dir(&dir).map_err(|e| MoranError::FileSystem {
            path: dir.clone(),
            operation: "read directory",
            source: e,
        })?;

        for entry in entries {
            let path = entry.with_path(&dir)?.path();
            if path.is_dir() {
                pending.push(path);
            } else if pattern.matches(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}
