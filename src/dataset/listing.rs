//! Directory enumeration shared by the folder datasets.
//!
//! Entries come back sorted by file name so catalogs are identical across
//! platforms and runs.

use super::error::DatasetError;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// Fails with [`DatasetError::InvalidDirectory`] unless `dir` is an existing directory.
pub fn ensure_dir(dir: &Path) -> Result<(), DatasetError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(DatasetError::InvalidDirectory {
            path: dir.to_owned(),
        })
    }
}

/// Regular files directly inside `dir`.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    list_entries(dir, |path| path.is_file())
}

/// Immediate subdirectories of `dir`.
pub fn list_subdirs(dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
    list_entries(dir, |path| path.is_dir())
}

/// Final path component as an owned string, lossy for non UTF-8 names.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn list_entries<F>(dir: &Path, keep: F) -> Result<Vec<PathBuf>, DatasetError>
where
    F: Fn(&Path) -> bool,
{
    let entries = fs::read_dir(dir).map_err(|err| DatasetError::io(dir, err))?;
    let mut paths = vec![];
    for entry in entries {
        let path = entry.map_err(|err| DatasetError::io(dir, err))?.path();
        if keep(&path) {
            paths.push(path);
        }
    }
    Ok(paths
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect())
}
