pub mod memory;
pub mod traits;
pub mod walker;

pub use memory::MemoryProject;
pub use traits::{DocumentationSource, FeatureDocument, SourceTree};
pub use walker::FsProject;

use crate::errors::{PreflightError, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Match a project-relative path against a glob.
///
/// A leading `**/` also matches files at the project root, so `**/views.py`
/// selects both `views.py` and `app/views.py`.
pub fn matches_glob(pattern: &glob::Pattern, path: &Path) -> bool {
    if pattern.matches_path(path) {
        return true;
    }
    pattern
        .as_str()
        .strip_prefix("**/")
        .and_then(|rest| glob::Pattern::new(rest).ok())
        .map(|rest| rest.matches_path(path))
        .unwrap_or(false)
}

pub fn compile_glob(pattern: &str) -> Result<glob::Pattern> {
    glob::Pattern::new(pattern).map_err(|e| PreflightError::pattern(pattern, e.msg))
}

/// Files matching any of `globs`, in glob order then path order, each listed once.
pub fn files_matching_any<T, G>(tree: &T, globs: &[G]) -> Result<Vec<PathBuf>>
where
    T: SourceTree + ?Sized,
    G: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut files = Vec::new();
    for glob in globs {
        for path in tree.files_matching(glob.as_ref())? {
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

/// Read source files in parallel, keeping the input order.
///
/// Paths that no longer exist are dropped; any other read failure aborts.
pub fn read_sources<T>(tree: &T, paths: &[PathBuf]) -> Result<Vec<(PathBuf, String)>>
where
    T: SourceTree + ?Sized,
{
    let texts: Vec<Option<(PathBuf, String)>> = paths
        .par_iter()
        .map(|path| match tree.read_file(path) {
            Ok(text) => Ok(Some((path.clone(), text))),
            Err(PreflightError::MissingInput { .. }) => {
                log::debug!("Skipping missing file {}", path.display());
                Ok(None)
            }
            Err(e) => Err(e),
        })
        .collect::<Result<_>>()?;

    Ok(texts.into_iter().flatten().collect())
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    fs::write(path, content).map_err(|e| PreflightError::io_with_path(e.to_string(), path))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| PreflightError::io_with_path(e.to_string(), path))
}
