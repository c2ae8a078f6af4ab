//! Collaborator traits the pipeline reads the project through.
//!
//! The validation logic never touches the file system directly. It asks a
//! [`DocumentationSource`] for documentation text and a [`SourceTree`] for
//! source files, so the same pipeline runs against a real checkout
//! ([`FsProject`](super::FsProject)) or an in-memory project
//! ([`MemoryProject`](super::MemoryProject)).
//!
//! # Error contract
//!
//! Not-found is not an error for documentation: `read_document` returns
//! `Ok(None)`. For source files, a missing path is reported as
//! `PreflightError::MissingInput` so callers can decide whether to skip it.
//! Anything else that prevents reading is `PreflightError::Io` and aborts the
//! run.

use crate::errors::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One markdown document from a feature documentation directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureDocument {
    pub feature: String,
    /// File stem, e.g. `api` for `docs/user/api.md`.
    pub name: String,
    /// Path relative to the project root.
    pub path: PathBuf,
    pub content: String,
}

pub trait DocumentationSource {
    /// Read a document by project-relative path; `Ok(None)` when it does not exist.
    fn read_document(&self, path: &Path) -> Result<Option<String>>;

    /// Names of the non-hidden subdirectories of `docs_root`, sorted.
    fn feature_directories(&self, docs_root: &Path) -> Result<Vec<String>>;

    /// Every `*.md` file directly inside `docs_root/<feature>`, sorted by file name.
    ///
    /// Returns an empty list when the directory does not exist.
    fn feature_documents(&self, docs_root: &Path, feature: &str) -> Result<Vec<FeatureDocument>>;
}

/// Read-only view of the project's source files.
///
/// Implementations must be `Sync`: the scanner and the checker read files
/// from several threads at once.
pub trait SourceTree: Sync {
    /// Project-relative paths matching a glob, sorted lexicographically.
    fn files_matching(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Read a file by project-relative path.
    fn read_file(&self, path: &Path) -> Result<String>;
}
