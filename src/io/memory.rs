use super::traits::{DocumentationSource, FeatureDocument, SourceTree};
use super::{compile_glob, matches_glob};
use crate::errors::{PreflightError, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

/// In-memory project: a sorted map of relative path to file content.
///
/// ```rust
/// use preflight::io::{MemoryProject, SourceTree};
///
/// let project = MemoryProject::new()
///     .with_file("app/views.py", "def index(request): ...")
///     .with_file("docs/security/pii_masking.md", "Use GlobalPIIMasker");
///
/// assert_eq!(project.files_matching("**/*.py").unwrap().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    files: BTreeMap<PathBuf, String>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    /// Register a path that exists but fails every read, to exercise I/O failures.
    pub fn with_unreadable(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.files.insert(path.clone(), String::new());
        self.unreadable.insert(path);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    fn read(&self, path: &Path) -> Result<Option<&String>> {
        if self.unreadable.contains(path) {
            return Err(PreflightError::io_with_path("permission denied", path));
        }
        Ok(self.files.get(path))
    }
}

impl SourceTree for MemoryProject {
    fn files_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let compiled = compile_glob(pattern)?;
        Ok(self
            .files
            .keys()
            .filter(|path| matches_glob(&compiled, path))
            .cloned()
            .collect())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        self.read(path)?
            .cloned()
            .ok_or_else(|| PreflightError::missing_input(path))
    }
}

impl DocumentationSource for MemoryProject {
    fn read_document(&self, path: &Path) -> Result<Option<String>> {
        Ok(self.read(path)?.cloned())
    }

    fn feature_directories(&self, docs_root: &Path) -> Result<Vec<String>> {
        let names: BTreeSet<String> = self
            .files
            .keys()
            .filter_map(|path| path.strip_prefix(docs_root).ok())
            .filter(|rest| rest.components().count() > 1)
            .filter_map(|rest| match rest.components().next() {
                Some(Component::Normal(name)) => Some(name.to_string_lossy().to_string()),
                _ => None,
            })
            .filter(|name| !name.starts_with('.'))
            .collect();
        Ok(names.into_iter().collect())
    }

    fn feature_documents(&self, docs_root: &Path, feature: &str) -> Result<Vec<FeatureDocument>> {
        let dir = docs_root.join(feature);
        let mut documents = Vec::new();
        for path in self.files.keys() {
            let is_direct_child = path.parent() == Some(dir.as_path());
            let is_markdown = path.extension().is_some_and(|ext| ext == "md");
            if !(is_direct_child && is_markdown) {
                continue;
            }
            let content = self.read(path)?.cloned().unwrap_or_default();
            documents.push(FeatureDocument {
                feature: feature.to_string(),
                name: path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default(),
                path: path.clone(),
                content,
            });
        }
        Ok(documents)
    }
}
