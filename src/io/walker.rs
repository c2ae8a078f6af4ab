use super::traits::{DocumentationSource, FeatureDocument, SourceTree};
use super::{compile_glob, matches_glob};
use crate::errors::{PreflightError, Result};
use ignore::WalkBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// A project checkout on disk.
///
/// Files are enumerated once, lazily, honouring `.gitignore`; every path the
/// project hands out is relative to `root`.
pub struct FsProject {
    root: PathBuf,
    files: once_cell::sync::OnceCell<Vec<PathBuf>>,
}

impl FsProject {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: once_cell::sync::OnceCell::new(),
        }
    }

    fn all_files(&self) -> Result<&Vec<PathBuf>> {
        self.files.get_or_try_init(|| self.walk())
    }

    fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(PreflightError::io_with_path(
                "project root is not a readable directory",
                &self.root,
            ));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(true)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry.map_err(io_error(&self.root))?;
            let path = entry.path();

            if path.is_file() {
                let relative = pathdiff::diff_paths(path, &self.root);
                files.push(relative.unwrap_or_else(|| path.to_path_buf()));
            }
        }

        files.sort();
        log::debug!(
            "Indexed {} files under {}",
            files.len(),
            self.root.display()
        );
        Ok(files)
    }
}

fn io_error<E: std::fmt::Display>(path: &Path) -> impl Fn(E) -> PreflightError + '_ {
    move |e| PreflightError::io_with_path(e.to_string(), path)
}

/// Read a file as text. Bytes that are not UTF-8 are replaced, not rejected.
fn read_text(full: &Path, relative: &Path) -> std::io::Result<String> {
    let bytes = fs::read(full)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!(
                "{} is not valid UTF-8, reading it lossily",
                relative.display()
            );
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

impl SourceTree for FsProject {
    fn files_matching(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let compiled = compile_glob(pattern)?;
        Ok(self
            .all_files()?
            .iter()
            .filter(|path| matches_glob(&compiled, path))
            .cloned()
            .collect())
    }

    fn read_file(&self, path: &Path) -> Result<String> {
        read_text(&self.root.join(path), path).map_err(|e| PreflightError::from_io(&e, path))
    }
}

impl DocumentationSource for FsProject {
    fn read_document(&self, path: &Path) -> Result<Option<String>> {
        match read_text(&self.root.join(path), path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PreflightError::io_with_path(e.to_string(), path)),
        }
    }

    fn feature_directories(&self, docs_root: &Path) -> Result<Vec<String>> {
        let dir = self.root.join(docs_root);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(io_error(docs_root))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(docs_root))?;
            let name = entry.file_name().to_string_lossy().to_string();
            if entry.path().is_dir() && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn feature_documents(&self, docs_root: &Path, feature: &str) -> Result<Vec<FeatureDocument>> {
        let relative_dir = docs_root.join(feature);
        let dir = self.root.join(&relative_dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(io_error(&relative_dir))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&relative_dir))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
                paths.push(path);
            }
        }
        paths.sort();

        paths
            .into_iter()
            .map(|path| {
                let name = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_default();
                let relative = relative_dir.join(path.file_name().unwrap_or_default());
                let content = read_text(&path, &relative).map_err(io_error(&relative))?;
                Ok(FeatureDocument {
                    feature: feature.to_string(),
                    name,
                    path: relative,
                    content,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let base = temp.path();
        fs::create_dir_all(base.join("app")).unwrap();
        fs::create_dir_all(base.join("docs/user")).unwrap();
        fs::create_dir_all(base.join("docs/.drafts")).unwrap();
        fs::write(base.join("app/views.py"), "def index(request):\n    pass\n").unwrap();
        fs::write(base.join("app/models.py"), "class User(Model):\n    pass\n").unwrap();
        fs::write(base.join("manage.py"), "print('hi')\n").unwrap();
        fs::write(base.join("docs/user/api.md"), "# API\n").unwrap();
        fs::write(base.join("docs/user/models.md"), "# Models\n").unwrap();
        fs::write(base.join("docs/user/notes.txt"), "ignored").unwrap();
        temp
    }

    #[test]
    fn test_files_matching_returns_sorted_relative_paths() {
        let temp = create_project();
        let project = FsProject::new(temp.path());

        let files = project.files_matching("**/*.py").unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("app/models.py"),
                PathBuf::from("app/views.py"),
                PathBuf::from("manage.py"),
            ]
        );
    }

    #[test]
    fn test_read_missing_file_is_missing_input() {
        let temp = create_project();
        let project = FsProject::new(temp.path());

        let err = project.read_file(Path::new("app/urls.py")).unwrap_err();
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_missing_document_is_none() {
        let temp = create_project();
        let project = FsProject::new(temp.path());

        assert_eq!(project.read_document(Path::new("CLAUDE.md")).unwrap(), None);
    }

    #[test]
    fn test_feature_directories_skip_hidden() {
        let temp = create_project();
        let project = FsProject::new(temp.path());

        let dirs = project.feature_directories(Path::new("docs")).unwrap();
        assert_eq!(dirs, vec!["user".to_string()]);
    }

    #[test]
    fn test_feature_documents_only_markdown() {
        let temp = create_project();
        let project = FsProject::new(temp.path());

        let docs = project.feature_documents(Path::new("docs"), "user").unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["api", "models"]);
        assert_eq!(docs[0].path, PathBuf::from("docs/user/api.md"));

        assert!(project
            .feature_documents(Path::new("docs"), "billing")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_non_utf8_source_is_read_lossily() {
        let temp = create_project();
        fs::write(temp.path().join("app/legacy.py"), b"# caf\xe9\nx = 1\n").unwrap();
        let project = FsProject::new(temp.path());

        let text = project.read_file(Path::new("app/legacy.py")).unwrap();
        assert_eq!(text, "# caf\u{FFFD}\nx = 1\n");
        let doc = project.read_document(Path::new("app/legacy.py")).unwrap();
        assert_eq!(doc.as_deref(), Some(text.as_str()));
    }

    #[test]
    fn test_missing_root_is_fatal() {
        let project = FsProject::new("/definitely/not/here/preflight");
        let err = project.files_matching("**/*.py").unwrap_err();
        assert!(err.is_fatal());
    }
}
