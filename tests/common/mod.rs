// Shared fixtures for preflight integration tests
#![allow(dead_code)]

use indoc::indoc;
use preflight::io::FsProject;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PII_DOC: &str = indoc! {r#"
    # PII masking

    Mask every email and phone number with GlobalPIIMasker.

    ```python
    from utils.pii import GlobalPIIMasker
    ```
"#};

pub const UPLOAD_DOC: &str = indoc! {r#"
    Every upload goes through validate_with_magika.

    from utils.validation import validate_with_magika
"#};

pub const LOGGING_DOC: &str = indoc! {r#"
    from core.log import get_logger

    format = "%(levelname)s %(message)s"
"#};

pub const WORKFLOW_DOC: &str = indoc! {r#"
    Branch: feature/123-short-name
    Commit: [ISSUE-123] Short summary
"#};

pub const PROJECT_DOC: &str = indoc! {r#"
    Django 4.2 on PostgreSQL.
    Global PII masking, Magika for uploads and centralized logging.
"#};

pub const PYPROJECT: &str = indoc! {r#"
    [tool.poetry.dependencies]
    python = "^3.11"
    django = "4.2"
"#};

/// A project checkout in a temporary directory.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Every general and topic document, all usable.
    pub fn documented() -> Self {
        Self::new()
            .with_file("CLAUDE.md", PROJECT_DOC)
            .with_file("pyproject.toml", PYPROJECT)
            .with_file("docs/FEATURE_BRANCH_WORKFLOW.md", WORKFLOW_DOC)
            .with_file("docs/security/pii_masking.md", PII_DOC)
            .with_file("docs/validation/magika.md", UPLOAD_DOC)
            .with_file("docs/infrastructure/logging.md", LOGGING_DOC)
    }

    pub fn with_file(self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture dirs");
        }
        fs::write(&path, content).expect("write fixture file");
        self
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn project(&self) -> FsProject {
        FsProject::new(self.dir.path())
    }
}
