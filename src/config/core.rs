use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for preflight (`.preflight.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PreflightConfig {
    /// Where the documentation lives
    #[serde(default)]
    pub docs: DocsConfig,

    /// Candidate helper names per documented topic
    #[serde(default)]
    pub topics: TopicsConfig,

    /// Issue scanner settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Documentation/code consistency settings
    #[serde(default)]
    pub consistency: ConsistencyConfig,

    /// Preview sizes for halted runs
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocsConfig {
    #[serde(default = "default_docs_root")]
    pub root: PathBuf,
    #[serde(default = "default_project_file")]
    pub project_file: PathBuf,
    #[serde(default = "default_dependencies_file")]
    pub dependencies_file: PathBuf,
    #[serde(default = "default_workflow")]
    pub workflow: PathBuf,
    #[serde(default = "default_pii_masking")]
    pub pii_masking: PathBuf,
    #[serde(default = "default_upload_validation")]
    pub upload_validation: PathBuf,
    #[serde(default = "default_centralized_logging")]
    pub centralized_logging: PathBuf,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: default_docs_root(),
            project_file: default_project_file(),
            dependencies_file: default_dependencies_file(),
            workflow: default_workflow(),
            pii_masking: default_pii_masking(),
            upload_validation: default_upload_validation(),
            centralized_logging: default_centralized_logging(),
        }
    }
}

fn default_docs_root() -> PathBuf {
    PathBuf::from("docs")
}

fn default_project_file() -> PathBuf {
    PathBuf::from("CLAUDE.md")
}

fn default_dependencies_file() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

fn default_workflow() -> PathBuf {
    PathBuf::from("docs/FEATURE_BRANCH_WORKFLOW.md")
}

fn default_pii_masking() -> PathBuf {
    PathBuf::from("docs/security/pii_masking.md")
}

fn default_upload_validation() -> PathBuf {
    PathBuf::from("docs/validation/magika.md")
}

fn default_centralized_logging() -> PathBuf {
    PathBuf::from("docs/infrastructure/logging.md")
}

/// Helper names recognised in topic documents, in preference order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopicsConfig {
    #[serde(default = "default_pii_symbols")]
    pub pii_symbols: Vec<String>,
    #[serde(default = "default_upload_symbols")]
    pub upload_symbols: Vec<String>,
    #[serde(default = "default_logging_symbols")]
    pub logging_symbols: Vec<String>,
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            pii_symbols: default_pii_symbols(),
            upload_symbols: default_upload_symbols(),
            logging_symbols: default_logging_symbols(),
        }
    }
}

fn default_pii_symbols() -> Vec<String> {
    to_strings(&["GlobalPIIMasker", "PIIMasker", "mask_pii"])
}

fn default_upload_symbols() -> Vec<String> {
    to_strings(&["validate_with_magika", "magika_validate", "MagikaValidator"])
}

fn default_logging_symbols() -> Vec<String> {
    to_strings(&["get_logger", "CentralizedLogger", "Logger.get"])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Files touched when an issue references data models
    #[serde(default = "default_model_globs")]
    pub model_globs: Vec<String>,
    /// Files touched when an issue references endpoints
    #[serde(default = "default_endpoint_globs")]
    pub endpoint_globs: Vec<String>,
    /// Line rule ids to skip
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            model_globs: default_model_globs(),
            endpoint_globs: default_endpoint_globs(),
            disabled_rules: Vec::new(),
        }
    }
}

fn default_model_globs() -> Vec<String> {
    to_strings(&["**/models.py"])
}

fn default_endpoint_globs() -> Vec<String> {
    to_strings(&["**/views.py", "**/urls.py", "**/serializers.py"])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsistencyConfig {
    #[serde(default = "default_source_glob")]
    pub pii_glob: String,
    #[serde(default = "default_upload_glob")]
    pub upload_glob: String,
    #[serde(default = "default_source_glob")]
    pub logging_glob: String,
    /// Path substrings that mark test code, skipped by every topic check
    #[serde(default = "default_test_markers")]
    pub test_markers: Vec<String>,
    /// Extra path substrings skipped by the logging check
    #[serde(default = "default_logging_exclusions")]
    pub logging_exclusions: Vec<String>,
    /// Files searched for documented endpoints
    #[serde(default = "default_route_globs")]
    pub route_globs: Vec<String>,
    /// Sources searched for names documented in feature code samples
    #[serde(default = "default_source_glob")]
    pub implementation_glob: String,
}

impl Default for ConsistencyConfig {
    fn default() -> Self {
        Self {
            pii_glob: default_source_glob(),
            upload_glob: default_upload_glob(),
            logging_glob: default_source_glob(),
            test_markers: default_test_markers(),
            logging_exclusions: default_logging_exclusions(),
            route_globs: default_route_globs(),
            implementation_glob: default_source_glob(),
        }
    }
}

fn default_source_glob() -> String {
    "**/*.py".to_string()
}

fn default_upload_glob() -> String {
    "**/views.py".to_string()
}

fn default_test_markers() -> Vec<String> {
    to_strings(&["test"])
}

fn default_logging_exclusions() -> Vec<String> {
    to_strings(&["migration"])
}

fn default_route_globs() -> Vec<String> {
    to_strings(&["**/urls.py"])
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default = "default_discrepancy_preview")]
    pub discrepancy_preview: usize,
    #[serde(default = "default_severity_preview")]
    pub severity_preview: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            discrepancy_preview: default_discrepancy_preview(),
            severity_preview: default_severity_preview(),
        }
    }
}

fn default_discrepancy_preview() -> usize {
    5
}

fn default_severity_preview() -> usize {
    2
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
