//! Typed model of the project's documentation.
//!
//! Each documented policy area ("topic") either yields a [`TopicConfig`]
//! naming the helper the code must use, or is absent. Absent is not the same
//! as empty: a topic without a usable document never raises a discrepancy,
//! it becomes a clarification question instead.

mod builder;
pub mod parse;

pub use builder::build_documentation_model;

use crate::errors::PreflightError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    PiiMasking,
    UploadValidation,
    CentralizedLogging,
}

impl Topic {
    pub const ALL: [Topic; 3] = [
        Topic::PiiMasking,
        Topic::UploadValidation,
        Topic::CentralizedLogging,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::PiiMasking => "pii-masking",
            Self::UploadValidation => "upload-validation",
            Self::CentralizedLogging => "centralized-logging",
        }
    }

    pub fn usage_rule_id(&self) -> &'static str {
        match self {
            Self::PiiMasking => "pii-masking-usage",
            Self::UploadValidation => "upload-validation-usage",
            Self::CentralizedLogging => "centralized-logging-usage",
        }
    }

    /// Import origin assumed when the document does not name one.
    pub fn default_import_origin(&self) -> &'static str {
        match self {
            Self::PiiMasking => "utils.pii",
            Self::UploadValidation => "utils.validation",
            Self::CentralizedLogging => "utils.logging",
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicabilityFlag {
    Email,
    Phone,
    Ssn,
    Uploads,
    Attachments,
    DebugLevel,
    AuditLogging,
}

/// A documented policy: the helper every relevant file must use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicConfig {
    pub required_symbol: String,
    pub import_origin: Option<String>,
    pub flags: BTreeSet<ApplicabilityFlag>,
}

impl TopicConfig {
    pub fn applies_to(&self, flag: ApplicabilityFlag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowPolicy {
    /// First documented branch example, e.g. `feature/123-add-export`.
    pub branch_pattern: Option<String>,
    /// First documented commit format line, e.g. `[ISSUE-123] Short summary`.
    pub commit_format: Option<String>,
    pub allows_pr_flags: bool,
}

impl WorkflowPolicy {
    /// Branch prefix (`feature`, `bugfix` or `hotfix`) from the documented pattern.
    pub fn branch_prefix(&self) -> Option<&str> {
        self.branch_pattern
            .as_deref()
            .and_then(|pattern| pattern.split('/').next())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectProfile {
    pub framework_version: Option<String>,
    pub database: Option<String>,
    pub has_rest_framework: bool,
    pub mentions_global_pii_masking: bool,
    pub mentions_magika: bool,
    pub mentions_centralized_logging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum DocProblem {
    Missing,
    Malformed { message: String },
}

/// A documentation input that could not be used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocDiagnostic {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(flatten)]
    pub problem: DocProblem,
}

impl DocDiagnostic {
    pub fn to_error(&self) -> PreflightError {
        match &self.problem {
            DocProblem::Missing => PreflightError::missing_input(&self.path),
            DocProblem::Malformed { message } => PreflightError::malformed(&self.path, message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentationModel {
    pub project: Option<ProjectProfile>,
    pub dependencies: BTreeMap<String, String>,
    pub workflow: Option<WorkflowPolicy>,
    /// Topics whose document names a usable helper.
    pub topics: BTreeMap<Topic, TopicConfig>,
    /// Where each topic's document is expected.
    pub topic_documents: BTreeMap<Topic, PathBuf>,
    /// Documented log format string, if the logging document gives one.
    pub log_format: Option<String>,
    /// Documentation subdirectories, candidates for feature documentation.
    pub feature_directories: Vec<String>,
    pub diagnostics: Vec<DocDiagnostic>,
}

impl DocumentationModel {
    pub fn topic(&self, topic: Topic) -> Option<&TopicConfig> {
        self.topics.get(&topic)
    }

    pub fn topic_document(&self, topic: Topic) -> PathBuf {
        self.topic_documents
            .get(&topic)
            .cloned()
            .unwrap_or_default()
    }

    /// Why a topic has no policy, if it has none.
    pub fn topic_problem(&self, topic: Topic) -> Option<&DocProblem> {
        if self.topics.contains_key(&topic) {
            return None;
        }
        self.diagnostics
            .iter()
            .find(|d| d.topic == Some(topic))
            .map(|d| &d.problem)
    }

    /// Diagnostics not tied to a topic: missing project file, workflow, manifest.
    pub fn general_gaps(&self) -> impl Iterator<Item = &DocDiagnostic> {
        self.diagnostics.iter().filter(|d| d.topic.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_keys() {
        let keys: Vec<_> = Topic::ALL.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            vec!["pii-masking", "upload-validation", "centralized-logging"]
        );
    }

    #[test]
    fn test_branch_prefix() {
        let workflow = WorkflowPolicy {
            branch_pattern: Some("hotfix/123-fix".to_string()),
            ..Default::default()
        };
        assert_eq!(workflow.branch_prefix(), Some("hotfix"));
        assert_eq!(WorkflowPolicy::default().branch_prefix(), None);
    }

    #[test]
    fn test_topic_problem_is_none_for_documented_topic() {
        let mut model = DocumentationModel::default();
        model.diagnostics.push(DocDiagnostic {
            path: PathBuf::from("docs/security/pii_masking.md"),
            topic: Some(Topic::PiiMasking),
            problem: DocProblem::Missing,
        });
        assert_eq!(
            model.topic_problem(Topic::PiiMasking),
            Some(&DocProblem::Missing)
        );

        model.topics.insert(
            Topic::PiiMasking,
            TopicConfig {
                required_symbol: "mask_pii".to_string(),
                import_origin: None,
                flags: BTreeSet::new(),
            },
        );
        assert_eq!(model.topic_problem(Topic::PiiMasking), None);
    }

    #[test]
    fn test_diagnostic_maps_to_degradable_error() {
        let diagnostic = DocDiagnostic {
            path: PathBuf::from("docs/validation/magika.md"),
            topic: Some(Topic::UploadValidation),
            problem: DocProblem::Malformed {
                message: "names none of: validate_with_magika".to_string(),
            },
        };
        let err = diagnostic.to_error();
        assert!(!err.is_fatal());
        assert_eq!(
            err.to_string(),
            "Malformed document docs/validation/magika.md: names none of: validate_with_magika"
        );
    }
}
