//! Value types shared by the scanner, the consistency checker and the pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most severe first.
    pub const DESCENDING: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(Severity, &str)] = &[
            (Severity::Low, "low"),
            (Severity::Medium, "medium"),
            (Severity::High, "high"),
            (Severity::Critical, "critical"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(s, _)| s == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown");

        write!(f, "{display_str}")
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    Todo,
    Deprecated,
    Security,
    Bug,
    Performance,
    Documentation,
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(FindingKind, &str)] = &[
            (FindingKind::Todo, "TODO"),
            (FindingKind::Deprecated, "DEPRECATED"),
            (FindingKind::Security, "SECURITY"),
            (FindingKind::Bug, "BUG"),
            (FindingKind::Performance, "PERFORMANCE"),
            (FindingKind::Documentation, "DOCUMENTATION"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(k, _)| k == self)
            .map(|(_, s)| *s)
            .unwrap_or("UNKNOWN");

        write!(f, "{display_str}")
    }
}

/// A code-pattern concern located at a single line.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    /// Path relative to the project root.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub description: String,
    /// Id of the rule that produced this finding.
    pub rule: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} - {}",
            self.file.display(),
            self.line,
            self.description
        )
    }
}

/// A mismatch between what documentation claims and what the source shows.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Discrepancy {
    /// Documentation file the claim comes from.
    pub doc_file: PathBuf,
    /// The claim, restated.
    pub doc_statement: String,
    /// What was actually observed in the source.
    pub observed: String,
    pub suggestion: String,
    /// Source file the observation was made in, if a single file is to blame.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
