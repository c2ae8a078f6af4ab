//! The closed set of results a run can end with.

use crate::aggregate::{Preview, SeverityBuckets, SeverityCounts};
use crate::core::{Discrepancy, Finding};
use crate::docs::Topic;
use crate::issue::Endpoint;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineOutcome {
    NeedsDocFix(DocFixRequest),
    NeedsIssueTriage(TriageRequest),
    NeedsClarification(ClarificationRequest),
    NeedsBreakingChangeConfirmation(BreakingChangeRequest),
    ReadyForApproval(Plan),
}

impl PipelineOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            Self::NeedsDocFix(_) => "needs_doc_fix",
            Self::NeedsIssueTriage(_) => "needs_issue_triage",
            Self::NeedsClarification(_) => "needs_clarification",
            Self::NeedsBreakingChangeConfirmation(_) => "needs_breaking_change_confirmation",
            Self::ReadyForApproval(_) => "ready_for_approval",
        }
    }

    pub fn is_approval(&self) -> bool {
        matches!(self, Self::ReadyForApproval(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocFixRequest {
    pub preview: Preview<Discrepancy>,
    pub discrepancies: Vec<Discrepancy>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriageRequest {
    pub counts: SeverityCounts,
    pub critical: Preview<Finding>,
    pub high: Preview<Finding>,
    pub buckets: SeverityBuckets,
    pub choices: Vec<TriageChoice>,
}

/// How to deal with problems that predate the change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriageChoice {
    FixCriticalFlagRest,
    OpenSeparateIssues,
    FlagAllInPr,
    IgnoreForNow,
    DecidePerSeverity,
}

impl TriageChoice {
    pub const ALL: [TriageChoice; 5] = [
        TriageChoice::FixCriticalFlagRest,
        TriageChoice::OpenSeparateIssues,
        TriageChoice::FlagAllInPr,
        TriageChoice::IgnoreForNow,
        TriageChoice::DecidePerSeverity,
    ];

    /// 1-based menu position.
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|choice| choice == self)
            .map_or(0, |index| index + 1)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FixCriticalFlagRest => "Fix critical issues now, flag others in PR",
            Self::OpenSeparateIssues => "Create separate issues for all findings",
            Self::FlagAllInPr => "Flag all in PR comments for later",
            Self::IgnoreForNow => "Ignore for now (not recommended for critical issues)",
            Self::DecidePerSeverity => "Handle each severity level differently",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTopic {
    IssueNumber,
    Pii,
    Upload,
    Logging,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClarificationQuestion {
    pub topic: QuestionTopic,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClarificationRequest {
    pub questions: Vec<ClarificationQuestion>,
}

/// A model the issue proposes that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakingChange {
    pub entity: String,
    pub file: PathBuf,
}

impl std::fmt::Display for BreakingChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Model '{}' already exists in {}",
            self.entity,
            self.file.display()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakingChangeRequest {
    pub changes: Vec<BreakingChange>,
}

/// The documented helper a plan commits to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyUsage {
    pub topic: Topic,
    pub symbol: String,
    pub import_origin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub issue_number: String,
    pub has_pii: bool,
    pub features: Vec<String>,
    pub feature_document_count: usize,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_format: Option<String>,
    pub requirements: Vec<String>,
    pub endpoints: Vec<Endpoint>,
    pub models: Vec<String>,
    pub policies: Vec<PolicyUsage>,
    pub steps: Vec<String>,
    pub exclusions: Vec<String>,
    pub documentation_gaps: Vec<String>,
}

impl Plan {
    pub fn policy(&self, topic: Topic) -> Option<&PolicyUsage> {
        self.policies.iter().find(|p| p.topic == topic)
    }
}
