//! Pipeline stage abstractions.
//!
//! The controller runs a fixed list of gates. Each gate either lets the run
//! continue (`Ok(None)`) or halts it with an outcome (`Ok(Some(..))`). The
//! approval stage comes last and always produces an outcome, so it is not a
//! gate.

use super::outcome::PipelineOutcome;
use crate::config::PreflightConfig;
use crate::docs::DocumentationModel;
use crate::errors::Result;
use crate::io::{FeatureDocument, SourceTree};
use crate::issue::IssueModel;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Consistency,
    Triage,
    Clarification,
    BreakingChanges,
    Approval,
}

/// Evaluation order. Earlier stages outrank later ones.
pub const STAGE_ORDER: [StageKind; 5] = [
    StageKind::Consistency,
    StageKind::Triage,
    StageKind::Clarification,
    StageKind::BreakingChanges,
    StageKind::Approval,
];

impl StageKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Consistency => "documentation consistency",
            Self::Triage => "unrelated issue scan",
            Self::Clarification => "clarification",
            Self::BreakingChanges => "breaking changes",
            Self::Approval => "plan approval",
        }
    }
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a stage may look at. Built once per run, never mutated.
pub struct RunContext<'a> {
    pub config: &'a PreflightConfig,
    pub documentation: &'a DocumentationModel,
    pub issue: &'a IssueModel,
    pub feature_documents: &'a [FeatureDocument],
    pub tree: &'a dyn SourceTree,
}

/// A halting checkpoint.
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// `Ok(None)` lets the run fall through to the next stage.
    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<Option<PipelineOutcome>>;

    fn name(&self) -> &str {
        self.kind().name()
    }
}
