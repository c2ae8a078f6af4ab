use super::breaking::detect_breaking_changes;
use super::clarification::derive_questions;
use super::outcome::{
    BreakingChangeRequest, ClarificationRequest, DocFixRequest, PipelineOutcome, TriageChoice,
    TriageRequest,
};
use super::plan::assemble_plan;
use super::stage::{RunContext, Stage, StageKind};
use crate::aggregate::{Preview, SeverityBuckets};
use crate::config::PreflightConfig;
use crate::consistency::ConsistencyChecker;
use crate::core::Severity;
use crate::docs::{build_documentation_model, DocumentationModel};
use crate::errors::Result;
use crate::io::{DocumentationSource, FeatureDocument, SourceTree};
use crate::issue::{affected_files, IssueModel};
use crate::scanner::IssueScanner;
use serde::Serialize;
use tracing::{info, info_span};

/// Halts when documentation and code disagree.
pub struct ConsistencyStage;

impl Stage for ConsistencyStage {
    fn kind(&self) -> StageKind {
        StageKind::Consistency
    }

    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<Option<PipelineOutcome>> {
        let discrepancies = ConsistencyChecker::new(ctx.documentation, ctx.config)
            .check(ctx.tree, ctx.feature_documents)?;

        if discrepancies.is_empty() {
            return Ok(None);
        }

        Ok(Some(PipelineOutcome::NeedsDocFix(DocFixRequest {
            preview: Preview::of(&discrepancies, ctx.config.output.discrepancy_preview),
            discrepancies,
        })))
    }
}

/// Halts when the files the change touches already have problems.
pub struct TriageStage;

impl Stage for TriageStage {
    fn kind(&self) -> StageKind {
        StageKind::Triage
    }

    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<Option<PipelineOutcome>> {
        let files = affected_files(ctx.issue, ctx.tree, &ctx.config.scan)?;
        info!(files = files.len(), "Scanning affected files");

        let findings = IssueScanner::from_config(&ctx.config.scan).scan_files(ctx.tree, &files)?;
        if findings.is_empty() {
            return Ok(None);
        }

        let buckets: SeverityBuckets = findings.into_iter().collect();
        let limit = ctx.config.output.severity_preview;

        Ok(Some(PipelineOutcome::NeedsIssueTriage(TriageRequest {
            counts: buckets.counts(),
            critical: buckets.preview(Severity::Critical, limit),
            high: buckets.preview(Severity::High, limit),
            buckets,
            choices: TriageChoice::ALL.to_vec(),
        })))
    }
}

/// Halts when the documentation leaves a relevant question open.
pub struct ClarificationStage;

impl Stage for ClarificationStage {
    fn kind(&self) -> StageKind {
        StageKind::Clarification
    }

    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<Option<PipelineOutcome>> {
        let questions = derive_questions(ctx.issue, ctx.documentation);
        Ok((!questions.is_empty())
            .then(|| PipelineOutcome::NeedsClarification(ClarificationRequest { questions })))
    }
}

/// Halts when a proposed model already exists.
pub struct BreakingChangeStage;

impl Stage for BreakingChangeStage {
    fn kind(&self) -> StageKind {
        StageKind::BreakingChanges
    }

    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<Option<PipelineOutcome>> {
        let changes = detect_breaking_changes(ctx.issue, ctx.tree, &ctx.config.scan)?;
        Ok((!changes.is_empty()).then(|| {
            PipelineOutcome::NeedsBreakingChangeConfirmation(BreakingChangeRequest { changes })
        }))
    }
}

/// The halting gates, in [`STAGE_ORDER`](super::STAGE_ORDER) without the final approval.
pub fn gates() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(ConsistencyStage),
        Box::new(TriageStage),
        Box::new(ClarificationStage),
        Box::new(BreakingChangeStage),
    ]
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineRun {
    pub halted_at: StageKind,
    pub outcome: PipelineOutcome,
    pub issue: IssueModel,
    pub documentation: DocumentationModel,
    pub feature_documents: Vec<FeatureDocument>,
}

pub struct Pipeline<'a> {
    config: &'a PreflightConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a PreflightConfig) -> Self {
        Self { config }
    }

    /// Run every stage in order and stop at the first one that halts.
    ///
    /// Only I/O failures are errors; every analysis result is an outcome.
    pub fn run<P>(&self, project: &P, issue_text: &str) -> Result<PipelineRun>
    where
        P: DocumentationSource + SourceTree,
    {
        let issue = IssueModel::parse(issue_text);
        let number = issue.number.as_deref().unwrap_or("none");
        let span = info_span!("pipeline", issue = number);
        let _guard = span.enter();

        let documentation = build_documentation_model(project, self.config)?;

        let mut feature_documents = Vec::new();
        for feature in issue.feature_names(&documentation.feature_directories) {
            let documents = project.feature_documents(&self.config.docs.root, &feature)?;
            if !documents.is_empty() {
                info!(%feature, documents = documents.len(), "Reading feature docs");
            }
            feature_documents.extend(documents);
        }

        let (halted_at, outcome) = {
            let ctx = RunContext {
                config: self.config,
                documentation: &documentation,
                issue: &issue,
                feature_documents: &feature_documents,
                tree: project,
            };
            self.evaluate(&ctx)?
        };

        info!(stage = %halted_at, status = outcome.status(), "Pipeline halted");

        Ok(PipelineRun {
            halted_at,
            outcome,
            issue,
            documentation,
            feature_documents,
        })
    }

    fn evaluate(&self, ctx: &RunContext<'_>) -> Result<(StageKind, PipelineOutcome)> {
        for stage in gates() {
            let _span = info_span!("stage", name = stage.name()).entered();
            if let Some(outcome) = stage.evaluate(ctx)? {
                return Ok((stage.kind(), outcome));
            }
        }

        let plan = assemble_plan(ctx.issue, ctx.documentation, ctx.feature_documents);
        Ok((StageKind::Approval, PipelineOutcome::ReadyForApproval(plan)))
    }
}
