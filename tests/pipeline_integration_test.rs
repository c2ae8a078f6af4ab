mod common;

use common::ProjectFixture;
use indoc::indoc;
use pretty_assertions::assert_eq;
use preflight::config::PreflightConfig;
use preflight::core::{FindingKind, Severity};
use preflight::docs::Topic;
use preflight::io::MemoryProject;
use preflight::pipeline::{Pipeline, PipelineOutcome, PipelineRun, QuestionTopic, StageKind};
use preflight::scanner::IssueScanner;
use std::path::PathBuf;

const EXPORT_ISSUE: &str = "Add endpoint POST /users/{id}/export - exports personal data, #42";

fn run(fixture: &ProjectFixture, issue: &str) -> PipelineRun {
    let config = PreflightConfig::default();
    Pipeline::new(&config)
        .run(&fixture.project(), issue)
        .expect("pipeline run")
}

#[test]
fn test_undocumented_pii_falls_through_to_clarification() {
    let views = "def export(request, id):\n    return None\n";
    let fixture = ProjectFixture::new().with_file("app/views.py", views);

    let run = run(&fixture, EXPORT_ISSUE);

    assert_eq!(run.issue.number.as_deref(), Some("42"));
    assert!(run.issue.has_pii);
    assert_eq!(run.halted_at, StageKind::Clarification);

    let PipelineOutcome::NeedsClarification(request) = &run.outcome else {
        panic!("expected clarification, got {}", run.outcome.status());
    };
    let topics: Vec<_> = request.questions.iter().map(|q| q.topic).collect();
    assert_eq!(topics, vec![QuestionTopic::Pii, QuestionTopic::Logging]);
    assert_eq!(
        request.questions[0].text,
        "How should PII be handled? I didn't find PII masking docs at docs/security/pii_masking.md."
    );
}

#[test]
fn test_discrepancies_outrank_findings() {
    let views = indoc! {r#"
        def export(request, uid):
            email = request.user.email
            query = "SELECT * FROM users WHERE id=%s".format(uid)
    "#};
    let fixture = ProjectFixture::documented().with_file("app/views.py", views);

    let findings = IssueScanner::default()
        .scan_files(&fixture.project(), &[PathBuf::from("app/views.py")])
        .unwrap();
    assert!(!findings.is_empty());

    let run = run(&fixture, EXPORT_ISSUE);
    assert_eq!(run.halted_at, StageKind::Consistency);
    let PipelineOutcome::NeedsDocFix(request) = &run.outcome else {
        panic!("expected doc fix, got {}", run.outcome.status());
    };
    assert_eq!(request.discrepancies.len(), 1);
    assert_eq!(
        request.discrepancies[0].file,
        Some(PathBuf::from("app/views.py"))
    );
    assert_eq!(
        request.discrepancies[0].suggestion,
        "Add: from utils.pii import GlobalPIIMasker"
    );
}

#[test]
fn test_consistent_docs_move_on_to_triage() {
    let views = indoc! {r#"
        from utils.pii import GlobalPIIMasker

        def export(request, uid):
            query = "SELECT * FROM users WHERE id=%s".format(uid)
            password = "hunter2"
            rows = Export.objects.all()
    "#};
    let fixture = ProjectFixture::documented().with_file("app/views.py", views);

    let run = run(&fixture, EXPORT_ISSUE);
    assert_eq!(run.halted_at, StageKind::Triage);
    let PipelineOutcome::NeedsIssueTriage(request) = &run.outcome else {
        panic!("expected triage, got {}", run.outcome.status());
    };

    assert_eq!(request.counts.critical, 2);
    assert_eq!(request.counts.low, 1);
    assert_eq!(request.choices.len(), 5);

    let sql = &request.critical.shown[0];
    assert_eq!(sql.kind, FindingKind::Security);
    assert_eq!(sql.severity, Severity::Critical);
    assert_eq!(sql.line, 4);
    assert_eq!(request.critical.shown[1].line, 5);
    assert_eq!(request.critical.remaining, 0);
    assert!(request.high.is_empty());
}

#[test]
fn test_existing_model_needs_confirmation() {
    let models = indoc! {r#"
        from django.db import models

        class Invoice(models.Model):
            total = models.IntegerField()
    "#};
    let fixture = ProjectFixture::documented().with_file("shop/models.py", models);

    let run = run(&fixture, "Add model Invoice for billing #7");
    assert_eq!(run.issue.models, vec!["Invoice".to_string()]);

    let PipelineOutcome::NeedsBreakingChangeConfirmation(request) = &run.outcome else {
        panic!("expected breaking change, got {}", run.outcome.status());
    };
    assert_eq!(request.changes.len(), 1);
    assert_eq!(
        request.changes[0].to_string(),
        "Model 'Invoice' already exists in shop/models.py"
    );
}

#[test]
fn test_clean_project_is_ready_for_approval() {
    let fixture = ProjectFixture::documented().with_file(
        "shop/models.py",
        "class Invoice(models.Model):\n    total = 1\n",
    );

    let run = run(
        &fixture,
        "Add model Receipt #8\n- store receipt totals\n- keep history",
    );
    assert_eq!(run.halted_at, StageKind::Approval);
    let PipelineOutcome::ReadyForApproval(plan) = &run.outcome else {
        panic!("expected approval, got {}", run.outcome.status());
    };

    assert_eq!(plan.issue_number, "8");
    assert_eq!(plan.branch, "feature/8-add-model-receipt");
    assert_eq!(
        plan.commit_format.as_deref(),
        Some("[ISSUE-123] Short summary")
    );
    assert_eq!(
        plan.requirements,
        vec![
            "store receipt totals".to_string(),
            "keep history".to_string(),
        ]
    );
    let topics: Vec<_> = plan.policies.iter().map(|p| p.topic).collect();
    assert_eq!(topics, vec![Topic::CentralizedLogging]);
    assert_eq!(plan.policies[0].import_origin, "core.log");
    assert!(plan.documentation_gaps.is_empty());
}

#[test]
fn test_documented_endpoint_must_be_routed() {
    let api_doc = indoc! {r#"
        # User API

        POST /users/{id}/export returns a CSV.
    "#};
    let fixture = ProjectFixture::documented()
        .with_file("docs/user/api.md", api_doc)
        .with_file("app/urls.py", "urlpatterns = [path('users/<id>/', show)]\n");

    let run = run(&fixture, EXPORT_ISSUE);
    let PipelineOutcome::NeedsDocFix(request) = &run.outcome else {
        panic!("expected doc fix, got {}", run.outcome.status());
    };
    assert_eq!(run.feature_documents.len(), 1);
    assert_eq!(
        request.discrepancies[0].doc_statement,
        "api documents endpoint POST /users/{id}/export"
    );
    assert_eq!(
        request.discrepancies[0].observed,
        "`export` is not routed in any routing file"
    );
}

#[test]
fn test_runs_are_idempotent() {
    let views = "def export(request):\n    return request.user.email\n";
    let fixture = ProjectFixture::documented()
        .with_file("app/views.py", views)
        .with_file("app/tasks.py", "print('done')\n");

    let first = run(&fixture, EXPORT_ISSUE);
    let second = run(&fixture, EXPORT_ISSUE);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first.outcome).unwrap(),
        serde_json::to_string(&second.outcome).unwrap()
    );
}

#[test]
fn test_latin1_source_does_not_abort_the_run() {
    let fixture = ProjectFixture::new()
        .with_file("docs/infrastructure/logging.md", common::LOGGING_DOC)
        .with_file("app/legacy.py", b"# caf\xe9\nx = 1\n");

    let run = run(&fixture, "#5 tidy views");
    assert_eq!(run.issue.number.as_deref(), Some("5"));
    assert!(!matches!(run.outcome, PipelineOutcome::NeedsDocFix(_)));
}

#[test]
fn test_unreadable_source_is_fatal() {
    let project = MemoryProject::new()
        .with_file("docs/security/pii_masking.md", common::PII_DOC)
        .with_unreadable("app/views.py");
    let config = PreflightConfig::default();

    let err = Pipeline::new(&config)
        .run(&project, EXPORT_ISSUE)
        .unwrap_err();
    assert!(err.is_fatal());
}
