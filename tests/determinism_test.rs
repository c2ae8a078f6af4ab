//! Property tests: identical inputs always produce identical models and outcomes.

use preflight::config::PreflightConfig;
use preflight::docs::build_documentation_model;
use preflight::io::MemoryProject;
use preflight::issue::IssueModel;
use preflight::pipeline::Pipeline;
use preflight::scanner::IssueScanner;
use proptest::prelude::*;
use std::path::Path;

fn issue_fragment() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "Add model Invoice",
        "POST /users/{id}/export",
        "exports personal data",
        "#42",
        "issue 17",
        "\n- upload receipts",
        "\n- email the user",
        "login required",
        "Payment model",
        "GET /api/reports",
    ])
    .prop_map(str::to_string)
}

fn issue_text() -> impl Strategy<Value = String> {
    prop::collection::vec(issue_fragment(), 0..6).prop_map(|parts| parts.join(" "))
}

fn source_line() -> impl Strategy<Value = String> {
    prop::sample::select(vec![
        "query = \"SELECT * FROM users WHERE id=%s\".format(uid)",
        "password = \"hunter2\"",
        "password = os.getenv('DB_PASSWORD')",
        "email = user.email",
        "print(report)",
        "# TODO: paginate",
        "except:",
        "rows = Order.objects.all()",
        "return None",
    ])
    .prop_map(str::to_string)
}

fn project(doc: &str, views: &[String]) -> MemoryProject {
    MemoryProject::new()
        .with_file("docs/security/pii_masking.md", doc)
        .with_file("docs/infrastructure/logging.md", "Use get_logger")
        .with_file("app/views.py", views.join("\n"))
        .with_file("app/models.py", "class Invoice(models.Model):\n    pass\n")
}

proptest! {
    #[test]
    fn issue_parsing_is_deterministic(text in issue_text()) {
        prop_assert_eq!(IssueModel::parse(&text), IssueModel::parse(&text));
    }

    #[test]
    fn documentation_model_is_deterministic(doc in "[ -~\n]{0,200}") {
        let project = MemoryProject::new().with_file("docs/security/pii_masking.md", doc.as_str());
        let config = PreflightConfig::default();
        prop_assert_eq!(
            build_documentation_model(&project, &config).unwrap(),
            build_documentation_model(&project, &config).unwrap()
        );
    }

    #[test]
    fn hardcoded_password_yields_one_critical_finding(prefix in source_line()) {
        prop_assume!(!prefix.contains("getenv"));
        let line = format!("{prefix}; password = \"s3cret\"");
        let findings = IssueScanner::default().scan_text(Path::new("app/settings.py"), &line);
        let critical: Vec<_> = findings
            .iter()
            .filter(|f| f.severity == preflight::core::Severity::Critical)
            .collect();
        prop_assert_eq!(critical.len(), 1);
        prop_assert_eq!(critical[0].kind, preflight::core::FindingKind::Security);
    }

    #[test]
    fn pipeline_outcome_is_idempotent(
        text in issue_text(),
        views in prop::collection::vec(source_line(), 0..8),
    ) {
        let project = project("Mask with GlobalPIIMasker", &views);
        let config = PreflightConfig::default();
        let pipeline = Pipeline::new(&config);

        let first = pipeline.run(&project, &text).unwrap();
        let second = pipeline.run(&project, &text).unwrap();
        prop_assert_eq!(first.outcome, second.outcome);
    }
}
