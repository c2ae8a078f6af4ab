use super::markdown::render_plan;
use crate::aggregate::{Preview, SeverityBuckets, SeverityCounts};
use crate::core::{Finding, Severity};
use crate::formatting::OutputFormatter;
use crate::pipeline::{
    BreakingChangeRequest, ClarificationRequest, DocFixRequest, PipelineOutcome, PipelineRun,
    TriageRequest,
};
use comfy_table::{presets, Cell, Table};

pub fn format_run(run: &PipelineRun, formatter: &dyn OutputFormatter, plain: bool) -> String {
    let mut out = String::new();
    let stage = formatter.dim(&format!("[{}]", run.halted_at));

    match &run.outcome {
        PipelineOutcome::NeedsDocFix(request) => {
            out.push_str(&format!(
                "{} {}\n",
                stage,
                formatter.warning("I found discrepancies between documentation and actual code:")
            ));
            format_doc_fix(&mut out, request, formatter);
        }
        PipelineOutcome::NeedsIssueTriage(request) => {
            out.push_str(&format!(
                "{} {}\n",
                stage,
                formatter.warning("I found unrelated issues while reviewing the code:")
            ));
            format_triage(&mut out, request, formatter, plain);
        }
        PipelineOutcome::NeedsClarification(request) => {
            out.push_str(&format!(
                "{} {}\n",
                stage,
                formatter.header("Before planning I need a few answers:")
            ));
            format_clarification(&mut out, request);
        }
        PipelineOutcome::NeedsBreakingChangeConfirmation(request) => {
            out.push_str(&format!(
                "{} {}\n",
                stage,
                formatter.warning("This change may break existing code:")
            ));
            format_breaking(&mut out, request, formatter);
        }
        PipelineOutcome::ReadyForApproval(plan) => {
            let ready = formatter.emoji("✅ Ready for approval", "[OK] Ready for approval");
            out.push_str(&format!("{} {}\n\n", stage, formatter.success(&ready)));
            out.push_str(&render_plan(plan));
        }
    }

    out
}

fn format_doc_fix(out: &mut String, request: &DocFixRequest, formatter: &dyn OutputFormatter) {
    for (index, discrepancy) in request.preview.shown.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. {} {}\n",
            index + 1,
            formatter.bold("Documentation says:"),
            discrepancy.doc_statement
        ));
        out.push_str(&format!("   But I found: {}\n", discrepancy.observed));
        out.push_str(&format!("   Should I: {}?\n", discrepancy.suggestion));
    }
    push_remaining(out, &request.preview, "discrepancies", formatter);
    out.push_str("\nHow should I handle these? Fix them, or follow the existing code?\n");
}

fn format_triage(
    out: &mut String,
    request: &TriageRequest,
    formatter: &dyn OutputFormatter,
    plain: bool,
) {
    out.push('\n');
    out.push_str(&severity_table(&request.counts, plain).to_string());
    out.push('\n');

    for (severity, preview) in [
        (Severity::Critical, &request.critical),
        (Severity::High, &request.high),
    ] {
        if preview.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{}\n", formatter.severity_badge(severity)));
        for finding in &preview.shown {
            out.push_str(&format!("  - {finding}\n"));
        }
        push_remaining(out, preview, "findings", formatter);
    }

    out.push_str("\nHow should I handle these?\n");
    for choice in &request.choices {
        out.push_str(&format!("  {}. {}\n", choice.number(), choice.label()));
    }
}

fn format_clarification(out: &mut String, request: &ClarificationRequest) {
    for (index, question) in request.questions.iter().enumerate() {
        out.push_str(&format!("\n{}. {}\n", index + 1, question.text));
    }
}

fn format_breaking(
    out: &mut String,
    request: &BreakingChangeRequest,
    formatter: &dyn OutputFormatter,
) {
    for change in &request.changes {
        let line = formatter.emoji(&format!("⚠️  {change}"), &change.to_string());
        out.push_str(&format!("  - {line}\n"));
    }
    out.push_str("\nProceed anyway? (yes/no)\n");
}

fn push_remaining<T>(
    out: &mut String,
    preview: &Preview<T>,
    noun: &str,
    formatter: &dyn OutputFormatter,
) {
    if preview.remaining > 0 {
        out.push_str(&format!(
            "{}\n",
            formatter.dim(&format!("...and {} more {}", preview.remaining, noun))
        ));
    }
}

/// Count per severity, most severe first.
pub fn severity_table(counts: &SeverityCounts, plain: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(if plain {
            presets::ASCII_FULL
        } else {
            presets::UTF8_FULL
        })
        .set_header(vec!["Severity", "Count"]);

    for severity in Severity::DESCENDING {
        table.add_row(vec![
            Cell::new(severity.to_string().to_uppercase()),
            Cell::new(counts.get(severity)),
        ]);
    }
    table
}

/// Findings of a plain scan, grouped by severity.
pub fn format_findings(
    findings: &[Finding],
    formatter: &dyn OutputFormatter,
    plain: bool,
) -> String {
    if findings.is_empty() {
        return format!(
            "{}\n",
            formatter.success(&formatter.emoji("✅ No findings", "[OK] No findings"))
        );
    }

    let buckets: SeverityBuckets = findings.iter().cloned().collect();
    let mut out = String::new();

    for severity in Severity::DESCENDING {
        let bucket = buckets.bucket(severity);
        if bucket.is_empty() {
            continue;
        }
        out.push_str(&format!("{}\n", formatter.severity_badge(severity)));
        for finding in bucket {
            out.push_str(&format!(
                "  - {} {}\n",
                finding,
                formatter.dim(&format!("({})", finding.rule))
            ));
        }
        out.push('\n');
    }

    let counts = buckets.counts();
    out.push_str(&severity_table(&counts, plain).to_string());
    out.push_str(&format!("\n{}\n", formatter.bold(&counts.to_string())));
    out
}
