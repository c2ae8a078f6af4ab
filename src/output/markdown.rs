//! Markdown rendering of an approved plan.

use crate::docs::Topic;
use crate::pipeline::Plan;

const APPROVAL_PROMPT: &str =
    "This plan is validated against your documentation. Proceed? (yes/no)";

fn section_title(topic: Topic) -> (&'static str, &'static str) {
    match topic {
        Topic::PiiMasking => ("PII Handling", "Mask email, phone and SSN fields"),
        Topic::UploadValidation => ("File Validation", "Validate all uploads before processing"),
        Topic::CentralizedLogging => ("Logging", "No print statements, only centralized logging"),
    }
}

pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    out.push_str("# Implementation Plan (Validated Against Documentation)\n\n");

    out.push_str("## Issue Details\n");
    out.push_str(&format!("- Number: #{}\n", plan.issue_number));
    out.push_str(&format!("- Branch: `{}`\n", plan.branch));
    if let Some(format) = &plan.commit_format {
        out.push_str(&format!("- Commit format: `{format}`\n"));
    }
    let pii = if plan.has_pii { "Yes" } else { "No" };
    out.push_str(&format!("- Has PII: {pii}\n"));

    if !plan.requirements.is_empty() {
        out.push_str("\n## Requirements\n");
        for requirement in &plan.requirements {
            out.push_str(&format!("- {requirement}\n"));
        }
    }

    if !plan.endpoints.is_empty() || !plan.models.is_empty() {
        out.push_str("\n## Scope\n");
        for endpoint in &plan.endpoints {
            out.push_str(&format!("- Endpoint: `{endpoint}`\n"));
        }
        for model in &plan.models {
            out.push_str(&format!("- Model: `{model}`\n"));
        }
    }

    out.push_str("\n## Documentation Validation Status\n");
    if plan.features.is_empty() {
        out.push_str("- No feature documentation matched this issue\n");
    } else {
        out.push_str(&format!(
            "- Read {} feature documents ({})\n",
            plan.feature_document_count,
            plan.features.join(", ")
        ));
    }
    out.push_str("- Validated against existing code\n");
    out.push_str("- Checked for unrelated issues\n");

    for policy in &plan.policies {
        let (title, rule) = section_title(policy.topic);
        out.push_str(&format!("\n## {title} (Per Documentation)\n"));
        out.push_str(&format!("- Will use: {}\n", policy.symbol));
        out.push_str(&format!("- Import from: {}\n", policy.import_origin));
        out.push_str(&format!("- {rule}\n"));
    }

    if !plan.documentation_gaps.is_empty() {
        out.push_str("\n## Documentation Gaps\n");
        for gap in &plan.documentation_gaps {
            out.push_str(&format!("- {gap}\n"));
        }
    }

    out.push_str("\n## Implementation Steps\n");
    for (index, step) in plan.steps.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, step));
    }

    out.push_str("\n## What I Will NOT Do\n");
    for exclusion in &plan.exclusions {
        out.push_str(&format!("- {exclusion}\n"));
    }

    out.push_str(&format!("\n**{APPROVAL_PROMPT}**\n"));
    out
}
