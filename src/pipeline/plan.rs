use super::outcome::{Plan, PolicyUsage};
use crate::docs::{DocProblem, DocumentationModel, Topic};
use crate::io::FeatureDocument;
use crate::issue::IssueModel;
use std::collections::BTreeSet;

const DEFAULT_BRANCH_PREFIX: &str = "feature";

const EXCLUSIONS: [&str; 5] = [
    "Ignore documentation requirements",
    "Use print statements instead of logging",
    "Skip PII masking",
    "Allow unvalidated file uploads",
    "Leave critical issues unflagged",
];

pub fn branch_name(issue: &IssueModel, documentation: &DocumentationModel) -> String {
    let prefix = documentation
        .workflow
        .as_ref()
        .and_then(|w| w.branch_prefix())
        .unwrap_or(DEFAULT_BRANCH_PREFIX);
    let number = issue.number.as_deref().unwrap_or("TBD");
    format!("{}/{}-{}", prefix, number, issue.slug())
}

fn policy_usage(documentation: &DocumentationModel, topic: Topic) -> Option<PolicyUsage> {
    documentation.topic(topic).map(|config| PolicyUsage {
        topic,
        symbol: config.required_symbol.clone(),
        import_origin: config
            .import_origin
            .clone()
            .unwrap_or_else(|| topic.default_import_origin().to_string()),
    })
}

fn implementation_steps(branch: &str, policies: &[PolicyUsage]) -> Vec<String> {
    let mut steps = vec![
        format!("Create branch {branch} per workflow"),
        "Implement with documentation compliance".to_string(),
    ];
    for policy in policies {
        steps.push(match policy.topic {
            Topic::PiiMasking => format!("Mask personal data with {}", policy.symbol),
            Topic::UploadValidation => format!("Validate every upload with {}", policy.symbol),
            Topic::CentralizedLogging => format!("Log through {}", policy.symbol),
        });
    }
    steps.extend(
        [
            "Generate tests (>85% coverage)",
            "Flag any unrelated issues in PR",
            "Update the feature documentation",
        ]
        .map(String::from),
    );
    steps
}

fn documentation_gaps(documentation: &DocumentationModel) -> Vec<String> {
    documentation
        .general_gaps()
        .map(|gap| match &gap.problem {
            DocProblem::Missing => format!("{} is missing", gap.path.display()),
            DocProblem::Malformed { message } => {
                format!("{} could not be read: {}", gap.path.display(), message)
            }
        })
        .collect()
}

/// Assemble the plan. Pure: equal inputs give equal plans.
pub fn assemble_plan(
    issue: &IssueModel,
    documentation: &DocumentationModel,
    feature_documents: &[FeatureDocument],
) -> Plan {
    let branch = branch_name(issue, documentation);

    let relevant = [
        (Topic::PiiMasking, issue.has_pii),
        (Topic::UploadValidation, issue.mentions_upload),
        (Topic::CentralizedLogging, true),
    ];
    let policies: Vec<PolicyUsage> = relevant
        .into_iter()
        .filter(|(_, relevant)| *relevant)
        .filter_map(|(topic, _)| policy_usage(documentation, topic))
        .collect();

    let features: BTreeSet<String> = feature_documents
        .iter()
        .map(|doc| doc.feature.clone())
        .collect();

    Plan {
        issue_number: issue.number.clone().unwrap_or_else(|| "TBD".to_string()),
        has_pii: issue.has_pii,
        features: features.into_iter().collect(),
        feature_document_count: feature_documents.len(),
        steps: implementation_steps(&branch, &policies),
        branch,
        commit_format: documentation
            .workflow
            .as_ref()
            .and_then(|w| w.commit_format.clone()),
        requirements: issue.requirements.clone(),
        endpoints: issue.endpoints.clone(),
        models: issue.models.clone(),
        policies,
        exclusions: EXCLUSIONS.map(String::from).to_vec(),
        documentation_gaps: documentation_gaps(documentation),
    }
}
