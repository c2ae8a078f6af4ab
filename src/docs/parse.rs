//! Pure parsers from document text to model fields.
//!
//! Matching is pattern based: the first recognised helper name wins, and
//! keyword presence decides applicability flags.

use super::{ApplicabilityFlag, ProjectProfile, Topic, TopicConfig, WorkflowPolicy};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

static FRAMEWORK_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Django\s*(\d[\d.]*)").unwrap());

static BRANCH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(feature|bugfix|hotfix)/\S+").unwrap());

static COMMIT_FORMAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[ISSUE[^\]]*\][^\n]+").unwrap());

static PII_IMPORT: Lazy<Regex> = Lazy::new(|| Regex::new(r"from\s+([\w.]+)\s+import").unwrap());

static UPLOAD_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)from\s+([\w.]+)\s+import.*magika").unwrap());

static LOGGING_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"from\s+([\w.]+)\s+import.*[Ll]ogger").unwrap());

static LOG_FORMAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"format["']?\s*[:=]\s*["']([^"']+)"#).unwrap());

/// Find the first mention of any candidate helper name.
pub fn find_symbol(content: &str, candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|candidate| content.find(candidate.as_str()).map(|pos| (pos, candidate)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, candidate)| candidate.clone())
}

fn first_capture(regex: &Regex, content: &str) -> Option<String> {
    regex
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn keyword_flags(
    lower: &str,
    table: &[(&[&str], ApplicabilityFlag)],
) -> BTreeSet<ApplicabilityFlag> {
    table
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, flag)| *flag)
        .collect()
}

/// Parse a topic document; `None` when it names none of the candidate helpers.
pub fn parse_topic(topic: Topic, content: &str, candidates: &[String]) -> Option<TopicConfig> {
    let required_symbol = find_symbol(content, candidates)?;
    let lower = content.to_lowercase();

    let (import, flags) = match topic {
        Topic::PiiMasking => (
            &*PII_IMPORT,
            keyword_flags(
                &lower,
                &[
                    (&["email"], ApplicabilityFlag::Email),
                    (&["phone"], ApplicabilityFlag::Phone),
                    (&["ssn", "social"], ApplicabilityFlag::Ssn),
                ],
            ),
        ),
        Topic::UploadValidation => (
            &*UPLOAD_IMPORT,
            keyword_flags(
                &lower,
                &[
                    (&["upload"], ApplicabilityFlag::Uploads),
                    (&["attachment"], ApplicabilityFlag::Attachments),
                ],
            ),
        ),
        Topic::CentralizedLogging => (
            &*LOGGING_IMPORT,
            keyword_flags(
                &lower,
                &[
                    (&["debug"], ApplicabilityFlag::DebugLevel),
                    (&["audit"], ApplicabilityFlag::AuditLogging),
                ],
            ),
        ),
    };

    Some(TopicConfig {
        required_symbol,
        import_origin: first_capture(import, content),
        flags,
    })
}

pub fn parse_log_format(content: &str) -> Option<String> {
    first_capture(&LOG_FORMAT, content)
}

pub fn parse_project_profile(content: &str) -> ProjectProfile {
    let lower = content.to_lowercase();

    let database = if lower.contains("postgresql") {
        Some("postgresql".to_string())
    } else if lower.contains("mysql") {
        Some("mysql".to_string())
    } else {
        None
    };

    ProjectProfile {
        framework_version: first_capture(&FRAMEWORK_VERSION, content),
        database,
        has_rest_framework: lower.contains("rest framework") || lower.contains("drf"),
        mentions_global_pii_masking: lower.contains("global pii") || lower.contains("pii masking"),
        mentions_magika: lower.contains("magika"),
        mentions_centralized_logging: lower.contains("centralized log")
            || lower.contains("central log"),
    }
}

pub fn parse_workflow(content: &str) -> WorkflowPolicy {
    let lower = content.to_lowercase();
    WorkflowPolicy {
        branch_pattern: BRANCH_PATTERN.find(content).map(|m| m.as_str().to_string()),
        commit_format: COMMIT_FORMAT.find(content).map(|m| m.as_str().to_string()),
        allows_pr_flags: lower.contains("flag in pr") || lower.contains("pr comment"),
    }
}

/// Read `[tool.poetry.dependencies]` from a `pyproject.toml`.
pub fn parse_dependencies(content: &str) -> Result<BTreeMap<String, String>, String> {
    let value: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;

    let table = value
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("dependencies"))
        .and_then(|deps| deps.as_table());

    let Some(table) = table else {
        return Ok(BTreeMap::new());
    };

    Ok(table
        .iter()
        .map(|(name, spec)| {
            let version = match spec {
                toml::Value::String(version) => version.clone(),
                other => other
                    .get("version")
                    .and_then(|v| v.as_str())
                    .unwrap_or("*")
                    .to_string(),
            };
            (name.clone(), version)
        })
        .collect())
}
