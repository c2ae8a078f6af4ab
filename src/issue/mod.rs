//! Free-form issue text parsed into a typed model.
//!
//! Parsing is keyword and pattern based. Identical text always yields an
//! identical model.

use crate::config::ScanConfig;
use crate::errors::Result;
use crate::io::{files_matching_any, SourceTree};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

static ISSUE_HASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\d+)").unwrap());

static ISSUE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)issue\s+(\d+)").unwrap());

static ENDPOINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(GET|POST|PUT|PATCH|DELETE)\s+(/[\w/\{\}]+)").unwrap());

static MODEL_BEFORE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?i:model)\s+([A-Z][A-Za-z0-9_]*)").unwrap());

/// `Payment model`; group 2 is set when a name follows, as in `Add model Order`.
static MODEL_AFTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Z][A-Za-z0-9_]*)\s+(?i:model)\b(\s+[A-Z])?").unwrap());

const PII_KEYWORDS: &[&str] = &["personal", "pii", "email", "phone", "ssn", "payment"];

const AUTH_KEYWORDS: &[&str] = &["auth", "login", "permission"];

const FEATURE_KEYWORDS: &[&str] = &[
    "user",
    "auth",
    "payment",
    "profile",
    "api",
    "admin",
    "report",
    "notification",
];

const SLUG_WORDS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Endpoint {
    pub method: String,
    pub path: String,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueModel {
    pub raw_text: String,
    pub number: Option<String>,
    pub requirements: Vec<String>,
    /// Models the issue proposes to introduce, first-seen order.
    pub models: Vec<String>,
    pub endpoints: Vec<Endpoint>,
    pub has_pii: bool,
    pub needs_auth: bool,
    pub mentions_upload: bool,
}

impl IssueModel {
    pub fn parse(text: &str) -> Self {
        let lower = text.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        Self {
            raw_text: text.to_string(),
            number: parse_number(text),
            requirements: parse_requirements(text),
            models: parse_models(text),
            endpoints: parse_endpoints(text),
            has_pii: contains_any(PII_KEYWORDS),
            needs_auth: contains_any(AUTH_KEYWORDS),
            mentions_upload: lower.contains("upload"),
        }
    }

    /// Feature tokens: known keywords plus documentation directories named in the text.
    pub fn feature_names(&self, doc_directories: &[String]) -> Vec<String> {
        let lower = self.raw_text.to_lowercase();
        FEATURE_KEYWORDS
            .iter()
            .map(|k| k.to_string())
            .chain(doc_directories.iter().cloned())
            .filter(|name| !name.is_empty() && lower.contains(&name.to_lowercase()))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Kebab-case summary of the first non-empty line.
    pub fn slug(&self) -> String {
        let title = self
            .raw_text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default();

        let slug = title
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty() && !word.chars().all(|c| c.is_ascii_digit()))
            .take(SLUG_WORDS)
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-");

        if slug.is_empty() {
            "change".to_string()
        } else {
            slug
        }
    }
}

fn parse_number(text: &str) -> Option<String> {
    ISSUE_HASH
        .captures(text)
        .or_else(|| ISSUE_WORD.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn parse_requirements(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            line.strip_prefix('-')
                .or_else(|| line.strip_prefix('*'))
                .or_else(|| line.strip_prefix('•'))
        })
        .map(|rest| rest.trim().to_string())
        .collect()
}

/// `METHOD /path` pairs in order of appearance.
pub fn parse_endpoints(text: &str) -> Vec<Endpoint> {
    ENDPOINT
        .captures_iter(text)
        .map(|caps| Endpoint {
            method: caps[1].to_uppercase(),
            path: caps[2].to_string(),
        })
        .collect()
}

fn parse_models(text: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let after = MODEL_AFTER
        .captures_iter(text)
        .filter(|caps| caps.get(2).is_none());
    let mut found: Vec<(usize, String)> = MODEL_BEFORE
        .captures_iter(text)
        .chain(after)
        .filter_map(|caps| caps.get(1))
        .filter(|m| !m.as_str().eq_ignore_ascii_case("model"))
        .map(|m| (m.start(), m.as_str().to_string()))
        .collect();
    found.sort();
    found
        .into_iter()
        .filter(|(_, name)| seen.insert(name.clone()))
        .map(|(_, name)| name)
        .collect()
}

/// Files the change will touch, in glob order then path order, without duplicates.
pub fn affected_files<T>(issue: &IssueModel, tree: &T, scan: &ScanConfig) -> Result<Vec<PathBuf>>
where
    T: SourceTree + ?Sized,
{
    let mut globs: Vec<&str> = Vec::new();
    if !issue.models.is_empty() {
        globs.extend(scan.model_globs.iter().map(String::as_str));
    }
    if !issue.endpoints.is_empty() {
        globs.extend(scan.endpoint_globs.iter().map(String::as_str));
    }

    files_matching_any(tree, &globs)
}
