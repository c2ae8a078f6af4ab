//! Declarative detection rules.
//!
//! A rule is a pure function from a unit of text to an optional finding
//! draft. Rules never see each other's results and have no side effects, so
//! the scanner and the checker can evaluate them uniformly and tests can be
//! table driven.
//!
//! Two families exist:
//!
//! - [`LineRule`]: content patterns evaluated against a single source line
//! - [`UsageRule`]: cross-reference rules evaluated against a whole file,
//!   firing when a usage signal is present but the documented helper is not
//!
//! Both are built from [`Matcher`] combinators:
//!
//! ```rust
//! use preflight::rules::Matcher;
//!
//! let sql = Matcher::all(vec![
//!     Matcher::contains(".format("),
//!     Matcher::contains_ignore_case("select"),
//! ]);
//! assert!(sql.is_match(r#"q = "select * from t where id={}".format(uid)"#));
//! assert!(!sql.is_match("q = 'select 1'"));
//! ```

pub mod line;
pub mod usage;

pub use line::{builtin_line_rules, Description, LineRule};
pub use usage::{usage_rule_for, UsageRule};

use crate::core::{FindingKind, Severity};
use regex::Regex;
use std::path::Path;

/// The text a rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub enum RuleUnit<'a> {
    /// A single line with its 1-based number.
    Line { number: usize, text: &'a str },
    /// A whole file.
    Document { path: &'a Path, text: &'a str },
}

/// What a rule reports before the caller attaches a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingDraft {
    pub rule: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub description: String,
}

pub trait Rule: Send + Sync {
    fn id(&self) -> &str;

    fn evaluate(&self, unit: &RuleUnit<'_>) -> Option<FindingDraft>;
}

/// Text predicates rules are assembled from.
#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String),
    /// Needle is stored lowercase.
    ContainsIgnoreCase(String),
    Regex(Regex),
    All(Vec<Matcher>),
    Any(Vec<Matcher>),
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn contains(needle: impl Into<String>) -> Self {
        Self::Contains(needle.into())
    }

    pub fn contains_ignore_case(needle: impl Into<String>) -> Self {
        Self::ContainsIgnoreCase(needle.into().to_lowercase())
    }

    pub fn regex(regex: &Regex) -> Self {
        Self::Regex(regex.clone())
    }

    pub fn any_of<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(needles.into_iter().map(Self::contains).collect())
    }

    pub fn any_of_ignore_case<I, S>(needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Any(needles.into_iter().map(Self::contains_ignore_case).collect())
    }

    pub fn all(matchers: Vec<Matcher>) -> Self {
        Self::All(matchers)
    }

    pub fn not(matcher: Matcher) -> Self {
        Self::Not(Box::new(matcher))
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Contains(needle) => text.contains(needle.as_str()),
            Self::ContainsIgnoreCase(needle) => text.to_lowercase().contains(needle.as_str()),
            Self::Regex(regex) => regex.is_match(text),
            Self::All(matchers) => matchers.iter().all(|m| m.is_match(text)),
            Self::Any(matchers) => matchers.iter().any(|m| m.is_match(text)),
            Self::Not(matcher) => !matcher.is_match(text),
        }
    }
}
