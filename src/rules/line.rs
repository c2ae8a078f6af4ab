use super::{FindingDraft, Matcher, Rule, RuleUnit};
use crate::core::{FindingKind, Severity};
use once_cell::sync::Lazy;
use regex::Regex;

/// A string prefix containing `f`, not a quoted `'f'` inside another literal.
static F_STRING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:^|[^\w"'])[rRbB]?[fF][rR]?["']"#).unwrap());

static PASSWORD_ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)password["']?\s*[:=]\s*["']"#).unwrap());

static BARE_EXCEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*except\s*:").unwrap());

/// How a line rule words its finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Fixed(&'static str),
    /// The offending line itself, trimmed.
    TrimmedLine,
}

impl Description {
    fn render(&self, line: &str) -> String {
        match self {
            Self::Fixed(text) => text.to_string(),
            Self::TrimmedLine => line.trim().to_string(),
        }
    }
}

/// A content rule bound to a fixed kind and severity.
#[derive(Debug, Clone)]
pub struct LineRule {
    pub id: &'static str,
    pub kind: FindingKind,
    pub severity: Severity,
    pub matcher: Matcher,
    pub description: Description,
}

impl Rule for LineRule {
    fn id(&self) -> &str {
        self.id
    }

    fn evaluate(&self, unit: &RuleUnit<'_>) -> Option<FindingDraft> {
        let RuleUnit::Line { text, .. } = unit else {
            return None;
        };

        self.matcher.is_match(text).then(|| FindingDraft {
            rule: self.id.to_string(),
            kind: self.kind,
            severity: self.severity,
            description: self.description.render(text),
        })
    }
}

/// The built-in line rules, in evaluation order.
pub fn builtin_line_rules() -> Vec<LineRule> {
    vec![
        LineRule {
            id: "todo-marker",
            kind: FindingKind::Todo,
            severity: Severity::Low,
            matcher: Matcher::any_of(["TODO", "FIXME"]),
            description: Description::TrimmedLine,
        },
        LineRule {
            id: "deprecated-usage",
            kind: FindingKind::Deprecated,
            severity: Severity::Medium,
            matcher: Matcher::contains_ignore_case("deprecated"),
            description: Description::Fixed("Using deprecated function/method"),
        },
        LineRule {
            id: "dynamic-execution",
            kind: FindingKind::Security,
            severity: Severity::High,
            matcher: Matcher::any_of(["eval(", "exec("]),
            description: Description::Fixed("Potential security issue: eval/exec usage"),
        },
        LineRule {
            id: "sql-string-formatting",
            kind: FindingKind::Security,
            severity: Severity::Critical,
            matcher: Matcher::all(vec![
                Matcher::Any(vec![Matcher::contains(".format("), Matcher::regex(&F_STRING)]),
                Matcher::contains_ignore_case("select"),
            ]),
            description: Description::Fixed("Potential SQL injection: string formatting in query"),
        },
        LineRule {
            id: "hardcoded-password",
            kind: FindingKind::Security,
            severity: Severity::Critical,
            matcher: Matcher::all(vec![
                Matcher::regex(&PASSWORD_ASSIGNMENT),
                Matcher::not(Matcher::any_of(["getenv", "environ"])),
            ]),
            description: Description::Fixed("Hardcoded password detected"),
        },
        LineRule {
            id: "bare-except",
            kind: FindingKind::Bug,
            severity: Severity::Medium,
            matcher: Matcher::regex(&BARE_EXCEPT),
            description: Description::Fixed("Bare except clause swallows every exception"),
        },
        LineRule {
            id: "unbounded-queryset",
            kind: FindingKind::Performance,
            severity: Severity::Low,
            matcher: Matcher::contains(".objects.all()"),
            description: Description::Fixed("Unbounded queryset loads every row"),
        },
    ]
}
