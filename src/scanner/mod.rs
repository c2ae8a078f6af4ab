//! Line-oriented issue scanner.
//!
//! Applies the content rules to every line of every affected file. Output is
//! ordered by file, then line, then rule, regardless of how many threads read
//! the files.

use crate::config::ScanConfig;
use crate::core::{Finding, FindingKind, Severity};
use crate::errors::Result;
use crate::io::{read_sources, SourceTree};
use crate::rules::{builtin_line_rules, LineRule, Rule, RuleUnit};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug_span;

#[derive(Debug, Clone)]
pub struct IssueScanner {
    rules: Vec<LineRule>,
}

impl Default for IssueScanner {
    fn default() -> Self {
        Self::new(builtin_line_rules())
    }
}

impl IssueScanner {
    pub fn new(rules: Vec<LineRule>) -> Self {
        Self { rules }
    }

    /// Built-in rules minus the ones disabled in configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        let rules = builtin_line_rules()
            .into_iter()
            .filter(|rule| !config.disabled_rules.iter().any(|id| id == rule.id))
            .collect();
        Self::new(rules)
    }

    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// Scan one file's text.
    ///
    /// On a single line, a later rule with the same kind and severity as an
    /// earlier one is dropped.
    pub fn scan_text(&self, path: &Path, text: &str) -> Vec<Finding> {
        let mut findings = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let number = index + 1;
            let unit = RuleUnit::Line { number, text: line };
            let mut seen: HashSet<(FindingKind, Severity)> = HashSet::new();

            for rule in &self.rules {
                let Some(draft) = rule.evaluate(&unit) else {
                    continue;
                };
                if !seen.insert((draft.kind, draft.severity)) {
                    continue;
                }
                findings.push(Finding {
                    kind: draft.kind,
                    severity: draft.severity,
                    file: path.to_path_buf(),
                    line: number,
                    description: draft.description,
                    rule: draft.rule,
                });
            }
        }

        findings
    }

    /// Scan files in the given order. Files that no longer exist are skipped.
    pub fn scan_files<T>(&self, tree: &T, files: &[PathBuf]) -> Result<Vec<Finding>>
    where
        T: SourceTree + ?Sized,
    {
        let _span = debug_span!("scan_files", files = files.len()).entered();

        let sources = read_sources(tree, files)?;
        let per_file: Vec<Vec<Finding>> = sources
            .par_iter()
            .map(|(path, text)| self.scan_text(path, text))
            .collect();

        Ok(per_file.into_iter().flatten().collect())
    }
}
