//! Severity grouping and bounded previews.
//!
//! Independent of where findings come from: the scanner feeds it today, any
//! other producer of [`Finding`]s can tomorrow.

use crate::core::{Finding, Severity};
use serde::Serialize;

/// The first `limit` items plus how many were left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview<T> {
    pub shown: Vec<T>,
    pub remaining: usize,
}

impl<T: Clone> Preview<T> {
    pub fn of(items: &[T], limit: usize) -> Self {
        let shown: Vec<T> = items.iter().take(limit).cloned().collect();
        Self {
            remaining: items.len() - shown.len(),
            shown,
        }
    }
}

impl<T> Preview<T> {
    pub fn total(&self) -> usize {
        self.shown.len() + self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Findings split by severity, each bucket in scan order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeverityBuckets {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
    pub medium: Vec<Finding>,
    pub low: Vec<Finding>,
}

impl SeverityBuckets {
    pub fn bucket(&self, severity: Severity) -> &[Finding] {
        match severity {
            Severity::Critical => &self.critical,
            Severity::High => &self.high,
            Severity::Medium => &self.medium,
            Severity::Low => &self.low,
        }
    }

    fn bucket_mut(&mut self, severity: Severity) -> &mut Vec<Finding> {
        match severity {
            Severity::Critical => &mut self.critical,
            Severity::High => &mut self.high,
            Severity::Medium => &mut self.medium,
            Severity::Low => &mut self.low,
        }
    }

    pub fn counts(&self) -> SeverityCounts {
        SeverityCounts {
            critical: self.critical.len(),
            high: self.high.len(),
            medium: self.medium.len(),
            low: self.low.len(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts().total()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    pub fn preview(&self, severity: Severity, limit: usize) -> Preview<Finding> {
        Preview::of(self.bucket(severity), limit)
    }
}

impl FromIterator<Finding> for SeverityBuckets {
    fn from_iter<I: IntoIterator<Item = Finding>>(iter: I) -> Self {
        let mut buckets = Self::default();
        for finding in iter {
            buckets.bucket_mut(finding.severity).push(finding);
        }
        buckets
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }
}

impl std::fmt::Display for SeverityCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = Severity::DESCENDING
            .iter()
            .filter(|severity| self.get(**severity) > 0)
            .map(|severity| format!("{} {}", self.get(*severity), severity))
            .collect();

        if parts.is_empty() {
            write!(f, "no findings")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}
