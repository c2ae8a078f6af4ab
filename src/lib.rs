//! Documentation-aware pre-change validation.
//!
//! Given a project tree and the text of an issue, [`pipeline::Pipeline`]
//! checks that the documentation matches the code, scans the files the
//! change will touch, asks what the documentation leaves open, warns about
//! breaking changes and finally proposes a plan that follows the documented
//! conventions.

pub mod aggregate;
pub mod cli;
pub mod commands;
pub mod config;
pub mod consistency;
pub mod core;
pub mod docs;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod issue;
pub mod output;
pub mod pipeline;
pub mod rules;
pub mod scanner;

// Re-export commonly used types
pub use crate::aggregate::{Preview, SeverityBuckets, SeverityCounts};
pub use crate::config::PreflightConfig;
pub use crate::consistency::ConsistencyChecker;
pub use crate::core::{Discrepancy, Finding, FindingKind, Severity};
pub use crate::docs::{build_documentation_model, DocumentationModel, Topic};
pub use crate::errors::{PreflightError, Result};
pub use crate::io::{DocumentationSource, FsProject, MemoryProject, SourceTree};
pub use crate::issue::IssueModel;
pub use crate::pipeline::{Pipeline, PipelineOutcome, PipelineRun, Plan, StageKind};
pub use crate::scanner::IssueScanner;
