//! CLI command implementations.
//!
//! - **check**: run the validation pipeline for one issue
//! - **scan**: run only the issue scanner over selected files
//! - **init**: write a default `.preflight.toml`

pub mod check;
pub mod init;
pub mod scan;

pub use check::{run_check, CheckConfig, IssueSource};
pub use init::init_config;
pub use scan::{run_scan, ScanCommandConfig};

use crate::config::{load_config, load_config_from, PreflightConfig};
use std::path::Path;

/// An explicit `--config` must load; otherwise search upwards from the project.
pub(crate) fn resolve_config(
    project_root: &Path,
    explicit: Option<&Path>,
) -> crate::errors::Result<PreflightConfig> {
    match explicit {
        Some(path) => load_config_from(path),
        None => load_config(project_root),
    }
}
