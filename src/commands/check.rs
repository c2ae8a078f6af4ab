use super::resolve_config;
use crate::formatting::FormattingConfig;
use crate::io::FsProject;
use crate::output::{self, OutputFormat};
use crate::pipeline::{Pipeline, PipelineRun};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum IssueSource {
    Text(String),
    File(PathBuf),
}

impl IssueSource {
    pub fn read(&self) -> Result<String> {
        match self {
            Self::Text(text) => Ok(text.clone()),
            Self::File(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read issue file {}", path.display())),
        }
    }
}

pub struct CheckConfig {
    pub path: PathBuf,
    pub issue: IssueSource,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

/// Run the pipeline once and emit the rendered outcome.
pub fn run_check(config: CheckConfig) -> Result<PipelineRun> {
    let issue_text = config.issue.read()?;
    let preflight_config = resolve_config(&config.path, config.config.as_deref())?;
    let project = FsProject::new(&config.path);

    let run = Pipeline::new(&preflight_config)
        .run(&project, &issue_text)
        .with_context(|| format!("Validation of {} failed", config.path.display()))?;

    let rendered = output::render_run(&run, config.format, config.formatting)?;
    output::emit(&rendered, config.output.as_deref())?;

    Ok(run)
}
