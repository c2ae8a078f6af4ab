//! Rendering of pipeline runs and scan findings.

pub mod json;
pub mod markdown;
pub mod terminal;

use crate::core::Finding;
use crate::formatting::{ColoredFormatter, FormattingConfig, OutputFormatter, PlainFormatter};
use crate::io;
use crate::pipeline::PipelineRun;
use anyhow::Result;
use std::path::Path;

pub use json::{format_findings_json, format_run_json};
pub use markdown::render_plan;
pub use terminal::{format_findings, format_run, severity_table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

fn formatter(config: FormattingConfig) -> Box<dyn OutputFormatter> {
    if config == FormattingConfig::plain() {
        Box::new(PlainFormatter)
    } else {
        Box::new(ColoredFormatter::new(config))
    }
}

fn is_plain(config: FormattingConfig) -> bool {
    !config.emoji.should_use_emoji()
}

pub fn render_run(
    run: &PipelineRun,
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<String> {
    match format {
        OutputFormat::Json => format_run_json(run),
        OutputFormat::Terminal => Ok(format_run(
            run,
            formatter(formatting).as_ref(),
            is_plain(formatting),
        )),
    }
}

pub fn render_findings(
    findings: &[Finding],
    format: OutputFormat,
    formatting: FormattingConfig,
) -> Result<String> {
    match format {
        OutputFormat::Json => format_findings_json(findings),
        OutputFormat::Terminal => Ok(format_findings(
            findings,
            formatter(formatting).as_ref(),
            is_plain(formatting),
        )),
    }
}

/// Print to stdout, or write to `output_file` creating parent directories.
pub fn emit(content: &str, output_file: Option<&Path>) -> Result<()> {
    match output_file {
        Some(path) => io::write_file(path, content)?,
        None => println!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_emit_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("run.json");

        emit("{}", Some(&nested)).unwrap();
        assert_eq!(std::fs::read_to_string(&nested).unwrap(), "{}");
    }

    #[test]
    fn test_plain_empty_findings() {
        let text = render_findings(&[], OutputFormat::Terminal, FormattingConfig::plain()).unwrap();
        assert_eq!(text, "[OK] No findings\n");
    }
}
