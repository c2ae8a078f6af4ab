use crate::core::Finding;
use crate::pipeline::PipelineRun;
use anyhow::Result;

pub fn format_run_json(run: &PipelineRun) -> Result<String> {
    Ok(serde_json::to_string_pretty(run)?)
}

pub fn format_findings_json(findings: &[Finding]) -> Result<String> {
    Ok(serde_json::to_string_pretty(findings)?)
}
