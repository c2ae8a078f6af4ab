use super::resolve_config;
use crate::core::Finding;
use crate::formatting::FormattingConfig;
use crate::io::{files_matching_any, FsProject};
use crate::output::{self, OutputFormat};
use crate::scanner::IssueScanner;
use anyhow::Result;
use std::path::PathBuf;

pub struct ScanCommandConfig {
    pub path: PathBuf,
    /// Empty means the configured model and endpoint globs.
    pub globs: Vec<String>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub formatting: FormattingConfig,
}

pub fn run_scan(config: ScanCommandConfig) -> Result<Vec<Finding>> {
    let preflight_config = resolve_config(&config.path, config.config.as_deref())?;
    let globs = if config.globs.is_empty() {
        preflight_config
            .scan
            .model_globs
            .iter()
            .chain(&preflight_config.scan.endpoint_globs)
            .cloned()
            .collect()
    } else {
        config.globs.clone()
    };

    let project = FsProject::new(&config.path);
    let files = files_matching_any(&project, &globs)?;
    log::info!("Scanning {} files", files.len());

    let scanner = IssueScanner::from_config(&preflight_config.scan);
    let findings = scanner.scan_files(&project, &files)?;

    let rendered = output::render_findings(&findings, config.format, config.formatting)?;
    output::emit(&rendered, config.output.as_deref())?;

    Ok(findings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Severity;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_defaults_to_model_and_endpoint_globs() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("app")).unwrap();
        fs::write(temp.path().join("app/views.py"), "result = eval(expr)\n").unwrap();
        fs::write(temp.path().join("app/tasks.py"), "result = eval(expr)\n").unwrap();
        fs::write(temp.path().join("app/models.py"), "# TODO: index\n").unwrap();

        let findings = run_scan(ScanCommandConfig {
            path: temp.path().to_path_buf(),
            globs: Vec::new(),
            config: None,
            format: OutputFormat::Json,
            output: Some(temp.path().join("out/findings.json")),
            formatting: FormattingConfig::plain(),
        })
        .unwrap();

        let files: Vec<_> = findings.iter().map(|f| f.file.clone()).collect();
        let expected = vec![
            PathBuf::from("app/models.py"),
            PathBuf::from("app/views.py"),
        ];
        assert_eq!(files, expected);
        assert_eq!(findings[1].severity, Severity::High);
        assert!(temp.path().join("out/findings.json").exists());
    }
}
