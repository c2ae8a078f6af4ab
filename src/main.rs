use anyhow::Result;
use preflight::cli::{self, Commands, CommonArgs};
use preflight::commands::{self, CheckConfig, IssueSource, ScanCommandConfig};

/// Exit status of `check --strict` when the run halted before approval.
const HALTED_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    let cli = cli::parse_args();

    match cli.command {
        Commands::Check {
            path,
            issue,
            issue_file,
            common,
            strict,
        } => {
            setup(&common);
            let issue = match (issue, issue_file) {
                (Some(text), _) => IssueSource::Text(text),
                (None, Some(file)) => IssueSource::File(file),
                (None, None) => anyhow::bail!("Either --issue or --issue-file is required"),
            };

            let run = commands::run_check(CheckConfig {
                path,
                issue,
                config: common.config,
                format: common.format.into(),
                output: common.output,
                formatting: cli::formatting_config(common.plain),
            })?;

            if strict && !run.outcome.is_approval() {
                std::process::exit(HALTED_EXIT_CODE);
            }
            Ok(())
        }
        Commands::Scan {
            path,
            globs,
            common,
        } => {
            setup(&common);
            commands::run_scan(ScanCommandConfig {
                path,
                globs,
                config: common.config,
                format: common.format.into(),
                output: common.output,
                formatting: cli::formatting_config(common.plain),
            })?;
            Ok(())
        }
        Commands::Init { force } => {
            cli::init_logging(0);
            commands::init_config(force)
        }
    }
}

fn setup(common: &CommonArgs) {
    cli::init_logging(common.verbosity);
    cli::configure_thread_pool(common.jobs);
    tracing::debug!(
        workers = cli::get_worker_count(common.jobs),
        "Thread pool ready"
    );
}
