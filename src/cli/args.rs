use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "preflight")]
#[command(
    about = "Validate a change request against project documentation before any code is written",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the validation pipeline for an issue
    #[command(group(ArgGroup::new("issue_source").required(true).args(["issue", "issue_file"])))]
    Check {
        /// Project root
        path: PathBuf,

        /// Issue text
        #[arg(long)]
        issue: Option<String>,

        /// Read the issue text from a file
        #[arg(long = "issue-file")]
        issue_file: Option<PathBuf>,

        #[command(flatten)]
        common: CommonArgs,

        /// Exit with status 2 unless the plan is ready for approval
        #[arg(long)]
        strict: bool,
    },

    /// Scan source files for problems without running the pipeline
    Scan {
        /// Project root
        path: PathBuf,

        /// Files to scan (repeatable, defaults to the configured model and endpoint globs)
        #[arg(long = "glob")]
        globs: Vec<String>,

        #[command(flatten)]
        common: CommonArgs,
    },

    /// Write a default .preflight.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct CommonArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the nearest .preflight.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Worker threads (0 = all cores)
    #[arg(
        short = 'j',
        long = "jobs",
        default_value = "0",
        env = "PREFLIGHT_JOBS"
    )]
    pub jobs: usize,

    /// ASCII output without colors or emoji
    #[arg(long)]
    pub plain: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl From<OutputFormat> for crate::output::OutputFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Terminal => crate::output::OutputFormat::Terminal,
            OutputFormat::Json => crate::output::OutputFormat::Json,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
