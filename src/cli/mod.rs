//! Command-line interface for preflight
//!
//! - Argument parsing (`args`)
//! - Runtime setup (`setup`)

pub mod args;
pub mod setup;

pub use args::{Cli, Commands, CommonArgs, OutputFormat};
pub use setup::{configure_thread_pool, formatting_config, get_worker_count, init_logging, LOG_ENV};

/// Parse CLI arguments using Clap
pub fn parse_args() -> Cli {
    args::parse_args()
}
