//! Command-line interface for globrun
//!
//! This module provides the CLI structure and the top-level run flow.
//! It uses clap for argument parsing and provides a clean, user-friendly
//! interface.

use anyhow::Result;
use clap::{ArgAction, Parser};

mod output;

pub use output::Output;

use crate::executor::{PoolConfig, WorkerPool};
use crate::resolver::{self, TargetFilter};

/// Globrun - run a shell command in parallel across every glob match
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command template to execute; every `{}` is replaced with the target path
    #[arg(short = 'c', long = "cmd", value_name = "COMMAND")]
    pub cmd: String,

    /// Glob-style path pattern (e.g. '*/src' or '~/projects/*'); a leading
    /// `~` expands to the invoking user's home directory
    #[arg(short, long, value_name = "PATTERN")]
    pub pattern: String,

    /// Number of concurrent workers
    #[arg(short, long, default_value_t = 4)]
    pub workers: usize,

    /// Only process directories
    #[arg(long, conflicts_with = "files_only")]
    pub dirs_only: bool,

    /// Only process files
    #[arg(long)]
    pub files_only: bool,

    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Enable quiet output (minimal)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);

        let filter = if self.dirs_only {
            TargetFilter::DirsOnly
        } else if self.files_only {
            TargetFilter::FilesOnly
        } else {
            TargetFilter::Any
        };

        // Setup errors (bad pattern, no matches, no home dir) bubble out of
        // here and terminate the process before any worker starts.
        let targets = resolver::resolve(&self.pattern, filter, &output)?;

        output.info(&format!("Found {} targets to process", targets.len()));

        let pool = WorkerPool::new(PoolConfig {
            workers: self.workers,
        });
        let summary = pool.run(targets, &self.cmd, &output)?;

        output.blank_line();
        output.success(&format!(
            "Execution Summary: Completed {} operations",
            summary.completed
        ));
        if summary.skipped > 0 {
            output.warning(&format!(
                "{} targets were skipped (vanished before execution)",
                summary.skipped
            ));
        }

        Ok(())
    }
}

/// Set up logging based on verbosity
fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info,globset=warn,walkdir=warn"),
            2 => tracing_subscriber::EnvFilter::new("debug,globset=warn,walkdir=warn"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
