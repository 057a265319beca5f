//! # Globrun - Parallel command execution over glob matches
//!
//! Globrun expands a glob-style path pattern into a set of filesystem
//! targets and runs a user-supplied shell command against each of them
//! concurrently, with live progress reporting.
//!
//! ## Quick Start
//!
//! ```bash
//! # Count lines in every markdown file, four workers
//! globrun --pattern '*.md' --cmd 'wc -l {}'
//!
//! # Run `git status` inside every immediate subdirectory
//! globrun --pattern '*' --dirs-only --cmd 'git status -s' --workers 8
//! ```

pub mod cli;
pub mod executor;
pub mod resolver;

pub use cli::{Cli, Output};

/// Result type alias for globrun operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
