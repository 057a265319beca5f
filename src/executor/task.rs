//! Per-target execution
//!
//! One task is the substitute-execute-capture cycle for a single target:
//! replace the placeholder in the command template, pick a working
//! directory, run through the system shell, and capture combined output.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::resolver::Target;

/// Placeholder token replaced with the target path in command templates.
pub const PLACEHOLDER: &str = "{}";

/// Outcome of one subprocess attempt.
#[derive(Debug)]
pub struct ExecOutcome {
    /// Combined stdout and stderr, trimmed of surrounding whitespace
    pub output: String,
    /// Non-zero exit or launch failure, if any
    pub error: Option<String>,
}

/// Substitute every occurrence of the placeholder with the target path.
///
/// The path is inserted verbatim; no shell escaping is applied.
pub fn substitute(template: &str, path: &Path) -> String {
    template.replace(PLACEHOLDER, &path.to_string_lossy())
}

/// Pick the subprocess working directory for a target: directories run in
/// themselves, files run in their parent directory.
pub fn working_dir(path: &Path, is_dir: bool) -> PathBuf {
    if is_dir {
        return path.to_path_buf();
    }
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Execute the command template against one target.
///
/// The target is re-stat'ed at execution time rather than trusting the
/// resolver's earlier snapshot; an `Err` here means the target vanished
/// between resolution and dispatch and the attempt was abandoned.
/// Subprocess failures (non-zero exit, failed launch) are reported inside
/// the `Ok` variant and never abort the pool.
pub fn execute(target: &Target, template: &str) -> Result<ExecOutcome> {
    let metadata = std::fs::metadata(&target.path)
        .with_context(|| format!("Cannot stat {}", target.path.display()))?;

    let command_line = substitute(template, &target.path);
    let cwd = working_dir(&target.path, metadata.is_dir());

    match shell_command(&command_line).current_dir(&cwd).output() {
        Ok(out) => {
            let mut combined = out.stdout;
            combined.extend_from_slice(&out.stderr);
            let output = String::from_utf8_lossy(&combined).trim().to_string();
            let error = if out.status.success() {
                None
            } else {
                Some(format!("command exited with {}", out.status))
            };
            Ok(ExecOutcome { output, error })
        }
        Err(e) => Ok(ExecOutcome {
            output: String::new(),
            error: Some(format!("failed to launch command: {e}")),
        }),
    }
}

/// Build a command that runs `command_line` through the system shell, so
/// pipes, globs, and other shell metacharacters in the template keep
/// working.
fn shell_command(command_line: &str) -> Command {
    #[cfg(windows)]
    {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }
    #[cfg(not(windows))]
    {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }
}
