//! Target resolution
//!
//! Expands a glob-style path pattern into a deduplicated, ordered list of
//! filesystem targets, each verified to exist and classified as a directory
//! or a regular file. The worker pool consumes only the resulting list; it
//! never re-validates pattern syntax.

use anyhow::{Context, Result, bail};
use globset::Glob;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cli::Output;

/// What a target turned out to be when it was stat'ed at resolution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Dir,
    File,
}

/// Stat-based filtering applied to glob matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetFilter {
    Any,
    DirsOnly,
    FilesOnly,
}

/// One filesystem path selected for command execution.
///
/// Immutable once enqueued; consumed exactly once by exactly one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub kind: TargetKind,
}

/// Resolve a raw pattern into the final target list.
///
/// Fails if the pattern is malformed, matches nothing, or matches nothing
/// after filtering. Matches that cannot be stat'ed are dropped with a
/// warning rather than failing the whole resolution.
pub fn resolve(pattern: &str, filter: TargetFilter, output: &Output) -> Result<Vec<Target>> {
    let pattern = expand_tilde(pattern)?;
    let matches = expand_glob_pattern(&pattern)?;

    if matches.is_empty() {
        bail!("No matches found for pattern: {pattern}");
    }

    let mut targets = Vec::new();
    for path in matches {
        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                output.warning(&format!("Cannot stat {}: {}", path.display(), e));
                continue;
            }
        };

        let kind = if metadata.is_dir() {
            TargetKind::Dir
        } else {
            TargetKind::File
        };

        let keep = match filter {
            TargetFilter::Any => true,
            TargetFilter::DirsOnly => kind == TargetKind::Dir,
            TargetFilter::FilesOnly => kind == TargetKind::File,
        };
        if keep {
            targets.push(Target { path, kind });
        }
    }

    if targets.is_empty() {
        bail!("No matching targets found after filtering");
    }

    Ok(targets)
}

/// Expand a leading `~` to the invoking user's home directory.
pub fn expand_tilde(pattern: &str) -> Result<String> {
    if !pattern.starts_with('~') {
        return Ok(pattern.to_string());
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let rest = pattern.trim_start_matches('~').trim_start_matches('/');
    if rest.is_empty() {
        return Ok(home.to_string_lossy().into_owned());
    }
    Ok(home.join(rest).to_string_lossy().into_owned())
}

/// Check if a string contains glob pattern characters
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

/// Expand a single glob pattern to matching paths (files and directories).
///
/// The walk is rooted at the pattern's literal prefix and depth-limited to
/// the pattern's component count, so `*/src` never walks deeper than two
/// levels. A `**` anywhere in the pattern lifts the depth limit.
pub fn expand_glob_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if !is_glob_pattern(pattern) {
        // Literal path: matches iff it exists
        let path = PathBuf::from(pattern);
        if path.exists() {
            return Ok(vec![path]);
        }
        return Ok(Vec::new());
    }

    let glob = Glob::new(pattern)
        .with_context(|| format!("Invalid glob pattern: {pattern}"))?;
    let matcher = glob.compile_matcher();

    let (base, glob_depth) = split_literal_prefix(pattern);
    let max_depth = if pattern.contains("**") {
        usize::MAX
    } else {
        glob_depth.max(1)
    };

    let mut matching_paths = Vec::new();
    for entry in WalkDir::new(&base)
        .min_depth(1)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        // Relative walks yield "./foo"; match against the pattern's own shape
        let candidate: &Path = path.strip_prefix(".").unwrap_or(path);
        if matcher.is_match(candidate) {
            matching_paths.push(candidate.to_path_buf());
        }
    }

    matching_paths.sort();
    matching_paths.dedup();
    Ok(matching_paths)
}

/// Split a pattern into its literal directory prefix (the walk root) and
/// the number of remaining glob components (the walk depth).
fn split_literal_prefix(pattern: &str) -> (PathBuf, usize) {
    let mut base = if pattern.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::from(".")
    };

    let mut in_glob = false;
    let mut glob_depth = 0;
    for component in pattern.split('/') {
        if component.is_empty() {
            continue;
        }
        if in_glob || is_glob_pattern(component) {
            in_glob = true;
            glob_depth += 1;
        } else {
            base.push(component);
        }
    }

    (base, glob_depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn quiet_output() -> Output {
        Output::new(false, true)
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.rs"));
        assert!(is_glob_pattern("src/**/*.js"));
        assert!(is_glob_pattern("test?.txt"));
        assert!(is_glob_pattern("file[123].txt"));
        assert!(!is_glob_pattern("simple.txt"));
        assert!(!is_glob_pattern("path/to/file.rs"));
    }

    #[test]
    fn test_split_literal_prefix() {
        let (base, depth) = split_literal_prefix("/tmp/proj/*/src");
        assert_eq!(base, PathBuf::from("/tmp/proj"));
        assert_eq!(depth, 2);

        let (base, depth) = split_literal_prefix("*.md");
        assert_eq!(base, PathBuf::from("."));
        assert_eq!(depth, 1);
    }

    #[test]
    fn test_expand_tilde() -> Result<()> {
        assert_eq!(expand_tilde("/tmp/x")?, "/tmp/x");
        assert_eq!(expand_tilde("relative/x")?, "relative/x");

        if dirs::home_dir().is_some() {
            let expanded = expand_tilde("~/projects")?;
            assert!(!expanded.starts_with('~'));
            assert!(expanded.ends_with("/projects"));
        }
        Ok(())
    }

    #[test]
    fn test_expand_literal_path() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("exists.txt");
        fs::write(&file, "x")?;

        let matches = expand_glob_pattern(file.to_str().unwrap())?;
        assert_eq!(matches, vec![file]);

        let missing = temp_dir.path().join("missing.txt");
        let matches = expand_glob_pattern(missing.to_str().unwrap())?;
        assert!(matches.is_empty());
        Ok(())
    }

    #[test]
    fn test_expand_glob_matches_files_and_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();
        fs::create_dir(base.join("alpha"))?;
        fs::create_dir(base.join("beta"))?;
        fs::write(base.join("notes.txt"), "x")?;
        fs::write(base.join("alpha").join("deep.txt"), "x")?;

        let pattern = format!("{}/*", base.display());
        let matches = expand_glob_pattern(&pattern)?;

        assert_eq!(matches.len(), 3);
        assert!(matches.contains(&base.join("alpha")));
        assert!(matches.contains(&base.join("beta")));
        assert!(matches.contains(&base.join("notes.txt")));
        // Depth-limited: deep.txt is two levels down, pattern is one
        assert!(!matches.contains(&base.join("alpha").join("deep.txt")));
        Ok(())
    }

    #[test]
    fn test_resolve_filters() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path();
        fs::create_dir(base.join("subdir"))?;
        fs::write(base.join("one.txt"), "x")?;
        fs::write(base.join("two.txt"), "x")?;

        let pattern = format!("{}/*", base.display());
        let output = quiet_output();

        let all = resolve(&pattern, TargetFilter::Any, &output)?;
        assert_eq!(all.len(), 3);

        let dirs = resolve(&pattern, TargetFilter::DirsOnly, &output)?;
        assert_eq!(dirs.len(), 1);
        assert_eq!(dirs[0].kind, TargetKind::Dir);

        let files = resolve(&pattern, TargetFilter::FilesOnly, &output)?;
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|t| t.kind == TargetKind::File));
        Ok(())
    }

    #[test]
    fn test_resolve_no_matches() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/nothing-*", temp_dir.path().display());

        let err = resolve(&pattern, TargetFilter::Any, &quiet_output()).unwrap_err();
        assert!(
            err.to_string()
                .starts_with("No matches found for pattern:")
        );
    }

    #[test]
    fn test_resolve_empty_after_filter() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("only-file.txt"), "x").unwrap();
        let pattern = format!("{}/*", temp_dir.path().display());

        let err = resolve(&pattern, TargetFilter::DirsOnly, &quiet_output()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No matching targets found after filtering"
        );
    }
}
