//! Policy file discovery.
//!
//! Globs `**/*.rego` under a root and drops any path with a directory
//! component named in the exclusion list. Results are sorted so callers can
//! rely on a stable, lexicographic order.

use crate::error::{PolicyError, Result};
use glob::{glob, Pattern};
use std::path::{Path, PathBuf};

/// Extension of rule-language source files.
pub const POLICY_EXT: &str = "rego";

/// Directory names skipped by default.
pub const DEFAULT_EXCLUDES: [&str; 2] = ["ignore", "utils"];

/// List every policy file under `root`, skipping excluded directories.
pub fn discover_policies(root: &Path, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(PolicyError::PolicyDirNotFound {
            path: root.to_path_buf(),
        });
    }
    let base = Pattern::escape(&root.to_string_lossy());
    let pattern = format!("{}/**/*.{}", base.trim_end_matches('/'), POLICY_EXT);
    let entries = glob(&pattern).map_err(|source| PolicyError::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(path = %e.path().display(), "skipping unreadable entry");
                continue;
            }
        };
        if !path.is_file() || is_excluded(root, &path, exclude) {
            tracing::trace!(path = %path.display(), "excluded");
            continue;
        }
        paths.push(path);
    }
    paths.sort();
    tracing::debug!(root = %root.display(), count = paths.len(), "discovered policies");
    Ok(paths)
}

/// True when a directory between `root` and the file is excluded.
fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let Some(dir) = rel.parent() else {
        return false;
    };
    dir.components().any(|c| {
        let name = c.as_os_str().to_string_lossy();
        exclude.iter().any(|ex| ex == name.as_ref())
    })
}

/// Default exclusion list as owned strings.
pub fn default_excludes() -> Vec<String> {
    DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect()
}
