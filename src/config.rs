//! Configuration discovery and effective settings resolution.
//!
//! Reads `policylib.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `policy_dir`: `lib`
//! - `docs_dir`: `docs`
//! - `exclude`: `["ignore", "utils"]`
//! - `output`: `human`
//! - `docs.order`: `source`
//!
//! Overrides precedence: CLI > config file > defaults. Paths are resolved
//! against the repository root; the process working directory is never
//! changed.

use crate::discover::default_excludes;
use crate::models::policy::LabelOrder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Docs-related configuration section under `[docs]`.
pub struct DocsCfg {
    pub order: Option<LabelOrder>,
    /// Markdown file written by `docs` when `--out` is absent.
    pub out: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `policylib.toml|yaml`.
pub struct PolicylibConfig {
    pub policy_dir: Option<String>,
    pub docs_dir: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub output: Option<String>,
    #[serde(default)]
    pub docs: Option<DocsCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub policy_dir: PathBuf,
    pub docs_dir: PathBuf,
    pub exclude: Vec<String>,
    pub output: String,
    pub order: LabelOrder,
    pub out: Option<PathBuf>,
}

/// CLI-level overrides; `None` defers to config and defaults.
#[derive(Debug, Default, Clone)]
pub struct Overrides<'a> {
    pub repo_root: Option<&'a str>,
    pub policy_dir: Option<&'a str>,
    pub docs_dir: Option<&'a str>,
    pub exclude: Option<&'a [String]>,
    pub output: Option<&'a str>,
    pub order: Option<LabelOrder>,
    pub out: Option<&'a str>,
}

const CONFIG_FILES: [&str; 3] = ["policylib.toml", "policylib.yaml", "policylib.yml"];

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `policylib.toml|yaml|yml` or a `.git` directory is found.
/// `start` is made absolute first so relative starts such as `.` can climb
/// past the current directory.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let abs = fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    let mut cur = abs.as_path();
    loop {
        if CONFIG_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) if !p.as_os_str().is_empty() => cur = p,
            _ => return abs,
        }
    }
}

/// Load `PolicylibConfig` from `policylib.toml` or `policylib.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<PolicylibConfig> {
    let toml_path = root.join(CONFIG_FILES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        return match toml::from_str(&s) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %toml_path.display(), error = %e, "ignoring invalid config");
                None
            }
        };
    }
    for yml in &CONFIG_FILES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            return match serde_yaml::from_str(&s) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "ignoring invalid config");
                    None
                }
            };
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &Overrides<'_>) -> Effective {
    let start = PathBuf::from(cli.repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();
    let docs = cfg.docs.unwrap_or_default();

    let policy_dir = cli
        .policy_dir
        .map(str::to_string)
        .or(cfg.policy_dir)
        .unwrap_or_else(|| "lib".to_string());
    let docs_dir = cli
        .docs_dir
        .map(str::to_string)
        .or(cfg.docs_dir)
        .unwrap_or_else(|| "docs".to_string());
    let exclude = cli
        .exclude
        .filter(|e| !e.is_empty())
        .map(<[String]>::to_vec)
        .or(cfg.exclude)
        .unwrap_or_else(default_excludes);
    let output = cli
        .output
        .map(str::to_string)
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let order = cli.order.or(docs.order).unwrap_or_default();
    let out = cli
        .out
        .map(str::to_string)
        .or(docs.out)
        .map(|o| repo_root.join(o));

    Effective {
        policy_dir: repo_root.join(policy_dir),
        docs_dir: repo_root.join(docs_dir),
        repo_root,
        exclude,
        output,
        order,
        out,
    }
}
