//! Output rendering for docs and migrate commands.
//!
//! Docs support `human` (markdown, default) and `json`, either on stdout or
//! in a file kept in sync by `sync_docs_file`. Migration status lines go to
//! stdout, failures to stderr.

use crate::error::{PolicyError, Result};
use crate::extract::{compose_markdown, PolicyDoc};
use crate::models::{MigrateOutcome, Summary};
use crate::utils::{error_prefix, info_prefix, note_prefix, write_atomic};
use serde_json::json;
use serde_json::Value as JsonVal;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Rendering mode for docs.
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    /// Parse `human` or `json`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "human" => Some(OutputMode::Human),
            "json" => Some(OutputMode::Json),
            _ => None,
        }
    }
}

/// Full docs document in `mode`, newline-terminated.
pub fn compose_docs(docs: &[PolicyDoc], errors: &[PolicyError], mode: OutputMode) -> String {
    match mode {
        OutputMode::Human => format!("{}\n", compose_markdown(docs)),
        OutputMode::Json => format!("{:#}\n", compose_docs_json(docs, errors)),
    }
}

/// Print docs in the requested format, plus per-file errors on stderr.
pub fn print_docs(docs: &[PolicyDoc], mode: OutputMode, errors: &[PolicyError]) {
    print!("{}", compose_docs(docs, errors, mode));
    print_errors(errors);
}

/// Print per-file errors on stderr.
pub fn print_errors(errors: &[PolicyError]) {
    for e in errors {
        eprintln!("{} {}", error_prefix(), e);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of comparing (and maybe writing) a docs file.
pub enum DocsFileStatus {
    /// Check mode: file already matches.
    UpToDate,
    /// Check mode: file missing or different; nothing written.
    Stale,
    /// File was created or replaced.
    Written,
    /// File already matched; nothing written.
    Unchanged,
}

/// Bring the docs file at `path` in line with `contents`.
///
/// With `check`, only compares. A missing file counts as stale.
pub fn sync_docs_file(path: &Path, contents: &str, check: bool) -> Result<DocsFileStatus> {
    let current = fs::read_to_string(path).ok();
    let fresh = current.as_deref() == Some(contents);
    let status = match (check, fresh) {
        (true, true) => DocsFileStatus::UpToDate,
        (true, false) => DocsFileStatus::Stale,
        (false, true) => DocsFileStatus::Unchanged,
        (false, false) => {
            write_atomic(path, contents.as_bytes())?;
            DocsFileStatus::Written
        }
    };
    tracing::debug!(path = %path.display(), ?status, "docs file");
    Ok(status)
}

/// Human status line for a docs file.
pub fn docs_file_message(path: &Path, status: DocsFileStatus) -> String {
    match status {
        DocsFileStatus::UpToDate => format!("{} {} is up to date", info_prefix(), path.display()),
        DocsFileStatus::Stale => format!("{} {} is out of date", error_prefix(), path.display()),
        DocsFileStatus::Written => format!("{} wrote {}", info_prefix(), path.display()),
        DocsFileStatus::Unchanged => format!("{} no changes: {}", note_prefix(), path.display()),
    }
}

/// Compose docs JSON object (pure) for testing/snapshot purposes.
pub fn compose_docs_json(docs: &[PolicyDoc], errors: &[PolicyError]) -> JsonVal {
    let items: Vec<_> = docs
        .iter()
        .map(|d| {
            json!({
                "name": d.metadata.name,
                "path": d.metadata.path.to_string_lossy().replace('\\', "/"),
                "link": d.link,
                "description": d.metadata.description,
                "severity": d.metadata.severity,
                "targets": d.metadata.targets,
            })
        })
        .collect();
    let summary = Summary {
        policies: docs.len(),
        errors: errors.len(),
    };
    json!({
        "policies": items,
        "errors": errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        "summary": summary,
    })
}

/// Human status line for a finished migration.
pub fn migrate_message(input: &Path, output: &Path, outcome: &MigrateOutcome) -> String {
    match outcome {
        MigrateOutcome::AlreadyMigrated => format!(
            "{} Policy '{}' already defines a 'targets' set, it's in the new format",
            note_prefix(),
            input.display()
        ),
        MigrateOutcome::Migrated { targets, .. } => {
            let labels: Vec<&str> = targets.iter().map(|t| t.as_str()).collect();
            format!(
                "{} Done, new policy at {} (targets: {})",
                info_prefix(),
                output.display(),
                labels.join(", ")
            )
        }
    }
}

/// Print the outcome of a migration.
pub fn print_migrate(input: &Path, output: &Path, outcome: &MigrateOutcome) {
    println!("{}", migrate_message(input, output, outcome));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract_source, render};
    use crate::models::policy::{LabelOrder, TargetLabel};
    use tempfile::tempdir;

    fn doc(name: &str, src: &str) -> PolicyDoc {
        let path = format!("lib/{name}.rego");
        let metadata = extract_source(name, Path::new(&path), src);
        let link = format!("../{path}");
        let fragment = render(&metadata, &link, LabelOrder::Source);
        PolicyDoc {
            metadata,
            link,
            fragment,
        }
    }

    #[test]
    fn test_compose_docs_json_shape() {
        let docs = vec![doc("a", "desc := \"A\"\ntargets := {\"users\", \"groups\"}\n")];
        let errors = vec![PolicyError::NotLegacyPolicy {
            path: "lib/b.rego".into(),
        }];
        let out = compose_docs_json(&docs, &errors);
        assert_eq!(out["summary"]["policies"], 1);
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["policies"][0]["link"], "../lib/a.rego");
        assert_eq!(out["policies"][0]["targets"][1], "groups");
        assert!(out["errors"][0].as_str().unwrap().contains("lib/b.rego"));
    }

    #[test]
    fn test_migrate_message_variants() {
        let noop = migrate_message(
            Path::new("in.rego"),
            Path::new("out.rego"),
            &MigrateOutcome::AlreadyMigrated,
        );
        assert!(noop.contains("already defines a 'targets' set"));
        let done = migrate_message(
            Path::new("in.rego"),
            Path::new("out.rego"),
            &MigrateOutcome::Migrated {
                targets: vec![TargetLabel::ServiceAccounts, TargetLabel::Combined],
                line: 3,
            },
        );
        assert!(done.ends_with("new policy at out.rego (targets: serviceAccounts, combined)"));
    }

    #[test]
    fn test_output_mode_rejects_unknown() {
        assert_eq!(OutputMode::parse("json"), Some(OutputMode::Json));
        assert_eq!(OutputMode::parse("human"), Some(OutputMode::Human));
        assert_eq!(OutputMode::parse("yaml"), None);
    }

    #[test]
    fn test_compose_docs_modes() {
        let docs = vec![doc("a", "desc := \"A\"\n")];
        let md = compose_docs(&docs, &[], OutputMode::Human);
        assert!(md.starts_with("## Policy Library\n### [a](../lib/a.rego)\n"));
        // Same bytes as printing the markdown with a trailing newline.
        assert!(md.ends_with("- Violation types: ``\n\n"));
        let js = compose_docs(&docs, &[], OutputMode::Json);
        let parsed: JsonVal = serde_json::from_str(&js).unwrap();
        assert_eq!(parsed["policies"][0]["description"], "A");
        assert!(js.ends_with("}\n"));
    }

    #[test]
    fn test_sync_docs_file_writes_fresh_and_skips_unchanged() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("policy_lib.md");
        let docs = vec![doc("a", "desc := \"A\"\n")];
        let contents = compose_docs(&docs, &[], OutputMode::Human);

        assert_eq!(
            sync_docs_file(&path, &contents, false).unwrap(),
            DocsFileStatus::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        assert_eq!(
            sync_docs_file(&path, &contents, false).unwrap(),
            DocsFileStatus::Unchanged
        );
        assert_eq!(
            sync_docs_file(&path, &contents, true).unwrap(),
            DocsFileStatus::UpToDate
        );
    }

    #[test]
    fn test_sync_docs_file_check_mode_never_writes() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("policy_lib.md");
        assert_eq!(
            sync_docs_file(&path, "## Policy Library\n\n", true).unwrap(),
            DocsFileStatus::Stale
        );
        assert!(!path.exists());

        fs::write(&path, "## Policy Library\n").unwrap();
        assert_eq!(
            sync_docs_file(&path, "## Policy Library\n\n", true).unwrap(),
            DocsFileStatus::Stale
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "## Policy Library\n");

        assert_eq!(
            sync_docs_file(&path, "## Policy Library\n\n", false).unwrap(),
            DocsFileStatus::Written
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "## Policy Library\n\n");
    }

    #[test]
    fn test_sync_docs_file_unwritable_is_error() {
        let tmp = tempdir().unwrap();
        let err = sync_docs_file(&tmp.path().join("missing/dir/out.md"), "x", false).unwrap_err();
        assert!(matches!(err, PolicyError::Write { .. }));
    }

    #[test]
    fn test_docs_file_message() {
        let p = Path::new("docs/policy_lib.md");
        assert!(docs_file_message(p, DocsFileStatus::Stale).ends_with("docs/policy_lib.md is out of date"));
        assert!(docs_file_message(p, DocsFileStatus::Written).ends_with("wrote docs/policy_lib.md"));
    }
}
