//! Metadata extraction and docs rendering for policy files.
//!
//! A single pass over the lines picks up `desc`, `severity` and the
//! `targets` set. Special-case rules then fill in targets for policies that
//! predate the `targets` convention. `run_docs` drives extraction over a
//! whole policy directory.

use crate::discover::discover_policies;
use crate::error::{PolicyError, Result};
use crate::matcher::Declaration;
use crate::models::policy::{LabelOrder, PolicyMetadata, TargetLabel};
use crate::models::DocFragment;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Header that opens the generated policy library document.
pub const DOCS_HEADER: &str = "## Policy Library\n";

/// Join idiom used to list namespaces dynamically in descriptions.
const JOIN_IDIOM: &str = "concat(\", \"";

/// A hard-coded targets assignment for a known policy.
pub struct SpecialCase {
    pub policy: &'static str,
    pub targets: &'static [TargetLabel],
}

/// Applied after the scan, only when no targets were found.
pub const SPECIAL_CASES: &[SpecialCase] = &[SpecialCase {
    policy: "providerIAM",
    targets: &[TargetLabel::ServiceAccounts],
}];

/// Read and extract metadata from the policy at `path`.
pub fn extract(path: &Path) -> Result<PolicyMetadata> {
    let src = fs::read_to_string(path).map_err(|source| PolicyError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(extract_source(&policy_name(path), path, &src))
}

/// Extract metadata from policy text already in memory.
pub fn extract_source(name: &str, path: &Path, src: &str) -> PolicyMetadata {
    let desc = Declaration::new("desc");
    let severity = Declaration::new("severity");
    let targets = Declaration::new("targets");

    let mut md = PolicyMetadata::new(name, path);
    for line in src.lines() {
        if line.contains(targets.name()) {
            for label in TargetLabel::ALL {
                if targets.set_contains(line, label.as_str()) {
                    md.add_target(label);
                }
            }
        } else if desc.is_simple(line) {
            md.description = parse_description(line);
        } else if severity.is_simple(line) {
            md.severity = between_outer_quotes(line).to_string();
        }
    }

    if md.targets.is_empty() {
        if let Some(rule) = SPECIAL_CASES.iter().find(|r| r.policy == md.name) {
            tracing::debug!(policy = %md.name, "applying special-case targets");
            for label in rule.targets {
                md.add_target(*label);
            }
        }
    }
    tracing::trace!(policy = %md.name, targets = md.targets.len(), "extracted");
    md
}

/// File name with the rule-file extension stripped.
pub fn policy_name(path: &Path) -> String {
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().to_string())
        .unwrap_or_default();
    match file.strip_suffix(".rego") {
        Some(stem) => stem.to_string(),
        None => file,
    }
}

fn parse_description(line: &str) -> String {
    if line.contains(JOIN_IDIOM) {
        let stripped = line.replace(JOIN_IDIOM, "");
        let first = stripped.split('"').nth(1).unwrap_or_default();
        first.replace("namespaces (%v)", "namespaces")
    } else {
        between_outer_quotes(line).to_string()
    }
}

/// Text between the first and last `"` on the line; empty if fewer than two.
fn between_outer_quotes(line: &str) -> &str {
    match (line.find('"'), line.rfind('"')) {
        (Some(start), Some(end)) if end > start => &line[start + 1..end],
        _ => "",
    }
}

/// Render one policy section.
pub fn render(md: &PolicyMetadata, link: &str, order: LabelOrder) -> DocFragment {
    let labels: Vec<&str> = md
        .ordered_targets(order)
        .into_iter()
        .map(TargetLabel::as_str)
        .collect();
    let mut out = String::new();
    out.push_str(&format!("### [{}]({})\n", md.name, link));
    out.push_str(&format!("- Description: `{}`\n", md.description));
    out.push_str(&format!("- Severity: `{}`\n", md.severity));
    out.push_str(&format!("- Violation types: `{}`\n", labels.join(", ")));
    DocFragment { markdown: out }
}

/// Path of `policy` as seen from `docs_dir`, with `/` separators.
pub fn doc_link(policy: &Path, docs_dir: &Path) -> String {
    let rel = pathdiff::diff_paths(policy, docs_dir).unwrap_or_else(|| policy.to_path_buf());
    rel.to_string_lossy().replace('\\', "/")
}

/// Options shared by every policy in a docs run.
pub struct DocsOptions {
    pub docs_dir: PathBuf,
    pub order: LabelOrder,
}

/// Extraction result for one discovered policy.
pub struct PolicyDoc {
    pub metadata: PolicyMetadata,
    pub link: String,
    pub fragment: DocFragment,
}

/// Extract docs for every policy under `policy_dir`.
///
/// Files are processed in parallel but returned in sorted path order. A file
/// that fails to read lands in the error list and does not stop the others.
/// Only a discovery failure aborts the run.
pub fn run_docs(
    policy_dir: &Path,
    exclude: &[String],
    opts: &DocsOptions,
) -> Result<(Vec<PolicyDoc>, Vec<PolicyError>)> {
    let paths = discover_policies(policy_dir, exclude)?;
    let per_file: Vec<Result<PolicyDoc>> = paths
        .par_iter()
        .map(|path| {
            let metadata = extract(path)?;
            let link = doc_link(path, &opts.docs_dir);
            let fragment = render(&metadata, &link, opts.order);
            Ok(PolicyDoc {
                metadata,
                link,
                fragment,
            })
        })
        .collect();

    let mut docs = Vec::new();
    let mut errors = Vec::new();
    for r in per_file {
        match r {
            Ok(d) => docs.push(d),
            Err(e) => {
                tracing::warn!(error = %e, "policy skipped");
                errors.push(e);
            }
        }
    }
    Ok((docs, errors))
}

/// Concatenate fragments after the library header.
pub fn compose_markdown(docs: &[PolicyDoc]) -> String {
    let mut out = String::from(DOCS_HEADER);
    for d in docs {
        out.push_str(&d.fragment.markdown);
    }
    out
}
