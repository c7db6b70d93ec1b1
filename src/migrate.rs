//! Rewrites legacy `checkXXX := true` policies to the unified `targets` set.
//!
//! Every flag line is dropped and one `targets := {...}` line takes the place
//! of the first flag. All other bytes, line terminators included, pass
//! through unchanged. A file that already declares `targets` is left alone.

use crate::error::{PolicyError, Result};
use crate::matcher::Declaration;
use crate::models::policy::{LegacyFlag, TargetLabel};
use crate::models::{MigrateOutcome, Rewrite};
use crate::utils::write_atomic;
use std::fs;
use std::path::Path;

/// Name of the unified set declaration.
pub const TARGETS: &str = "targets";

/// Outcome of scanning a policy's text.
#[derive(Debug, PartialEq, Eq)]
pub enum Scan {
    AlreadyMigrated,
    NoLegacyFlags,
    Rewrite(Rewrite),
}

/// Migrate the policy at `input`, writing the result to `output`.
///
/// Nothing is written when the input is already migrated or has no legacy
/// flags. The output replaces any existing file at once, never partially.
pub fn migrate(input: &Path, output: &Path) -> Result<MigrateOutcome> {
    let rewrite = match plan(input)? {
        Some(r) => r,
        None => return Ok(MigrateOutcome::AlreadyMigrated),
    };
    write_atomic(output, rewrite.text.as_bytes())?;
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        line = rewrite.line,
        "policy migrated"
    );
    Ok(MigrateOutcome::Migrated {
        targets: rewrite.targets,
        line: rewrite.line,
    })
}

/// Read `input` and compute the rewrite without writing anything.
///
/// Returns `None` when the policy already declares `targets`.
pub fn plan(input: &Path) -> Result<Option<Rewrite>> {
    let src = fs::read_to_string(input).map_err(|source| PolicyError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    match migrate_source(&src) {
        Scan::AlreadyMigrated => {
            tracing::debug!(input = %input.display(), "already uses targets");
            Ok(None)
        }
        Scan::NoLegacyFlags => Err(PolicyError::NotLegacyPolicy {
            path: input.to_path_buf(),
        }),
        Scan::Rewrite(r) => Ok(Some(r)),
    }
}

/// Pure rewrite of policy text.
pub fn migrate_source(src: &str) -> Scan {
    let targets = Declaration::new(TARGETS);
    let flags: Vec<(TargetLabel, Declaration)> = TargetLabel::LEGACY
        .iter()
        .filter_map(|l| l.legacy_flag().map(|f| (*l, Declaration::new(f))))
        .collect();

    let mut kept: Vec<&str> = Vec::new();
    let mut found: Vec<LegacyFlag> = Vec::new();
    let mut terminator = "\n";
    for (i, line) in src.split_inclusive('\n').enumerate() {
        let body = line.trim_end_matches(['\n', '\r']);
        if targets.is_set(body) {
            return Scan::AlreadyMigrated;
        }
        match flags.iter().find(|(_, d)| d.is_true(body)) {
            Some((label, _)) => {
                if found.is_empty() {
                    terminator = &line[body.len()..];
                }
                found.push(LegacyFlag {
                    label: *label,
                    line: i,
                });
            }
            None => kept.push(line),
        }
    }

    let Some(first) = found.first() else {
        return Scan::NoLegacyFlags;
    };
    // No flag precedes the first one, so its index is also its slot in `kept`.
    let line = first.line;
    let mut labels: Vec<TargetLabel> = Vec::new();
    for f in &found {
        if !labels.contains(&f.label) {
            labels.push(f.label);
        }
    }
    let decl = targets_declaration(&labels, terminator);
    let mut out = String::with_capacity(src.len() + decl.len());
    for (i, l) in kept.iter().enumerate() {
        if i == line {
            out.push_str(&decl);
        }
        out.push_str(l);
    }
    if line >= kept.len() {
        out.push_str(&decl);
    }
    Scan::Rewrite(Rewrite {
        text: out,
        targets: labels,
        line,
    })
}

/// `targets := {"a", "b"}` followed by `terminator`.
pub fn targets_declaration(labels: &[TargetLabel], terminator: &str) -> String {
    let quoted: Vec<String> = labels.iter().map(|l| format!("\"{}\"", l)).collect();
    format!("{} := {{{}}}{}", TARGETS, quoted.join(", "), terminator)
}
