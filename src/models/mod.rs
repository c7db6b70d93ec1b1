//! Shared data models for docs and migration outputs.

pub mod policy;

use policy::TargetLabel;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Rendered markdown block for one policy.
pub struct DocFragment {
    pub markdown: String,
}

#[derive(Serialize)]
/// Aggregated docs summary used by printers.
pub struct Summary {
    pub policies: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Successful result of a migration.
pub enum MigrateOutcome {
    /// The file already declares a `targets` set; nothing was written.
    AlreadyMigrated,
    /// The rewritten file was written with `targets` inserted at `line`.
    Migrated { targets: Vec<TargetLabel>, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Pure result of rewriting a legacy policy's text.
pub struct Rewrite {
    pub text: String,
    pub targets: Vec<TargetLabel>,
    pub line: usize,
}
