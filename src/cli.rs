//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "policylib",
    version,
    about = "Document and migrate Rego policy libraries",
    long_about = "policylib: generate markdown docs from Rego policy metadata and migrate legacy checkXXX flags to the unified targets set.\n\nConfiguration precedence: CLI > policylib.toml > defaults.",
    after_help = "Examples:\n  policylib docs\n  policylib docs --policy-dir lib --out docs/policy_lib.md\n  policylib migrate lib/old.rego lib/new.rego",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands for docs generation and migration.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current policylib version.")]
    Version,
    /// Generate policy library docs
    #[command(
        about = "Generate policy docs",
        long_about = "Extract description, severity and violation types from every policy under the policy directory and print a markdown document.",
        after_help = "Examples:\n  policylib docs --exclude ignore --exclude utils\n  policylib docs --order reverse-sorted --output json\n  policylib docs --out docs/policy_lib.md --check"
    )]
    Docs {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Directory holding policies (default: lib)")]
        policy_dir: Option<String>,
        #[arg(long, help = "Directory the docs live in; links are relative to it (default: docs)")]
        docs_dir: Option<String>,
        #[arg(long = "exclude", help = "Directory name to skip (repeatable; default: ignore, utils)")]
        exclude: Vec<String>,
        #[arg(long, help = "Violation types order: source|reverse-sorted (default: source)")]
        order: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, help = "Write docs (in the --output format) to this file instead of stdout")]
        out: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Exit non-zero if the --out file is stale (writes nothing)")]
        check: bool,
    },
    /// Migrate a legacy policy to the targets set
    #[command(
        about = "Migrate legacy policy",
        long_about = "Replace checkServiceAccounts/checkNodes/checkCombined flags with a single targets set. Files that already define targets are left untouched.",
        after_help = "Examples:\n  policylib migrate lib/old.rego lib/new.rego\n  policylib migrate lib/old.rego --dry-run"
    )]
    Migrate {
        #[arg(help = "Policy file to migrate")]
        input: String,
        #[arg(required_unless_present = "dry_run", help = "Where to write the migrated policy")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Print the migrated policy instead of writing it")]
        dry_run: bool,
    },
}
