//! policylib core library.
//!
//! This crate exposes programmatic APIs for documenting Rego policy
//! libraries and migrating legacy policies to the `targets` convention.
//! Policy files are read as text; a few declaration shapes are recognized
//! line by line and everything else passes through untouched.
//!
//! High-level modules:
//! - `matcher`: Single-line declaration predicates.
//! - `discover`: Policy file discovery with excluded directories.
//! - `extract`: Metadata extraction and markdown rendering.
//! - `migrate`: `checkXXX` flags to `targets` rewrite.
//! - `models`: Data models for metadata and outcomes.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers for docs and migrate.
//! - `logging`: Tracing subscriber setup.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod extract;
pub mod logging;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod output;
pub mod utils;
