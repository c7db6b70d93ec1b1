//! Error types for policy extraction and migration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, discovering, or rewriting policies.
#[derive(Debug, Error)]
pub enum PolicyError {
    // === File System Errors ===
    /// Policy file missing or unreadable.
    #[error("failed to read policy {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output path not writable.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root directory for discovery does not exist.
    #[error("policy directory not found: {path}")]
    PolicyDirNotFound { path: PathBuf },

    /// Discovery glob could not be built.
    #[error("invalid policy pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    // === Format Errors ===
    /// Migration input has no `checkXXX := true` flag.
    #[error(
        "policy '{path}' doesn't look like a legacy policy: it defines none of 'checkServiceAccounts', 'checkNodes' or 'checkCombined'"
    )]
    NotLegacyPolicy { path: PathBuf },
}

impl PolicyError {
    /// True for I/O problems, false for format-recognition problems.
    pub fn is_access_error(&self) -> bool {
        !matches!(self, PolicyError::NotLegacyPolicy { .. })
    }
}

pub type Result<T> = std::result::Result<T, PolicyError>;
