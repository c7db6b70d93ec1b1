//! Supporting helpers: colored status prefixes and atomic file writes.

use crate::error::{PolicyError, Result};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;

/// Colors are disabled by `NO_COLOR`.
pub fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

fn prefix(tag: &str, paint: fn(&str) -> String) -> String {
    if colors_enabled() {
        paint(tag)
    } else {
        tag.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("[!]", |t| t.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("[*]", |t| t.yellow().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("[+]", |t| t.green().bold().to_string())
}

/// Replace `path` with `data` in one step.
///
/// The bytes go to a temp file next to `path` which is then renamed over it,
/// so a failure leaves the previous content (or no file) in place.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let to_err = |source: std::io::Error| PolicyError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(to_err)?;
    tmp.write_all(data).map_err(to_err)?;
    tmp.persist(path).map_err(|e| to_err(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_atomic_replaces_existing() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("out.md");
        std::fs::write(&p, "old and longer").unwrap();
        write_atomic(&p, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&p).unwrap(), "new");
        // No stray temp files left behind.
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_missing_dir_is_write_error() {
        let tmp = tempdir().unwrap();
        let err = write_atomic(&tmp.path().join("x/y.md"), b"z").unwrap_err();
        assert!(matches!(err, PolicyError::Write { .. }));
    }
}
