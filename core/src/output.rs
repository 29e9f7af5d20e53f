#![deny(missing_docs)]

//! # Output
//!
//! Checks the rendered unit parses as Rust and writes it in one step, so a
//! failed run never leaves a partial file behind.

use crate::error::{AppError, AppResult};
use ra_ap_edition::Edition;
use ra_ap_syntax::SourceFile;
use std::fs;
use std::path::{Path, PathBuf};

/// Parses `code` and fails with `InvalidOutput` on the first syntax error.
pub fn validate_source(code: &str) -> AppResult<()> {
    let parse = SourceFile::parse(code, Edition::Edition2021);
    match parse.errors().first() {
        Some(error) => Err(AppError::InvalidOutput(format!(
            "{} at {:?}",
            error,
            error.range()
        ))),
        None => Ok(()),
    }
}

/// Writes `contents` to `path` through a sibling temp file and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp = temp_path(path);
    if let Err(e) = fs::write(&temp, contents) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp, path) {
        let _ = fs::remove_file(&temp);
        return Err(e.into());
    }
    tracing::debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "generated".into());
    path.with_file_name(format!(".{}.tmp", name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_validate_source() {
        assert!(validate_source("pub struct A { pub b: Option<Box<A>> }\n").is_ok());
        let err = validate_source("pub struct A {").unwrap_err();
        assert!(matches!(err, AppError::InvalidOutput(_)));
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("nested").join("client.rs");
        write_atomic(&target, "old").unwrap();
        write_atomic(&target, "new").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");

        let leftovers: Vec<_> = fs::read_dir(target.parent().unwrap())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers.len(), 1);
    }
}
