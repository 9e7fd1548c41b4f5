//! # mkipk Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` used by the packaging pipeline. Each wrapper
//! attaches the offending path to any I/O error so failures reach the operator
//! with enough context to act on.
//!
//! - **`is_dir`**: Existence-and-kind check used for input validation and for
//!   deciding how the output target is interpreted.
//! - **`ensure_dir_exists`**: `mkdir -p` that rejects non-directory paths.
//! - **`read_file_to_string`**: Reads config files.
//! - **`read_file_to_bytes`**: Reads files whose encoding is not guaranteed.
//! - **`write_bytes_to_file`**: Writes a complete in-memory buffer, creating
//!   parent directories first.
//!
use crate::core::error::Result;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Returns `true` if `path` exists and is a directory (symlinks are followed).
pub fn is_dir(path: &Path) -> bool {
    fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Ensures that a directory exists at the specified path.
///
/// Creates it (and any missing parents) when absent.
///
/// # Errors
///
/// Returns an `Err` if the path exists as a non-directory or creation fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!("Path exists but is not a directory: {:?}", path);
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Reads the entire content of a file as raw bytes.
pub fn read_file_to_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file {:?}", path))
}

/// Writes `content` to `path`, overwriting any existing file.
///
/// The parent directory is created first if needed. The buffer is written in a
/// single call; nothing is written when the parent cannot be prepared.
pub fn write_bytes_to_file(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    debug!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_is_dir() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("file");
        fs::write(&file, "x")?;
        assert!(is_dir(temp_dir.path()));
        assert!(!is_dir(&file));
        assert!(!is_dir(&temp_dir.path().join("missing")));
        Ok(())
    }

    #[test]
    fn test_ensure_dir_exists_creates_and_rejects_files() -> Result<()> {
        let temp_dir = tempdir()?;
        let nested = temp_dir.path().join("a/b/c");
        ensure_dir_exists(&nested)?;
        assert!(nested.is_dir());
        ensure_dir_exists(&nested)?;

        let file = temp_dir.path().join("plain");
        fs::write(&file, "x")?;
        assert!(ensure_dir_exists(&file).is_err());
        Ok(())
    }

    #[test]
    fn test_write_bytes_creates_parent_and_overwrites() -> Result<()> {
        let temp_dir = tempdir()?;
        let target = temp_dir.path().join("out/pkg.ipk");
        write_bytes_to_file(&target, b"first")?;
        write_bytes_to_file(&target, b"2.0")?;
        assert_eq!(fs::read(&target)?, b"2.0");
        Ok(())
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let temp_dir = tempdir().unwrap();
        let missing = temp_dir.path().join("control");
        let err = read_file_to_string(&missing).unwrap_err();
        assert!(format!("{:#}", err).contains("control"));
    }

    #[test]
    fn test_read_file_to_bytes_keeps_invalid_utf8() -> Result<()> {
        let temp_dir = tempdir()?;
        let file = temp_dir.path().join("control");
        fs::write(&file, b"Description: caf\xe9\n")?;
        assert_eq!(read_file_to_bytes(&file)?, b"Description: caf\xe9\n");
        assert!(read_file_to_string(&file).is_err());
        Ok(())
    }
}
