//! # mkipk Error Handling System
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout mkipk. It provides
//! a `MkipkError` enum for the failures the packaging pipeline knows how to
//! describe, alongside a `Result` alias over `anyhow::Result` so that I/O errors
//! can be propagated with `?` and enriched with path context.
//!
//! ## Architecture
//!
//! The error variants follow the pipeline's taxonomy:
//! - Validation errors (input root or required subtrees missing)
//! - Metadata errors (required control fields absent)
//! - Archive errors (unsupported filesystem nodes, unrepresentable paths)
//! - Configuration errors (bad config file values)
//! - Cleanup errors (scratch staging directory could not be removed)
//!
//! Raw I/O failures are not wrapped in a dedicated variant; they travel as
//! `std::io::Error` inside `anyhow::Error` with a `.context(...)` message.
//!
//! ## Examples
//!
//! ```rust
//! if !path.is_dir() {
//!     anyhow::bail!(MkipkError::InvalidInputDir { path: path.to_path_buf() });
//! }
//!
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read control file: {}", path.display()))?;
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for the mkipk application.
#[derive(Error, Debug)]
pub enum MkipkError {
    #[error("Illegal input directory '{}'", path.display())]
    InvalidInputDir { path: PathBuf },

    #[error("Illegal input {name} directory '{}'", path.display())]
    MissingSubtree { name: &'static str, path: PathBuf },

    #[error("Control file has no {field} field")]
    MissingField { field: &'static str },

    #[error("Unsupported filesystem entry (not a file or directory): '{}'", path.display())]
    UnsupportedEntry { path: PathBuf },

    /// Only raised where file names are not raw bytes (non-Unix hosts).
    #[cfg_attr(unix, allow(dead_code))]
    #[error("Path is not valid UTF-8 and cannot be archived: '{}'", path.display())]
    NonUtf8Path { path: PathBuf },

    #[error("Staging directory '{}' produced no archive entries", path.display())]
    EmptyStaging { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to remove scratch directory '{}': {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Type alias for Result using anyhow::Error for context-rich propagation.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let missing = MkipkError::MissingField { field: "Version" };
        assert_eq!(missing.to_string(), "Control file has no Version field");

        let subtree = MkipkError::MissingSubtree {
            name: "control",
            path: PathBuf::from("/tmp/pkg/control"),
        };
        assert_eq!(
            subtree.to_string(),
            "Illegal input control directory '/tmp/pkg/control'"
        );

        let config = MkipkError::Config("uid must be a number".into());
        assert_eq!(config.to_string(), "Configuration error: uid must be a number");
    }

    #[test]
    fn test_cleanup_error_exposes_source() {
        use std::error::Error as _;
        let err = MkipkError::Cleanup {
            path: PathBuf::from("/tmp/mkipk_1"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/tmp/mkipk_1"));
    }
}
