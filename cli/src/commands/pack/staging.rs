//! # mkipk Staging Layout
//!
//! File: cli/src/commands/pack/staging.rs
//!
//! ## Overview
//!
//! The outer package archive is built from a scratch directory holding exactly
//! three members:
//!
//! ```text
//! mkipk_<millis>_<random>/
//!   control.tar.gz
//!   data.tar.gz
//!   debian-binary      # "2.0"
//! ```
//!
//! The directory is created with `tempfile` (timestamped prefix plus a random
//! suffix) and removed explicitly on every exit path of `with_staging`, so a
//! failed removal is reported rather than swallowed by `Drop`.
//!
use crate::common::fs::io;
use crate::core::error::{MkipkError, Result};
use anyhow::Context;
use chrono::Utc;
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, warn};

/// Member name of the control sub-archive.
pub const CONTROL_ARCHIVE_NAME: &str = "control.tar.gz";
/// Member name of the data sub-archive.
pub const DATA_ARCHIVE_NAME: &str = "data.tar.gz";
/// Member name of the format version marker.
pub const VERSION_MARKER_NAME: &str = "debian-binary";
/// Package format version written into the marker.
pub const FORMAT_VERSION: &[u8] = b"2.0";

/// A scratch directory owned by one packaging run.
#[derive(Debug)]
pub struct StagingLayout {
    dir: TempDir,
}

impl StagingLayout {
    /// Creates a uniquely named scratch directory under `parent`, or under the
    /// OS temp directory when `parent` is `None`.
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let prefix = format!("mkipk_{}_", Utc::now().timestamp_millis());
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match parent {
            Some(parent) => {
                io::ensure_dir_exists(parent)?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .context("Failed to create scratch staging directory")?;

        debug!("Created staging directory '{}'", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes both sub-archives and the version marker.
    pub fn write_members(&self, control_tar_gz: &[u8], data_tar_gz: &[u8]) -> Result<()> {
        io::write_bytes_to_file(&self.path().join(CONTROL_ARCHIVE_NAME), control_tar_gz)?;
        io::write_bytes_to_file(&self.path().join(DATA_ARCHIVE_NAME), data_tar_gz)?;
        io::write_bytes_to_file(&self.path().join(VERSION_MARKER_NAME), FORMAT_VERSION)?;
        Ok(())
    }

    /// Removes the directory and everything in it.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| MkipkError::Cleanup { path: path.clone(), source })?;
        debug!("Removed staging directory '{}'", path.display());
        Ok(())
    }
}

/// # Run With Staging Directory (`with_staging`)
///
/// Creates a `StagingLayout`, runs `f` against it, then removes it whether `f`
/// succeeded or not.
///
/// ## Errors
///
/// - The error from `f`, if it failed. A cleanup failure in that case is logged.
/// - `MkipkError::Cleanup` if `f` succeeded but the directory could not be removed.
pub fn with_staging<T, F>(parent: Option<&Path>, f: F) -> Result<T>
where
    F: FnOnce(&StagingLayout) -> Result<T>,
{
    let staging = StagingLayout::create(parent)?;
    let outcome = f(&staging);
    let cleanup = staging.close();

    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(cleanup_err)) => Err(cleanup_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(cleanup_err)) => {
            warn!("{:#}", cleanup_err);
            Err(err)
        }
    }
}
