//! # mkipk Output Path Resolution
//!
//! File: cli/src/commands/pack/output.rs
//!
//! Decides where the finished package is written. An existing directory target
//! gets a file name derived from the control metadata; any other target is used
//! verbatim, and the control file is never consulted in that case.
//!
use crate::commands::pack::control;
use crate::common::fs::io;
use crate::core::error::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// # Resolve Output Path (`resolve_output_path`)
///
/// ## Arguments
///
/// * `target` - The `-o` value: an existing directory or a file path.
/// * `input_root` - Package input root, used to locate `control/control`.
/// * `extension` - Extension for derived file names (e.g. `ipk`).
///
/// ## Errors
///
/// Only when `target` is a directory: fails if the control metadata cannot be
/// read or lacks a required field.
pub fn resolve_output_path(target: &Path, input_root: &Path, extension: &str) -> Result<PathBuf> {
    if !io::is_dir(target) {
        debug!("Output target '{}' used as file path", target.display());
        return Ok(target.to_path_buf());
    }

    let metadata = control::read_control(input_root).with_context(|| {
        format!(
            "Failed to read control metadata for naming a package in '{}'",
            target.display()
        )
    })?;
    let resolved = target.join(metadata.file_name(extension));
    debug!("Output directory '{}' resolved to '{}'", target.display(), resolved.display());
    Ok(resolved)
}
