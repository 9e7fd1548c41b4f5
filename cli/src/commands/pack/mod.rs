//! # mkipk Package Assembly
//!
//! File: cli/src/commands/pack/mod.rs
//!
//! ## Overview
//!
//! This module builds a single `.ipk` from a prepared input tree:
//!
//! ```text
//! <input_dir>/
//!   control/
//!     control      # Package/Version/Architecture metadata
//!     postinst     # any other files are archived verbatim
//!   data/
//!     ...          # payload, archived verbatim
//! ```
//!
//! The result is a gzipped tar whose members are `control.tar.gz`,
//! `data.tar.gz` and `debian-binary`, with every entry owned by the configured
//! identity (`root:root` unless overridden).
//!
//! ## Architecture
//!
//! - `config.rs`: `PackArgs` and the merged `PackConfig`
//! - `control.rs`: Control file parsing (`PackageMetadata`)
//! - `staging.rs`: Scratch directory holding the three package members
//! - `output.rs`: Output path resolution
//!
//! Assembly flow:
//! 1. Validate the input root and its `control/` and `data/` subtrees
//! 2. Archive `control/` and `data/` into memory
//! 3. Write both archives and the `2.0` marker into a scratch directory
//! 4. Archive the scratch directory into the final package, then remove it
//! 5. Resolve the output path and write the package in one call
//!
use crate::common::archive::tar::{self, ArchiveOptions, EntryOrder};
use crate::common::fs::io;
use crate::core::error::{MkipkError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use config::{PackArgs, PackConfig};

/// Loads and merges packaging configuration.
pub mod config;

/// Reads package identity from the control file.
pub mod control;

/// Resolves where the package is written.
pub mod output;

/// Scratch directory for the outer package layout.
pub mod staging;

/// Name of the metadata subtree in the input root.
pub const CONTROL_DIR_NAME: &str = "control";

/// Name of the payload subtree in the input root.
pub const DATA_DIR_NAME: &str = "data";

/// # Handle Pack Command (`handle_pack`)
///
/// Entry point used by `main`: merges configuration, builds the package and
/// reports the written path on stdout.
pub fn handle_pack(args: PackArgs) -> Result<()> {
    info!("Handling pack command with args: {:?}", args);

    let config = config::load_and_merge_config(args)?;
    info!("Effective pack config: {:?}", config);

    let written = build_package(&config)?;
    println!("Created package '{}'", written.display());
    Ok(())
}

/// # Build Package (`build_package`)
///
/// Runs the whole pipeline for `config` and returns the path written.
///
/// ## Errors
///
/// Every failure is terminal. The output file is only written once the complete
/// package is in memory, so a failed run leaves no package behind.
pub fn build_package(config: &PackConfig) -> Result<PathBuf> {
    let (control_dir, data_dir) = validate_input(&config.input_dir)?;

    let control_tar_gz = archive_subtree(&control_dir, &config.archive)?;
    let data_tar_gz = archive_subtree(&data_dir, &config.archive)?;

    let package = staging::with_staging(config.scratch_dir.as_deref(), |layout| {
        layout.write_members(&control_tar_gz, &data_tar_gz)?;
        // Members must always appear in the same order inside the package.
        let options = ArchiveOptions {
            order: EntryOrder::Sorted,
            ..config.archive.clone()
        };
        tar::create_package_tar(layout.path(), &options)?.ok_or_else(|| {
            MkipkError::EmptyStaging {
                path: layout.path().to_path_buf(),
            }
            .into()
        })
    })?;

    let output_path =
        output::resolve_output_path(&config.output, &config.input_dir, &config.extension)?;
    io::write_bytes_to_file(&output_path, &package)?;
    info!(
        "Wrote {} bytes to '{}'",
        package.len(),
        output_path.display()
    );
    Ok(output_path)
}

/// Checks the input root and returns its `control/` and `data/` paths.
fn validate_input(input_dir: &Path) -> Result<(PathBuf, PathBuf)> {
    if !io::is_dir(input_dir) {
        anyhow::bail!(MkipkError::InvalidInputDir {
            path: input_dir.to_path_buf()
        });
    }

    let control_dir = input_dir.join(CONTROL_DIR_NAME);
    let data_dir = input_dir.join(DATA_DIR_NAME);
    for (name, path) in [(CONTROL_DIR_NAME, &control_dir), (DATA_DIR_NAME, &data_dir)] {
        if !io::is_dir(path) {
            anyhow::bail!(MkipkError::MissingSubtree {
                name,
                path: path.clone()
            });
        }
    }
    Ok((control_dir, data_dir))
}

/// Archives one subtree. An empty subtree becomes a zero-length member.
fn archive_subtree(dir: &Path, options: &ArchiveOptions) -> Result<Vec<u8>> {
    let archive = tar::create_package_tar(dir, options)
        .with_context(|| format!("Failed to archive '{}'", dir.display()))?;
    Ok(archive.unwrap_or_else(|| {
        warn!("'{}' is empty; its archive member will be empty", dir.display());
        Vec::new()
    }))
}
