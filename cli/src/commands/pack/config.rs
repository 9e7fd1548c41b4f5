//! # mkipk Packaging Configuration
//!
//! File: cli/src/commands/pack/config.rs
//!
//! ## Overview
//!
//! This module turns command-line arguments, plus an optional TOML file, into
//! the immutable `PackConfig` that is passed explicitly through the packaging
//! pipeline. Settings are taken from:
//! 1. Command-line arguments (highest priority)
//! 2. A config file: `--config <FILE>`, or `<input>/.mkipk.toml` if present
//! 3. Default values (lowest priority)
//!
//! ## Examples
//!
//! Configuration file format (every key optional):
//!
//! ```toml
//! owner = "root"
//! group = "root"
//! uid = 0
//! gid = 0
//! sort_entries = true
//! extension = "ipk"
//! scratch_dir = "../.scratch"   # relative to this file
//! ```
//!
//! ```rust
//! let config = load_and_merge_config(args)?;
//! println!("Packaging '{}' as {:?}", config.input_dir.display(), config.archive);
//! ```
//!
use crate::common::archive::tar::{ArchiveOptions, EntryOrder};
use crate::common::fs::io;
use crate::core::error::{MkipkError, Result};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up in the input root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".mkipk.toml";

/// Default extension for derived package file names.
pub const DEFAULT_EXTENSION: &str = "ipk";

/// Longest user/group name a tar header can store.
const MAX_OWNER_NAME_LEN: usize = 32;

/// # Packaging Arguments (`PackArgs`)
///
/// Command-line arguments for building a package.
#[derive(Parser, Debug)]
pub struct PackArgs {
    /// Input directory containing `control/` and `data/`.
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output package file, or an existing directory to place
    /// `<package>_<version>[_<arch>].ipk` in.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// TOML config file. Defaults to `<input>/.mkipk.toml` when it exists.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Owner name stamped on every archive entry [default: root].
    #[arg(long, value_name = "NAME")]
    pub owner: Option<String>,

    /// Group name stamped on every archive entry [default: root].
    #[arg(long, value_name = "NAME")]
    pub group: Option<String>,

    /// Numeric owner id stamped on every archive entry [default: 0].
    #[arg(long, value_name = "ID")]
    pub uid: Option<u64>,

    /// Numeric group id stamped on every archive entry [default: 0].
    #[arg(long, value_name = "ID")]
    pub gid: Option<u64>,

    /// Keep filesystem enumeration order instead of sorting entries by name.
    #[arg(long)]
    pub fs_order: bool,

    /// Sort entries by name even if the config file sets `sort_entries = false`.
    #[arg(long, conflicts_with = "fs_order")]
    pub sorted: bool,

    /// Extension used when deriving the output file name [default: ipk].
    #[arg(long, value_name = "EXT")]
    pub ext: Option<String>,

    /// Parent directory for the scratch staging directory [default: OS temp dir].
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,
}

/// # Effective Packaging Configuration (`PackConfig`)
///
/// Final settings after merging arguments, the config file, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    pub input_dir: PathBuf,
    /// Output file path or existing directory, as given.
    pub output: PathBuf,
    pub archive: ArchiveOptions,
    pub extension: String,
    pub scratch_dir: Option<PathBuf>,
}

/// Deserialized config file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    owner: Option<String>,
    group: Option<String>,
    uid: Option<u64>,
    gid: Option<u64>,
    sort_entries: Option<bool>,
    extension: Option<String>,
    scratch_dir: Option<PathBuf>,
}

/// # Load and Merge Configuration (`load_and_merge_config`)
///
/// ## Errors
///
/// Fails if an explicit `--config` file is missing, if any config file cannot be
/// parsed, or if the merged values are invalid (`MkipkError::Config`).
pub fn load_and_merge_config(args: PackArgs) -> Result<PackConfig> {
    let file_config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => {
            let default_path = args.input.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_config_file(&default_path)?
            } else {
                debug!("No config file at {}", default_path.display());
                FileConfig::default()
            }
        }
    };

    let defaults = ArchiveOptions::default();
    let sort_entries = if args.sorted {
        true
    } else if args.fs_order {
        false
    } else {
        file_config.sort_entries.unwrap_or(true)
    };
    let order = if sort_entries {
        EntryOrder::Sorted
    } else {
        EntryOrder::Filesystem
    };

    let config = PackConfig {
        input_dir: args.input,
        output: args.output,
        archive: ArchiveOptions {
            owner_name: args.owner.or(file_config.owner).unwrap_or(defaults.owner_name),
            group_name: args.group.or(file_config.group).unwrap_or(defaults.group_name),
            owner_id: args.uid.or(file_config.uid).unwrap_or(defaults.owner_id),
            group_id: args.gid.or(file_config.gid).unwrap_or(defaults.group_id),
            order,
        },
        extension: args
            .ext
            .or(file_config.extension)
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        scratch_dir: args.scratch_dir.or(file_config.scratch_dir),
    };

    config.validate()?;
    Ok(config)
}

/// Reads and parses a config file, resolving `scratch_dir` against its directory.
fn load_config_file(path: &Path) -> Result<FileConfig> {
    info!("Loading configuration from {}", path.display());
    let content = io::read_file_to_string(path)?;
    let mut file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    if let Some(scratch) = file_config.scratch_dir.take() {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        file_config.scratch_dir = Some(if scratch.is_relative() {
            base.join(scratch)
        } else {
            scratch
        });
    }
    Ok(file_config)
}

impl PackConfig {
    fn validate(&self) -> Result<()> {
        let ext = &self.extension;
        if ext.is_empty() || ext.contains(['/', '\\']) {
            anyhow::bail!(MkipkError::Config(format!(
                "extension '{}' must be non-empty and contain no path separators",
                ext
            )));
        }
        for (label, name) in [
            ("owner", &self.archive.owner_name),
            ("group", &self.archive.group_name),
        ] {
            if name.is_empty() || name.len() > MAX_OWNER_NAME_LEN {
                anyhow::bail!(MkipkError::Config(format!(
                    "{} name '{}' must be 1-{} bytes long",
                    label, name, MAX_OWNER_NAME_LEN
                )));
            }
        }
        Ok(())
    }
}
