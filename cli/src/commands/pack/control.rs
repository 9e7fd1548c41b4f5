//! # mkipk Control Metadata Reader
//!
//! File: cli/src/commands/pack/control.rs
//!
//! ## Overview
//!
//! Reads package identity from `<input>/control/control`, the opkg control file.
//! Only three keys matter for packaging: `Package`, `Version`, and the optional
//! `Architecture`. Everything else in the file (dependencies, maintainer,
//! description, ...) is carried into `control.tar.gz` verbatim and ignored here.
//!
//! ## Parsing rules
//!
//! - The file is decoded leniently: invalid UTF-8 becomes U+FFFD, so legacy
//!   Latin-1 descriptions do not stop a build.
//! - Lines are trimmed; blank lines are skipped.
//! - Each line is split on its first `:`. Lines without a colon are ignored.
//! - Keys match case-insensitively; keys and values are trimmed.
//! - A repeated key keeps its last value.
//! - `Package` and `Version` must end up non-empty.
//!
//! ```rust
//! let metadata = control::read_control(Path::new("pkg"))?;
//! assert_eq!(metadata.file_name("ipk"), "foo_1.2.3_mips.ipk");
//! ```
//!
use super::CONTROL_DIR_NAME;
use crate::common::fs::io;
use crate::core::error::{MkipkError, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the metadata file inside the control subtree.
pub const CONTROL_FILE_NAME: &str = "control";

/// Package identity parsed from the control file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub architecture: Option<String>,
}

impl PackageMetadata {
    /// Parses control file text. See the module docs for the rules applied.
    pub fn parse(content: &str) -> Result<Self> {
        let mut name = None;
        let mut version = None;
        let mut architecture = None;

        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim().to_string();
            match key.trim().to_ascii_lowercase().as_str() {
                "package" => name = Some(value),
                "version" => version = Some(value),
                "architecture" => architecture = Some(value),
                _ => {}
            }
        }

        let name = name
            .filter(|v| !v.is_empty())
            .ok_or(MkipkError::MissingField { field: "Package" })?;
        let version = version
            .filter(|v| !v.is_empty())
            .ok_or(MkipkError::MissingField { field: "Version" })?;

        Ok(Self {
            name,
            version,
            architecture,
        })
    }

    /// Derives `<name>_<version>[_<arch>].<extension>`.
    ///
    /// An empty architecture value is treated the same as a missing one.
    pub fn file_name(&self, extension: &str) -> String {
        match self.architecture.as_deref().filter(|a| !a.is_empty()) {
            Some(arch) => format!("{}_{}_{}.{}", self.name, self.version, arch, extension),
            None => format!("{}_{}.{}", self.name, self.version, extension),
        }
    }
}

/// Path of the control file inside a package input root.
pub fn control_file_path(input_root: &Path) -> PathBuf {
    input_root.join(CONTROL_DIR_NAME).join(CONTROL_FILE_NAME)
}

/// # Read Control Metadata (`read_control`)
///
/// Reads and parses `<input_root>/control/control`.
///
/// ## Errors
///
/// Fails if the file cannot be read, or with `MkipkError::MissingField` when
/// `Package` or `Version` is absent.
pub fn read_control(input_root: &Path) -> Result<PackageMetadata> {
    let path = control_file_path(input_root);
    let bytes = io::read_file_to_bytes(&path)?;
    let content = String::from_utf8_lossy(&bytes);
    let metadata = PackageMetadata::parse(&content)
        .with_context(|| format!("Invalid control file '{}'", path.display()))?;
    debug!("Parsed control metadata: {:?}", metadata);
    Ok(metadata)
}
