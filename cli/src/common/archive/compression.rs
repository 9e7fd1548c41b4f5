//! # mkipk Compression Utilities (`common::archive::compression`)
//!
//! File: cli/src/common/archive/compression.rs
//!
//! ## Overview
//!
//! Gzip encoding for finished tar streams. Package managers in the opkg family
//! inspect the OS byte of the gzip header, so every stream produced here is
//! stamped as Unix (`3`) regardless of the host that built it.
//!
//! ```rust
//! let tar_bytes: Vec<u8> = build_tar()?;
//! let tar_gz = compression::gzip_unix(&tar_bytes)?;
//! ```
//!
use crate::core::error::Result;
use anyhow::Context;
use flate2::{Compression, GzBuilder};
use std::io::Write;

/// Value of the gzip header OS field for Unix (RFC 1952).
pub const GZIP_OS_UNIX: u8 = 3;

/// Compresses `data` as a single gzip member with the Unix OS byte and default level.
pub fn gzip_unix(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzBuilder::new()
        .operating_system(GZIP_OS_UNIX)
        .write(Vec::with_capacity(data.len() / 2), Compression::default());
    encoder
        .write_all(data)
        .context("Failed to write data to gzip stream")?;
    encoder
        .finish()
        .context("Failed to finish gzip compression stream")
}
