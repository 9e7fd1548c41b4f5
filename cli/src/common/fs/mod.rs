//! # mkipk Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem helpers for the packaging pipeline. Import the submodule
//! directly, e.g. `crate::common::fs::io::write_bytes_to_file`.
//!

/// Directory checks, file reads, and byte-buffer writes.
pub mod io;
