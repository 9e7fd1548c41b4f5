//! # mkipk Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared utility modules used by the packaging command. Keeping them under
//! `common::` separates reusable mechanics (archives, filesystem I/O) from the
//! command-specific orchestration in `commands::`.
//!
//! - **`archive`**: Directory-to-`.tar.gz` building and gzip encoding.
//! - **`fs`**: Directory checks and byte-buffer file writes.
//!

/// Utilities for building gzipped tar archives.
pub mod archive;
/// Utilities for filesystem operations.
pub mod fs;
