//! # mkipk Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//!
//! ## Overview
//!
//! Archive construction for package building. Both sub-archives of a package
//! (`control.tar.gz`, `data.tar.gz`) and the outer package itself are produced
//! by the same routine, so everything about member naming, ownership, and
//! compression lives here.
//!
//! ## Architecture
//!
//! - **`tar`**: Walks a directory and emits a normalized tar stream
//!   (`./`-prefixed names, forced ownership), then compresses it.
//! - **`compression`**: Gzip encoding with the Unix OS byte in the header.
//!
//! ```rust
//! use crate::common::archive::tar::{create_package_tar, ArchiveOptions};
//!
//! let data_tar_gz = create_package_tar(Path::new("pkg/data"), &ArchiveOptions::default())?;
//! ```
//!

pub mod compression;
pub mod tar;
