//! # mkipk Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by the command and utility modules. At present
//! this is the error system:
//! - `error`: The `MkipkError` enum and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::error::{MkipkError, Result};
//! ```
//!
pub mod error;
