//! # mkipk Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Command handlers invoked from `main.rs`. mkipk has a single operation,
//! building a package, implemented by the `pack` module: it defines its own
//! argument structure (`PackArgs`) and handler (`handle_pack`).
//!

/// Builds an `.ipk` package from a `control/` + `data/` input tree.
pub mod pack;
