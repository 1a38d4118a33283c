//! # Scanr Common
//!
//! Types and pure helpers shared by every crate in the workspace:
//!
//! * **[`network`]**: target expansion (addresses, hostnames, CIDR blocks) and port specs.
//! * **[`report`]**: the result records produced by a scan.
//! * **[`config`]**: scan configuration.
//! * **[`error`]**: input errors that abort a run before any probing begins.
//! * **[`log`]**: logging macros used across the workspace.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod report;
