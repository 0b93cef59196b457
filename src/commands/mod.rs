//! CLI command handlers
//!
//! Thin wrappers that load configuration, call into the library and report
//! results. Errors are returned as `anyhow` errors for `main` to print.

pub mod imports;
pub mod list;
