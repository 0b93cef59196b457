//! # gvx - recursive vendoring for Go source trees
//!
//! gvx reads the imports of every `.go` file in a project, picks out the ones
//! that name remotely hosted packages, fetches each into `vendor/`, and then
//! does the same inside every fetched package until the whole transitive
//! closure is vendored.
//!
//! ## Quick Start
//!
//! ```bash
//! # Rebuild vendor/ and vendor/manifest from the current tree
//! gvx imports
//!
//! # Show what is vendored
//! gvx list
//! ```
//!
//! ## Module Organization
//!
//! - [`imports`] - Import extraction and tree-wide collection
//! - [`remote`] - Remote dependency classification
//! - [`deps`] - Fetching and the recursive vendoring driver
//! - [`manifest`] - The `vendor/manifest` record of vendored packages
//! - [`config`] - Configuration parsing (`gvx.toml`)

/// CLI command handlers.
pub mod commands;

/// Configuration file parsing (`gvx.toml`).
pub mod config;

/// Dependency fetching and recursive vendoring.
pub mod deps;

/// Error types shared by the library.
pub mod error;

/// Import extraction from Go sources.
pub mod imports;

/// Vendor manifest management.
pub mod manifest;

/// Remote import classification.
pub mod remote;

/// Terminal UI utilities (tables).
pub mod ui;

pub use error::{Result, VendError};
