//! Dependency fetching and vendoring.
//!
//! - **Repository deduction**: map an import path to the repository hosting it
//! - **Fetching**: clone that repository and copy the package into `vendor/`
//! - **Vendoring**: the recursive crawl that drives both for a whole tree
//!
//! ## Commands
//!
//! - `gvx imports` - Rebuild `vendor/` from the imports of the current tree

mod fetch;
mod repo;
mod vendor;

pub use fetch::{Fetcher, GitFetcher};
pub use repo::{RemoteRepo, deduce_repo};
pub use vendor::{Orchestrator, Pacing, VendorOptions, validate_import_path};
