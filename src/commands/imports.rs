//! `gvx imports` handler.
//!
//! Rebuilds the manifest and removes everything in `vendor/` before crawling,
//! so the result is always the full transitive closure of the current tree.
//! Works for dependencies without manifests of their own: everything found is
//! added to the project's manifest as a direct entry.

use crate::config::load_config;
use crate::deps::{GitFetcher, Orchestrator, VendorOptions};
use anyhow::{Context, Result};
use colored::*;
use std::path::Path;

pub fn run_imports(project_root: &Path, insecure: bool) -> Result<()> {
    let config = load_config(project_root)?;
    let options = VendorOptions::from_config(&config, project_root, insecure);
    let manifest_path = options.manifest_path.clone();

    println!(
        "{} Vendoring imports of {}...",
        "📦".blue(),
        project_root.display()
    );
    if options.allow_insecure {
        println!("{} Insecure transports are allowed", "!".yellow());
    }

    let mut orchestrator = Orchestrator::new(GitFetcher, options);
    let manifest = orchestrator
        .vendor_project(project_root)
        .context("Vendoring failed")?;

    if manifest.is_empty() {
        println!("{} No remote imports found.", "✓".green());
    } else {
        println!(
            "{} Vendored {} packages, manifest written to {}",
            "✓".green(),
            manifest.len(),
            manifest_path.display()
        );
    }
    Ok(())
}
