//! `gvx list` handler.

use crate::config::load_config;
use crate::manifest::Manifest;
use crate::ui;
use anyhow::Result;
use colored::*;
use std::path::Path;

pub fn list_vendored(project_root: &Path) -> Result<()> {
    let config = load_config(project_root)?;
    let manifest = Manifest::load(&config.manifest_path(project_root))?;

    if manifest.is_empty() {
        println!("{} Nothing vendored. Run 'gvx imports' first.", "ℹ".blue());
        return Ok(());
    }

    let mut table = ui::Table::new(&["Import Path", "Revision", "Repository"]);
    for dep in manifest.iter() {
        table.add_row(vec![
            dep.importpath.bold().to_string(),
            dep.revision.chars().take(12).collect(),
            dep.repository.dimmed().to_string(),
        ]);
    }
    table.print();
    Ok(())
}
