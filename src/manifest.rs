//! Vendor manifest (`vendor/manifest`).
//!
//! Records which import paths are vendored and at which revision. Entries stay
//! sorted by import path so two runs over the same tree write identical files.

use crate::error::{Result, VendError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub version: u32,
    #[serde(default)]
    pub dependencies: Vec<ManifestDependency>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ManifestDependency {
    pub importpath: String,
    pub repository: String,
    pub revision: String,
    pub branch: String,
    /// Sub-directory of the repository the package lives in, if not the root.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| VendError::manifest(path, e))?;
        let mut manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| VendError::manifest(path, e))?;

        manifest
            .dependencies
            .sort_by(|a, b| a.importpath.cmp(&b.importpath));
        if let Some(dup) = manifest
            .dependencies
            .windows(2)
            .find(|pair| pair[0].importpath == pair[1].importpath)
        {
            return Err(VendError::manifest(
                path,
                format!("duplicate entry for '{}'", dup[0].importpath),
            ));
        }
        Ok(manifest)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| VendError::manifest(path, e))?;
        }
        let mut content =
            serde_json::to_string_pretty(self).map_err(|e| VendError::manifest(path, e))?;
        content.push('\n');
        fs::write(path, content).map_err(|e| VendError::manifest(path, e))?;
        Ok(())
    }

    pub fn contains(&self, importpath: &str) -> bool {
        self.position(importpath).is_ok()
    }

    pub fn get(&self, importpath: &str) -> Option<&ManifestDependency> {
        self.position(importpath)
            .ok()
            .map(|idx| &self.dependencies[idx])
    }

    /// Insert a record, keeping the list sorted. Duplicates are rejected.
    pub fn add(&mut self, dep: ManifestDependency) -> Result<()> {
        match self.position(&dep.importpath) {
            Ok(_) => Err(VendError::Manifest {
                path: Default::default(),
                reason: format!("'{}' is already vendored", dep.importpath),
            }),
            Err(idx) => {
                self.dependencies.insert(idx, dep);
                Ok(())
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestDependency> {
        self.dependencies.iter()
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    fn position(&self, importpath: &str) -> std::result::Result<usize, usize> {
        self.dependencies
            .binary_search_by(|d| d.importpath.as_str().cmp(importpath))
    }
}
