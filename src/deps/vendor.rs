//! Recursive import vendoring.
//!
//! Starting from the project root, every remote import that is not yet in the
//! manifest is fetched into the vendor directory, and the same process runs
//! inside the fetched package so its own imports get vendored too. Packages
//! that re-import something already vendored are pruned by the manifest
//! check, which is what stops dependency cycles.
//!
//! Directories are passed explicitly; the process working directory is never
//! changed.

use super::fetch::Fetcher;
use crate::config::GvxConfig;
use crate::error::{Result, VendError};
use crate::imports::{ImportSet, collect_imports};
use crate::manifest::Manifest;
use crate::remote::{HostHeuristic, RemoteClassifier, import_host};
use colored::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, debug_span};

/// Fixed delay before fetching from hosts that rate-limit clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    pub hosts: Vec<String>,
    pub delay: Duration,
}

impl Pacing {
    pub fn none() -> Self {
        Self {
            hosts: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn applies_to(&self, import_path: &str) -> bool {
        let host = import_host(import_path);
        !self.delay.is_zero() && self.hosts.iter().any(|h| h == host)
    }
}

#[derive(Debug, Clone)]
pub struct VendorOptions {
    /// Project-wide vendor storage; every fetched package lands below it.
    pub vendor_dir: PathBuf,
    pub manifest_path: PathBuf,
    /// Name of the vendor directory a fetched package may ship on its own.
    pub vendor_dir_name: String,
    pub source_suffix: String,
    pub allow_insecure: bool,
    pub pacing: Pacing,
}

impl VendorOptions {
    pub fn from_config(config: &GvxConfig, project_root: &Path, allow_insecure: bool) -> Self {
        Self {
            vendor_dir: config.vendor_dir(project_root),
            manifest_path: config.manifest_path(project_root),
            vendor_dir_name: config.vendor.dir.clone(),
            source_suffix: config.vendor.source_suffix.clone(),
            allow_insecure: allow_insecure || config.fetch.insecure,
            pacing: Pacing {
                hosts: config.pacing.hosts.clone(),
                delay: config.pacing.delay(),
            },
        }
    }
}

pub struct Orchestrator<F, C = HostHeuristic> {
    fetcher: F,
    classifier: C,
    options: VendorOptions,
}

impl<F: Fetcher> Orchestrator<F, HostHeuristic> {
    pub fn new(fetcher: F, options: VendorOptions) -> Self {
        Self::with_classifier(fetcher, HostHeuristic, options)
    }
}

impl<F: Fetcher, C: RemoteClassifier> Orchestrator<F, C> {
    pub fn with_classifier(fetcher: F, classifier: C, options: VendorOptions) -> Self {
        Self {
            fetcher,
            classifier,
            options,
        }
    }

    pub fn options(&self) -> &VendorOptions {
        &self.options
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Rebuild the vendor directory of `project_root` from scratch.
    ///
    /// Existing vendor storage is deleted, the manifest reloaded (empty after
    /// the delete), the whole tree vendored, and the manifest saved. Nothing
    /// is saved if any step fails.
    pub fn vendor_project(&mut self, project_root: &Path) -> Result<Manifest> {
        let vendor_dir = &self.options.vendor_dir;
        match fs::remove_dir_all(vendor_dir) {
            Ok(()) => debug!(dir = %vendor_dir.display(), "removed existing vendor directory"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                return Err(VendError::io(
                    format!("Failed to remove {}", vendor_dir.display()),
                    e,
                ));
            }
        }

        let mut manifest = Manifest::load(&self.options.manifest_path)?;
        self.vendor(project_root, true, &mut manifest)?;
        manifest.save(&self.options.manifest_path)?;
        Ok(manifest)
    }

    /// Vendor every remote, not-yet-vendored import found under `dir`.
    pub fn vendor(&mut self, dir: &Path, is_root: bool, manifest: &mut Manifest) -> Result<()> {
        let span = debug_span!("vendor", dir = %dir.display(), is_root);
        let _enter = span.enter();

        for import_path in self.worklist(dir, is_root, manifest)? {
            // a nested call may have vendored it since the worklist was built
            if manifest.contains(&import_path) {
                println!("   {} {} already vendored", "!".yellow(), import_path);
                continue;
            }

            validate_import_path(&import_path)?;

            if self.options.pacing.applies_to(&import_path) {
                debug!(import_path = %import_path, delay = ?self.options.pacing.delay, "pacing fetch");
                std::thread::sleep(self.options.pacing.delay);
            }

            let dest = self.options.vendor_dir.join(&import_path);
            println!("   {} Fetching {}", "+".green(), import_path.bold());
            let dep = self
                .fetcher
                .fetch(&import_path, &dest, self.options.allow_insecure)?;
            // the manifest key is what prunes cycles
            if dep.importpath != import_path {
                return Err(VendError::fetch(
                    import_path,
                    format!("fetcher recorded it as '{}'", dep.importpath),
                ));
            }
            println!(
                "   {} Vendored {} @ {}",
                "✓".green(),
                import_path,
                short_rev(&dep.revision)
            );
            manifest.add(dep)?;

            self.vendor(&dest, false, manifest)?;
        }

        Ok(())
    }

    /// Remote imports of `dir` that the manifest does not know yet.
    fn worklist(&self, dir: &Path, is_root: bool, manifest: &Manifest) -> Result<Vec<String>> {
        let ships_vendor_dir = dir.join(&self.options.vendor_dir_name).is_dir();
        let imports = if is_root || !ships_vendor_dir {
            collect_imports(dir, &self.options.source_suffix)?
        } else {
            debug!("package ships its own vendor directory, not crawling");
            ImportSet::new()
        };

        let worklist: Vec<String> = imports
            .into_iter()
            .filter(|path| self.classifier.is_remote(path))
            .filter(|path| !manifest.contains(path))
            .collect();
        debug!(pending = worklist.len(), "built worklist");
        Ok(worklist)
    }
}

/// Import paths become directories under the vendor dir, so they must not
/// be able to climb out of it.
pub fn validate_import_path(import_path: &str) -> Result<()> {
    let unsafe_path = import_path.is_empty()
        || import_path.starts_with('/')
        || import_path.contains('\\')
        || import_path
            .split('/')
            .any(|seg| seg.is_empty() || seg == "." || seg == "..");

    if unsafe_path {
        return Err(VendError::UnsafeImportPath(import_path.to_string()));
    }
    Ok(())
}

fn short_rev(rev: &str) -> &str {
    rev.get(..7).unwrap_or(rev)
}
