//! Fetching a remote package into vendor storage.
//!
//! The orchestrator only needs "materialise this import path at `dest` and
//! describe what you got", which is the [`Fetcher`] trait. [`GitFetcher`]
//! clones the hosting repository into a scratch directory and copies just the
//! package directory out of it.

use super::repo::deduce_repo;
use crate::error::{Result, VendError};
use crate::manifest::ManifestDependency;
use colored::*;
use git2::Repository;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;
use tracing::debug;

pub trait Fetcher {
    /// Materialise `import_path` at `dest` and return its manifest record.
    fn fetch(
        &mut self,
        import_path: &str,
        dest: &Path,
        allow_insecure: bool,
    ) -> Result<ManifestDependency>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl Fetcher for GitFetcher {
    fn fetch(
        &mut self,
        import_path: &str,
        dest: &Path,
        allow_insecure: bool,
    ) -> Result<ManifestDependency> {
        let remote = deduce_repo(import_path);
        debug!(import_path, root = %remote.root, subpath = %remote.subpath, "deduced repository");

        let staging = tempfile::tempdir()
            .map_err(|e| VendError::io("Failed to create staging directory", e))?;

        let schemes: &[&str] = if allow_insecure {
            &["https", "http"]
        } else {
            &["https"]
        };

        let mut last_err = None;
        let mut cloned = None;
        for scheme in schemes {
            let url = remote.url(scheme);
            let checkout = staging.path().join(scheme);
            match clone_with_spinner(import_path, &url, &checkout) {
                Ok(repo) => {
                    cloned = Some((url, checkout, repo));
                    break;
                }
                Err(err) => {
                    debug!(%url, %err, "clone attempt failed");
                    last_err = Some(err);
                }
            }
        }
        let Some((url, checkout, repo)) = cloned else {
            let reason = last_err.map_or_else(|| "no transport available".to_string(), |e| e.to_string());
            return Err(VendError::fetch(import_path, reason));
        };

        let (revision, branch) =
            head_info(&repo).map_err(|e| VendError::fetch(import_path, e.message()))?;

        let package_dir = checkout.join(remote.subpath.trim_start_matches('/'));
        if !package_dir.is_dir() {
            return Err(VendError::fetch(
                import_path,
                format!("package directory '{}' not found in {}", remote.subpath, url),
            ));
        }

        if dest.exists() {
            fs::remove_dir_all(dest)
                .map_err(|e| VendError::io(format!("Failed to clear {}", dest.display()), e))?;
        }
        copy_package(&package_dir, dest)?;

        Ok(ManifestDependency {
            importpath: import_path.to_string(),
            repository: url,
            revision,
            branch,
            path: remote.subpath,
        })
    }
}

fn clone_with_spinner(
    name: &str,
    url: &str,
    into: &Path,
) -> std::result::Result<Repository, git2::Error> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷"),
    );
    pb.set_message(format!("Downloading {}...", name));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    match Repository::clone(url, into) {
        Ok(repo) => {
            pb.finish_with_message(format!("{} Downloaded {}", "✓".green(), name));
            Ok(repo)
        }
        Err(err) => {
            pb.finish_with_message(format!("{} Failed {} ({})", "x".red(), name, url));
            Err(err)
        }
    }
}

/// HEAD commit and the checked-out branch (`HEAD` when detached).
fn head_info(repo: &Repository) -> std::result::Result<(String, String), git2::Error> {
    let head = repo.head()?;
    let commit = head.peel_to_commit()?;
    let branch = if head.is_branch() {
        head.shorthand().unwrap_or("HEAD").to_string()
    } else {
        "HEAD".to_string()
    };
    Ok((commit.id().to_string(), branch))
}

/// Recursive copy that leaves repository metadata behind.
fn copy_package(src: &Path, dst: &Path) -> Result<()> {
    fs::create_dir_all(dst)
        .map_err(|e| VendError::io(format!("Failed to create {}", dst.display()), e))?;

    let entries = fs::read_dir(src)
        .map_err(|e| VendError::io(format!("Failed to read {}", src.display()), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| VendError::io(format!("Failed to read {}", src.display()), e))?;
        if entry.file_name() == ".git" {
            continue;
        }

        let ty = entry
            .file_type()
            .map_err(|e| VendError::io(format!("Failed to stat {}", entry.path().display()), e))?;
        let target = dst.join(entry.file_name());
        if ty.is_dir() {
            copy_package(&entry.path(), &target)?;
        } else if ty.is_file() {
            fs::copy(entry.path(), &target)
                .map_err(|e| VendError::io(format!("Failed to copy {}", entry.path().display()), e))?;
        }
    }
    Ok(())
}
