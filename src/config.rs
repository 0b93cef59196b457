//! Project configuration (`gvx.toml`).
//!
//! The file is optional. Every key has a default, so a project without one
//! vendors into `./vendor` with the manifest at `./vendor/manifest`.

use crate::error::{Result, VendError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = "gvx.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GvxConfig {
    pub vendor: VendorConfig,
    pub fetch: FetchConfig,
    pub pacing: PacingConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct VendorConfig {
    pub dir: String,
    pub manifest: String,
    pub source_suffix: String,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            dir: "vendor".to_string(),
            manifest: "manifest".to_string(),
            source_suffix: ".go".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub insecure: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PacingConfig {
    pub hosts: Vec<String>,
    pub delay_secs: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            hosts: vec!["github.com".to_string()],
            delay_secs: 5,
        }
    }
}

impl PacingConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs(self.delay_secs)
    }
}

impl GvxConfig {
    pub fn vendor_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.vendor.dir)
    }

    pub fn manifest_path(&self, project_root: &Path) -> PathBuf {
        self.vendor_dir(project_root).join(&self.vendor.manifest)
    }
}

/// Load `gvx.toml` from `project_root`, falling back to defaults when absent.
pub fn load_config(project_root: &Path) -> Result<GvxConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GvxConfig::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| VendError::io(format!("Failed to read {}", path.display()), e))?;
    let config: GvxConfig = toml::from_str(&content).map_err(|e| VendError::Config {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    // the vendor dir is deleted wholesale on every run
    for (key, value) in [
        ("vendor.dir", &config.vendor.dir),
        ("vendor.manifest", &config.vendor.manifest),
    ] {
        if !is_clean_relative(value) {
            return Err(VendError::Config {
                path,
                reason: format!("{key} must be a clean relative path, got {value:?}"),
            });
        }
    }
    Ok(config)
}

fn is_clean_relative(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && !value.contains(['\\', ':'])
        && !Path::new(value).is_absolute()
        && value
            .split('/')
            .all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config, GvxConfig::default());
        assert_eq!(config.vendor.source_suffix, ".go");
        assert_eq!(config.pacing.hosts, vec!["github.com".to_string()]);
        assert_eq!(config.pacing.delay(), Duration::from_secs(5));
        assert_eq!(
            config.manifest_path(dir.path()),
            dir.path().join("vendor").join("manifest")
        );
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
[vendor]
dir = "third_party"

[pacing]
delay-secs = 0
"#,
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.vendor.dir, "third_party");
        assert_eq!(config.vendor.manifest, "manifest");
        assert_eq!(config.pacing.delay_secs, 0);
        assert_eq!(config.pacing.hosts, vec!["github.com".to_string()]);
        assert!(!config.fetch.insecure);
    }

    #[test]
    fn test_unknown_key_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[vendor]\nfolder = \"x\"\n").unwrap();

        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, VendError::Config { .. }));
    }

    #[test]
    fn test_empty_vendor_dir_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[vendor]\ndir = \"\"\n").unwrap();

        assert!(matches!(
            load_config(dir.path()),
            Err(VendError::Config { .. })
        ));
    }

    #[test]
    fn test_vendor_paths_must_stay_inside_project() {
        let dir = tempfile::tempdir().unwrap();
        for bad in [".", "..", "/tmp/x", "a/../b", "a//b", "vendor/", "..\\x", "C:x", " "] {
            for key in ["dir", "manifest"] {
                fs::write(
                    dir.path().join(CONFIG_FILE),
                    format!("[vendor]\n{key} = {bad:?}\n"),
                )
                .unwrap();
                assert!(
                    matches!(load_config(dir.path()), Err(VendError::Config { .. })),
                    "{key} = {bad:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_nested_vendor_dir_accepted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[vendor]\ndir = \"third_party/go\"\nmanifest = \"meta/manifest.json\"\n",
        )
        .unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(
            config.manifest_path(dir.path()),
            dir.path().join("third_party/go").join("meta/manifest.json")
        );
    }
}
