//! Remote dependency classification.
//!
//! Deciding whether an import path names a remotely hosted package is done
//! offline, purely from the string. Probing the host (as `go get` does) could
//! trigger credential prompts, so the default [`HostHeuristic`] only looks for
//! a dot in what would be the host name of `http://<import path>`.
//!
//! Known approximation: dotted local paths count as remote and dot-less remote
//! hosts do not.

use url::Url;

pub trait RemoteClassifier {
    fn is_remote(&self, import_path: &str) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HostHeuristic;

impl RemoteClassifier for HostHeuristic {
    fn is_remote(&self, import_path: &str) -> bool {
        if is_local_import(import_path) {
            return false;
        }

        match Url::parse(&format!("http://{}", import_path)) {
            Ok(url) => url.host_str().is_some_and(|host| host.contains('.')),
            Err(_) => false,
        }
    }
}

/// `.`, `..`, `./…` and `../…` are relative to the importing package.
pub fn is_local_import(import_path: &str) -> bool {
    import_path == "."
        || import_path == ".."
        || import_path.starts_with("./")
        || import_path.starts_with("../")
}

/// First path segment of an import path, i.e. its would-be host.
pub fn import_host(import_path: &str) -> &str {
    import_path.split('/').next().unwrap_or(import_path)
}
