//! Mapping an import path to the repository that hosts it.
//!
//! `github.com/owner/repo/sub/pkg` lives in the repository
//! `github.com/owner/repo`, at sub-path `/sub/pkg`. Hosts with a fixed
//! `owner/repo` layout are matched explicitly, paths that spell out a `.git`
//! suffix split there, and anything else is taken as a repository root.

use regex::Regex;
use std::sync::LazyLock;

static KNOWN_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<root>(?:github\.com|bitbucket\.org|gitlab\.com)/[A-Za-z0-9_.\-]+/[A-Za-z0-9_.\-]+)(?P<rest>/.*)?$",
    )
    .expect("known-host pattern is valid")
});

static GIT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<root>[^/]+/(?:[^/]+/)*?[^/]+\.git)(?P<rest>/.*)?$")
        .expect("git-suffix pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepo {
    /// Import path of the repository root, without scheme.
    pub root: String,
    /// Package location inside the repository, `""` or starting with `/`.
    pub subpath: String,
}

impl RemoteRepo {
    pub fn url(&self, scheme: &str) -> String {
        format!("{}://{}", scheme, self.root)
    }
}

pub fn deduce_repo(import_path: &str) -> RemoteRepo {
    for pattern in [&*KNOWN_HOST, &*GIT_SUFFIX] {
        if let Some(caps) = pattern.captures(import_path) {
            return RemoteRepo {
                root: caps["root"].to_string(),
                subpath: caps
                    .name("rest")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            };
        }
    }

    RemoteRepo {
        root: import_path.to_string(),
        subpath: String::new(),
    }
}
