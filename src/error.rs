//! Error types for the vendoring core.
//!
//! Every failure aborts the whole run, so there is no recovery logic here;
//! the variants only exist so callers (and tests) can tell the kinds apart.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, VendError>;

#[derive(Error, Debug)]
pub enum VendError {
    /// A source file's package clause or import section is malformed.
    #[error("{}:{line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Could not walk in dir {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to fetch '{import_path}': {reason}")]
    Fetch { import_path: String, reason: String },

    /// `path` is empty for in-memory failures such as duplicate entries.
    #[error("Manifest error: {reason}")]
    Manifest { path: PathBuf, reason: String },

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    /// Import path that cannot be safely joined onto the vendor directory.
    #[error("Refusing to vendor '{0}': not a clean relative import path")]
    UnsafeImportPath(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl VendError {
    pub fn fetch(import_path: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            import_path: import_path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn manifest(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        let path = path.into();
        Self::Manifest {
            reason: format!("{}: {}", path.display(), reason.to_string()),
            path,
        }
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
