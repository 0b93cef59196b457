//! Import discovery.
//!
//! - [`extract_imports`] reads the import section of a single source file
//! - [`collect_imports`] walks a directory tree and merges every file's imports

mod collect;
mod parser;

pub use collect::{ImportSet, collect_imports};
pub use parser::{SyntaxError, extract_imports, parse_imports};
