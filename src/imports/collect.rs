use super::parser::extract_imports;
use crate::error::{Result, VendError};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Deduplicated import paths of one directory subtree.
pub type ImportSet = BTreeSet<String>;

/// Walk `root` and gather the imports of every file ending in `suffix`.
///
/// Any unreadable entry aborts the walk. Classification happens later, so
/// duplicates are merged here before any remote check runs.
pub fn collect_imports(root: &Path, suffix: &str) -> Result<ImportSet> {
    let mut imports = ImportSet::new();
    let mut files = 0usize;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| VendError::Walk {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e,
        })?;

        if !entry.file_type().is_file() || !entry.file_name().to_string_lossy().ends_with(suffix)
        {
            continue;
        }

        trace!(file = %entry.path().display(), "reading imports");
        imports.extend(extract_imports(entry.path())?);
        files += 1;
    }

    debug!(
        root = %root.display(),
        files,
        imports = imports.len(),
        "collected imports"
    );
    Ok(imports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collect_merges_duplicates_across_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("cmd/tool")).unwrap();
        fs::write(
            dir.path().join("main.go"),
            "package main\nimport (\n\"fmt\"\n\"github.com/a/b\"\n)\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("cmd/tool/tool.go"),
            "package tool\nimport \"github.com/a/b\"\nimport \"golang.org/x/net/html\"\n",
        )
        .unwrap();

        let imports = collect_imports(dir.path(), ".go").unwrap();
        let expected: ImportSet = ["fmt", "github.com/a/b", "golang.org/x/net/html"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(imports, expected);
    }

    #[test]
    fn test_collect_ignores_other_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "not go source").unwrap();
        fs::write(dir.path().join("go.mod"), "module example.com/m").unwrap();
        fs::write(dir.path().join("a.go"), "package a\nimport \"strings\"\n").unwrap();

        let imports = collect_imports(dir.path(), ".go").unwrap();
        assert_eq!(imports.len(), 1);
        assert!(imports.contains("strings"));
    }

    #[test]
    fn test_collect_skips_directories_named_like_sources() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("weird.go")).unwrap();

        assert!(collect_imports(dir.path(), ".go").unwrap().is_empty());
    }

    #[test]
    fn test_collect_propagates_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.go"), "package ok\n").unwrap();
        fs::write(dir.path().join("bad.go"), "packag bad\n").unwrap();

        let err = collect_imports(dir.path(), ".go").unwrap_err();
        assert!(matches!(err, VendError::Parse { ref path, .. } if path.ends_with("bad.go")));
    }

    #[test]
    fn test_collect_missing_root_is_walk_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = collect_imports(&missing, ".go").unwrap_err();
        assert!(matches!(err, VendError::Walk { ref path, .. } if *path == missing));
    }
}
