use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::MODEL_FILE_SUFFIX;

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &[".git", "target", "node_modules"];

/// Result of scanning for compilation dumps.
pub struct ScanResult {
    pub files: BTreeSet<PathBuf>,
    pub skipped_count: usize,
}

/// Collects every `*.cmodel.json` file under `base_dir`.
pub fn scan_model_files(base_dir: &Path) -> ScanResult {
    let mut files = BTreeSet::new();
    let mut skipped_count = 0;

    let walker = WalkDir::new(base_dir)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped_count += 1;
                warn!(error = %e, "cannot access path");
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_file() && is_model_file(path) {
            files.insert(path.to_path_buf());
        }
    }

    debug!(
        root = %base_dir.display(),
        found = files.len(),
        skipped = skipped_count,
        "scanned for compilation dumps"
    );
    ScanResult {
        files,
        skipped_count,
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_model_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.len() > MODEL_FILE_SUFFIX.len() && n.ends_with(MODEL_FILE_SUFFIX))
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_scan_model_files() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        File::create(dir_path.join("App.cmodel.json")).unwrap();
        File::create(dir_path.join("App.json")).unwrap();
        File::create(dir_path.join("Main.cs")).unwrap();

        let result = scan_model_files(dir_path);

        assert_eq!(result.files.len(), 1);
        assert!(result.files.iter().any(|f| f.ends_with("App.cmodel.json")));
        assert_eq!(result.skipped_count, 0);
    }

    #[test]
    fn test_scan_nested_directories_in_order() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let gui = dir_path.join("Gui");
        fs::create_dir(&gui).unwrap();
        File::create(gui.join("Gui.cmodel.json")).unwrap();
        File::create(dir_path.join("Core.cmodel.json")).unwrap();

        let result = scan_model_files(dir_path);
        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.strip_prefix(dir_path).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("Core.cmodel.json"),
                Path::new("Gui").join("Gui.cmodel.json"),
            ]
        );
    }

    #[test]
    fn test_scan_skips_build_directories() {
        let dir = tempdir().unwrap();
        let dir_path = dir.path();

        let target = dir_path.join("target");
        fs::create_dir(&target).unwrap();
        File::create(target.join("Stale.cmodel.json")).unwrap();
        File::create(dir_path.join("App.cmodel.json")).unwrap();

        let result = scan_model_files(dir_path);
        assert_eq!(result.files.len(), 1);
        assert!(!result.files.iter().any(|f| f.starts_with(&target)));
    }

    #[test]
    fn test_is_model_file() {
        assert!(is_model_file(Path::new("App.cmodel.json")));
        assert!(is_model_file(Path::new("out/Gui.cmodel.json")));
        assert!(!is_model_file(Path::new(".cmodel.json")));
        assert!(!is_model_file(Path::new("App.json")));
        assert!(!is_model_file(Path::new("App.cs")));
    }
}
