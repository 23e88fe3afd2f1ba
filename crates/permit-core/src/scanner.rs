//! Directory scanner for discovering supported input files

use crate::reader;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively collect every supported input file under a root directory
///
/// Unreadable entries are skipped. The result is sorted lexicographically so
/// a batch run always processes files in the same order, which also fixes
/// which copy of a duplicated row survives deduplication.
pub fn scan_input_dir<P: AsRef<Path>>(root: P) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root.as_ref())
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| reader::is_supported(path))
        .collect();

    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_collects_supported_files_sorted() {
        let root = std::env::temp_dir().join(format!("permit-scan-test-{}", std::process::id()));
        let nested = root.join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("b.csv"), "a\n1\n").unwrap();
        fs::write(nested.join("a.xlsx"), "stub").unwrap();
        fs::write(root.join("notes.txt"), "ignored").unwrap();

        let files = scan_input_dir(&root);
        fs::remove_dir_all(&root).unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("b.csv"));
        assert!(files[1].ends_with("nested/a.xlsx"));
    }

    #[test]
    fn test_scan_missing_directory_is_empty() {
        let root = std::env::temp_dir().join("permit-scan-test-no-such-dir");
        assert!(scan_input_dir(&root).is_empty());
    }
}
