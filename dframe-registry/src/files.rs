use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursively lists files under `dir` with the given extension, in path order.
///
/// A missing directory yields an empty list. Unreadable entries are skipped.
pub fn list_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_files_recurses_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("admin/nested")).unwrap();
        std::fs::write(dir.path().join("ping.toml"), "").unwrap();
        std::fs::write(dir.path().join("admin/ban.toml"), "").unwrap();
        std::fs::write(dir.path().join("admin/nested/kick.toml"), "").unwrap();
        std::fs::write(dir.path().join("README.md"), "").unwrap();

        let files = list_files(dir.path(), "toml");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["admin/ban.toml", "admin/nested/kick.toml", "ping.toml"]);
    }

    #[test]
    fn test_list_files_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_files(&dir.path().join("nope"), "toml").is_empty());
    }
}
