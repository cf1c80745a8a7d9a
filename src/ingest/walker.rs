use crate::error::{Result, SatqaError};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A discovered record file
#[derive(Debug, Clone)]
pub struct RecordFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub file_size: u64,
}

/// Discover scraped-page record files under `root`.
///
/// Recursively walks the directory tree and keeps `.json` and `.jsonl` files
/// (case-insensitive), sorted by relative path. A `root` that is itself a
/// file is returned as the only entry.
pub fn discover_record_files(root: &Path) -> Result<Vec<RecordFile>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();

        if !path.is_file() || !is_record_file(path) {
            continue;
        }

        let relative_path = if path == root {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default()
        } else {
            path.strip_prefix(root)
                .map_err(|_| {
                    SatqaError::InvalidInput(format!(
                        "Failed to compute relative path for: {}",
                        path.display()
                    ))
                })?
                .to_string_lossy()
                .to_string()
        };

        files.push(RecordFile {
            relative_path,
            absolute_path: path.to_path_buf(),
            file_size: entry.metadata().map(|m| m.len()).unwrap_or(0),
        });
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::info!("Discovered {} record files in {}", files.len(), root.display());
    Ok(files)
}

fn is_record_file(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(extension.as_str(), "json" | "jsonl")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_record_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("crawl/2024")).unwrap();
        fs::write(root.join("sections.json"), "[]").unwrap();
        fs::write(root.join("crawl/2024/pages.JSONL"), "").unwrap();
        fs::write(root.join("notes.txt"), "plain text note").unwrap();
        fs::write(root.join("logo.png"), b"\x89PNG\r\n\x1a\n").unwrap();

        let files = discover_record_files(root).unwrap();
        let paths: Vec<_> = files.iter().map(|f| f.relative_path.replace('\\', "/")).collect();
        assert_eq!(paths, vec!["crawl/2024/pages.JSONL", "sections.json"]);
    }

    #[test]
    fn test_discover_single_file_root() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("page.json");
        fs::write(&path, "{}").unwrap();

        let files = discover_record_files(&path).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, "page.json");
        assert_eq!(files[0].file_size, 2);
    }

    #[test]
    fn test_discover_empty() {
        let temp_dir = TempDir::new().unwrap();
        assert!(discover_record_files(temp_dir.path()).unwrap().is_empty());
    }
}
