use std::fs::File;
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;

/// Recursively lists the files under `root` as `/`-separated paths relative
/// to `root`, sorted.
pub fn list_files_within_directory(root: &Path) -> Result<Vec<String>, walkdir::Error> {
    let mut files = Vec::new();
    for result in WalkDir::new(root).sort_by_file_name() {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        // Every entry lives below `root`.
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(slash_separated(relative));
        }
    }
    files.sort();
    Ok(files)
}

fn slash_separated(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Creates `path` along with any missing parent directories.
pub fn create_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    File::create(path)
}
