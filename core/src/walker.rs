//! Go source discovery

use crate::error::CoreError;
use crate::error::Result;
use std::path::Component;
use std::path::Path;
use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

pub const GO_EXTENSION: &str = "go";

/// A discovered source file, before minification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// `/`-separated, relative to the project root
    pub path: String,
    pub text: String,
}

/// Every `.go` file under `root`, sorted by name within each directory.
/// Entries whose relative path starts with an `exclude` prefix (compared
/// component-wise) are skipped; excluded directories are not descended.
pub fn collect_sources(root: &Path, exclude: &[String]) -> Result<Vec<SourceFile>> {
    let excludes: Vec<Vec<String>> = exclude
        .iter()
        .map(|entry| components(Path::new(entry.trim())))
        .filter(|parts| !parts.is_empty())
        .collect();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_excluded(root, entry, &excludes));

    let mut sources = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|source| CoreError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_go_file(entry.path()) {
            continue;
        }
        let text = std::fs::read_to_string(entry.path()).map_err(|source| CoreError::Read {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let path = components(relative(root, entry.path())).join("/");
        debug!(%path, bytes = text.len(), "found source file");
        sources.push(SourceFile { path, text });
    }
    Ok(sources)
}

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == GO_EXTENSION)
}

fn relative<'a>(root: &Path, path: &'a Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}

/// Normal components only, so `./vendor/` and `vendor` compare equal
fn components(path: &Path) -> Vec<String> {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}

fn is_excluded(root: &Path, entry: &DirEntry, excludes: &[Vec<String>]) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let parts = components(relative(root, entry.path()));
    excludes.iter().any(|prefix| parts.starts_with(prefix))
}
