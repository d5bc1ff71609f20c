//! Annotation file discovery.
//!
//! Finds candidate input files in a catalog directory by extension, skipping
//! files that are already conversion outputs (`<name><suffix><extension>`).

use std::env;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::Brat2BioError;
use crate::Result;

/// Default input extension.
pub const DEFAULT_EXTENSION: &str = ".ann";
/// Default suffix marking converted files.
pub const DEFAULT_SUFFIX: &str = "_bio";

/// Configuration for file discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterConfig {
    /// Extension a file name must end with (including the dot)
    pub extension: String,
    /// Suffix that, followed by `extension`, marks a file to skip
    pub exclude_suffix: String,
    /// Walk subdirectories
    pub recursive: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            exclude_suffix: DEFAULT_SUFFIX.to_string(),
            recursive: false,
        }
    }
}

impl FilterConfig {
    /// Create a config with the default `.ann` extension and `_bio` suffix.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn exclude_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.exclude_suffix = suffix.into();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Check a path's file name against the filter.
    ///
    /// Only the file name is considered, never the directory components.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if !name.ends_with(&self.extension) {
            return false;
        }

        let excluded = format!("{}{}", self.exclude_suffix, self.extension);
        !name.ends_with(&excluded)
    }
}

/// Resolve a catalog argument against the current directory.
///
/// `None` or an empty string means the current directory itself.
pub fn resolve_catalog(catalog: Option<&str>) -> Result<PathBuf> {
    let cwd = env::current_dir()?;
    Ok(match catalog {
        Some(c) if !c.is_empty() => cwd.join(c),
        _ => cwd,
    })
}

/// Locate annotation files under `root`.
///
/// Without recursion only direct children of `root` are considered. Results
/// are sorted lexically so the order is deterministic.
pub fn locate(root: impl AsRef<Path>, filter: &FilterConfig) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(Brat2BioError::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Brat2BioError::NotADirectory(root.to_path_buf()));
    }

    let mut walker = WalkDir::new(root).follow_links(true).min_depth(1);
    if !filter.recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                tracing::warn!("skipping unreadable entry: {}", err);
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_file() && filter.matches(path) {
            tracing::debug!("found {}", path.display());
            files.push(path.to_path_buf());
        }
    }

    // Sort for deterministic output
    files.sort();

    Ok(files)
}
