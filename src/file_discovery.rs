use crate::error::{ArxmlError, Result};
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Finds ARXML documents below a root path
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include, lowercase and without the dot
    extensions: Vec<String>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    /// Maximum directory depth below the root (None = unlimited)
    max_depth: Option<usize>,
    follow_symlinks: bool,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["arxml".to_string()],
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            max_depth: None,
            follow_symlinks: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();
        self
    }

    /// Only files matching at least one of these globs are kept
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Self {
        self.include_patterns = patterns;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Matching files below `path` in sorted order. A file path is returned
    /// as-is when its extension matches.
    pub fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = std::fs::metadata(path)?;
        if metadata.is_file() {
            return Ok(if self.has_extension(path) {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        let mut walker = WalkBuilder::new(path);
        walker
            .standard_filters(false)
            .follow_links(self.follow_symlinks)
            .overrides(self.overrides(path)?)
            // the walker counts the root itself as depth 0
            .max_depth(self.max_depth.map(|depth| depth + 1));

        let mut files = Vec::new();
        for entry in walker.build() {
            match entry {
                Ok(entry) => {
                    let is_file = entry.file_type().is_some_and(|t| t.is_file());
                    if is_file && self.has_extension(entry.path()) {
                        files.push(entry.into_path());
                    }
                }
                Err(err) => warn!(error = %err, "skipping unreadable entry"),
            }
        }
        files.sort();
        debug!(root = %path.display(), found = files.len(), "file discovery finished");
        Ok(files)
    }

    /// Extension filter alone; glob patterns are applied by the walker
    pub fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.contains(&ext.to_lowercase()))
    }

    fn overrides(&self, root: &Path) -> Result<Override> {
        let mut builder = OverrideBuilder::new(root);
        let excludes = self.exclude_patterns.iter().map(|p| format!("!{}", p));
        for pattern in self.include_patterns.iter().cloned().chain(excludes) {
            builder.add(&pattern).map_err(|e| {
                ArxmlError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        }
        builder
            .build()
            .map_err(|e| ArxmlError::Config(format!("Failed to build glob set: {}", e)))
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}
