//! Project file discovery for the initial scan.

use std::path::{Path, PathBuf};

use gale_config::ScanOptions;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{GaleError, Result};

/// Include/exclude matcher over paths relative to the project root.
#[derive(Debug, Clone)]
pub struct ProjectScanner {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
}

impl ProjectScanner {
    pub fn new(root: impl Into<PathBuf>, scan: &ScanOptions) -> Result<Self> {
        Ok(Self {
            root: root.into(),
            include: build_globset(&scan.include)?,
            exclude: build_globset(&exclude_patterns(&scan.exclude))?,
        })
    }

    /// `relative` is relative to the root.
    pub fn is_included(&self, relative: &Path) -> bool {
        self.include.is_match(relative) && !self.exclude.is_match(relative)
    }

    /// Walk the root and return the absolute paths of matching files, sorted.
    /// Excluded directories are not descended into. Entries that cannot be
    /// read (dangling links, unreadable directories) are skipped; only an
    /// unreadable root is an error.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !self.exclude.is_match(self.relative(entry.path()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 => return Err(GaleError::scan(&self.root, err)),
                Err(err) => {
                    warn!("[gale:scan] skipping entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_included(self.relative(entry.path())) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }
}

/// Bare names like `node_modules` match that directory at any depth.
fn exclude_patterns(exclude: &[String]) -> Vec<String> {
    let mut patterns = Vec::with_capacity(exclude.len() * 2);
    for pattern in exclude {
        let pattern = pattern.trim_start_matches("./").trim_end_matches('/');
        if pattern.is_empty() {
            continue;
        }
        if pattern.contains('/') || pattern.contains('*') {
            patterns.push(pattern.to_string());
        } else {
            patterns.push(format!("**/{}", pattern));
            patterns.push(format!("**/{}/**", pattern));
        }
    }
    patterns
}

pub fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_start_matches("./");
        let glob = Glob::new(pattern).map_err(|e| GaleError::invalid_glob(pattern, e))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| GaleError::invalid_glob(patterns.join(", "), e))
}
