//! Source file discovery
//!
//! Explicit file arguments are always taken. Directories are walked and
//! their files filtered by the include and exclude glob patterns, matched
//! against the path relative to the directory.

use anyhow::{Context, Result};
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct FileDiscovery {
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
}

impl FileDiscovery {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: compile(include, "include")?,
            exclude: compile(exclude, "exclude")?,
        })
    }

    /// Every matching file under `paths`, sorted and deduplicated
    pub fn discover(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = BTreeSet::new();
        for path in paths {
            if path.is_file() {
                files.insert(path.clone());
            } else if path.is_dir() {
                self.walk(path, &mut files);
            } else {
                anyhow::bail!("path not found: {}", path.display());
            }
        }
        info!("Discovered {} C# files", files.len());
        debug!("Files: {:?}", files);
        Ok(files.into_iter().collect())
    }

    fn walk(&self, root: &Path, files: &mut BTreeSet<PathBuf>) {
        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            // symlinked files count as sources; symlinked directories are not followed
            let is_file = entry.file_type().is_file() || (entry.path_is_symlink() && !path.is_dir());
            if !is_file {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(path);
            if self.should_include(relative) {
                files.insert(path.to_path_buf());
            }
        }
    }

    pub fn should_include(&self, relative: &Path) -> bool {
        let included = if self.include.is_empty() {
            relative.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("cs"))
        } else {
            self.include.iter().any(|p| p.matches_path(relative))
        };
        included && !self.exclude.iter().any(|p| p.matches_path(relative))
    }
}

fn compile(patterns: &[String], which: &str) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid {which} pattern '{p}'")))
        .collect()
}
