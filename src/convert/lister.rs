//! Directory listing collaborator used by batch conversion

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Source of input files for a folder conversion
pub trait FileLister {
    /// Files directly inside `dir` that should be converted, in processing order
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Lists regular files whose extension matches, without recursing
#[derive(Debug, Clone)]
pub struct DirectoryLister {
    extension: String,
}

impl DirectoryLister {
    pub fn new(extension: &str) -> Self {
        DirectoryLister {
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }

    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(&self.extension))
            .unwrap_or(false)
    }
}

impl Default for DirectoryLister {
    fn default() -> Self {
        DirectoryLister::new("tif")
    }
}

impl FileLister for DirectoryLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && self.matches(&path) {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
