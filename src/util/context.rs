//! Global context for setup runs.
//!
//! Provides the working directory and project root discovery.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::util::config::PROJECT_CONFIG_NAME;

/// Files whose presence marks a project root.
pub const ROOT_MARKERS: &[&str] = &["CMakePresets.json", PROJECT_CONFIG_NAME];

/// Error finding the project root.
#[derive(Debug, Error)]
pub enum ProjectRootError {
    #[error(
        "could not find a project root (a directory containing {}) in {} or any parent",
        ROOT_MARKERS.join(" or "),
        .dir.display()
    )]
    NotFound { dir: PathBuf },
}

/// Global context for a run.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
}

impl GlobalContext {
    /// Create a context rooted at the process working directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(GlobalContext { cwd })
    }

    /// Create a context with an explicit working directory.
    pub fn with_cwd(cwd: impl Into<PathBuf>) -> Self {
        GlobalContext { cwd: cwd.into() }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Find the project root starting from cwd and searching upward.
    pub fn find_project_root(&self) -> Result<PathBuf, ProjectRootError> {
        let mut current = self.cwd.clone();
        loop {
            if is_project_root(&current) {
                return Ok(current);
            }
            if !current.pop() {
                return Err(ProjectRootError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }
}

fn is_project_root(dir: &Path) -> bool {
    ROOT_MARKERS.iter().any(|marker| dir.join(marker).is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_root_from_subdir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("CMakePresets.json"), "{}").unwrap();
        let nested = tmp.path().join("shell").join("src");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(&nested);
        assert_eq!(ctx.find_project_root().unwrap(), tmp.path());
    }

    #[test]
    fn test_config_file_marks_root() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(PROJECT_CONFIG_NAME), "").unwrap();

        let ctx = GlobalContext::with_cwd(tmp.path());
        assert_eq!(ctx.find_project_root().unwrap(), tmp.path());
    }

    #[test]
    fn test_not_found_names_start_dir() {
        let tmp = TempDir::new().unwrap();
        let ctx = GlobalContext::with_cwd(tmp.path());

        // A marker in an ancestor of the temp dir would be found; only assert
        // when the search genuinely fails.
        if let Err(err) = ctx.find_project_root() {
            assert!(err.to_string().contains("CMakePresets.json"));
        }
    }
}
