//! Compile database synthesis.
//!
//! The cross toolchain never runs on the host, so clangd has no real build
//! to learn its flags from. Instead every source file under the cross source
//! tree gets an entry rendered from a fixed [`ToolchainProfile`].

use std::path::{Path, PathBuf};

use crate::core::compile_db::{CompilationUnit, CompileDatabase};
use crate::core::profile::ToolchainProfile;
use crate::ops::errors::SetupError;
use crate::util::fs::{find_files_with_extension, write_string};

/// Synthesizes compile databases for one project.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    project_root: PathBuf,
    extensions: Vec<String>,
}

impl Synthesizer {
    /// Create a synthesizer whose entries use `project_root` as their
    /// working directory. Sources are `.cpp` files by default.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Synthesizer {
            project_root: project_root.into(),
            extensions: vec!["cpp".to_string()],
        }
    }

    /// Replace the set of source extensions (without the dot).
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Find the compilation units under `source_root`, sorted by path.
    pub fn discover_units(&self, source_root: &Path) -> Result<Vec<CompilationUnit>, SetupError> {
        let units: Vec<CompilationUnit> = find_files_with_extension(source_root, &self.extensions)
            .map_err(|e| SetupError::SourceScanFailure {
                root: source_root.to_path_buf(),
                source: e,
            })?
            .into_iter()
            .map(CompilationUnit::new)
            .collect();

        if units.is_empty() {
            return Err(SetupError::EmptySourceSet {
                root: source_root.to_path_buf(),
                extensions: self.extensions.clone(),
            });
        }

        tracing::debug!(
            "found {} compilation units under {}",
            units.len(),
            source_root.display()
        );
        Ok(units)
    }

    /// Build the database for every unit under `source_root`.
    pub fn synthesize(
        &self,
        source_root: &Path,
        profile: &ToolchainProfile,
    ) -> Result<CompileDatabase, SetupError> {
        let units = self.discover_units(source_root)?;
        Ok(CompileDatabase::from_units(
            &self.project_root,
            units,
            profile,
        ))
    }
}

/// Serialize `db` to `output`, creating parent directories.
pub fn write_database(db: &CompileDatabase, output: &Path) -> Result<(), SetupError> {
    let json = db.to_json_string().map_err(|e| SetupError::WriteFailure {
        path: output.to_path_buf(),
        source: e.into(),
    })?;

    write_string(output, &json).map_err(|e| SetupError::WriteFailure {
        path: output.to_path_buf(),
        source: e,
    })
}
