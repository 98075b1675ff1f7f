//! Compile database model (`compile_commands.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::profile::ToolchainProfile;

/// A source file to be described in a compile database.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompilationUnit {
    path: PathBuf,
}

impl CompilationUnit {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CompilationUnit { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// compile_commands.json entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub directory: String,
    pub file: String,
    pub arguments: Vec<String>,
}

impl CompileCommand {
    /// Build the entry for `unit` under `profile`.
    pub fn for_unit(directory: &Path, unit: &CompilationUnit, profile: &ToolchainProfile) -> Self {
        CompileCommand {
            directory: directory.display().to_string(),
            file: unit.path().display().to_string(),
            arguments: profile.arguments_for(unit.path()),
        }
    }
}

/// An ordered compile database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileDatabase {
    entries: Vec<CompileCommand>,
}

impl CompileDatabase {
    /// Build a database from compilation units.
    ///
    /// Units are sorted by path and deduplicated so the output only depends
    /// on the set of units, never on the order they were discovered in.
    pub fn from_units(
        directory: &Path,
        units: impl IntoIterator<Item = CompilationUnit>,
        profile: &ToolchainProfile,
    ) -> Self {
        let mut units: Vec<CompilationUnit> = units.into_iter().collect();
        units.sort();
        units.dedup();

        let entries = units
            .iter()
            .map(|unit| CompileCommand::for_unit(directory, unit, profile))
            .collect();

        CompileDatabase { entries }
    }

    /// Parse a database from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries = serde_json::from_str(json)?;
        Ok(CompileDatabase { entries })
    }

    pub fn entries(&self) -> &[CompileCommand] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the entry for a file.
    pub fn entry_for(&self, file: &Path) -> Option<&CompileCommand> {
        let file = file.display().to_string();
        self.entries.iter().find(|e| e.file == file)
    }

    /// Serialize as pretty JSON (2-space indent) with a trailing newline.
    pub fn to_json_string(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(&self.entries)?;
        json.push('\n');
        Ok(json)
    }
}
