//! Build artifact resolution.
//!
//! The native compile database is produced by configuring the native build.
//! Resolution reuses an existing database and only runs the configure step
//! when the database is absent, then checks the step actually produced it.

use std::fs;
use std::path::{Path, PathBuf};

use crate::ops::errors::SetupError;
use crate::util::process::{find_executable, ProcessBuilder};

/// An artifact known to exist on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    path: PathBuf,
}

impl ResolvedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }
}

/// An external step that produces an artifact as a side effect.
pub trait ConfigureAction {
    /// Human-readable description, used in diagnostics.
    fn describe(&self) -> String;

    /// Run the step to completion.
    fn run(&mut self) -> Result<(), SetupError>;
}

impl<F> ConfigureAction for F
where
    F: FnMut() -> Result<(), SetupError>,
{
    fn describe(&self) -> String {
        "configure step".to_string()
    }

    fn run(&mut self) -> Result<(), SetupError> {
        self()
    }
}

/// Configure by running an external command in the project root.
#[derive(Debug, Clone)]
pub struct CommandConfigure {
    process: ProcessBuilder,
}

impl CommandConfigure {
    /// Create from an argv list, run with `cwd` as the working directory.
    pub fn new(argv: &[String], cwd: &Path) -> Result<Self, SetupError> {
        let process = ProcessBuilder::from_argv(argv).ok_or_else(|| {
            SetupError::ExternalToolFailure {
                command: String::new(),
                code: None,
                reason: "the configure command is empty".to_string(),
            }
        })?;
        Ok(CommandConfigure {
            process: process.cwd(cwd),
        })
    }

    fn failure(&self, code: Option<i32>, reason: impl Into<String>) -> SetupError {
        SetupError::ExternalToolFailure {
            command: self.process.display_command(),
            code,
            reason: reason.into(),
        }
    }
}

impl ConfigureAction for CommandConfigure {
    fn describe(&self) -> String {
        self.process.display_command()
    }

    fn run(&mut self) -> Result<(), SetupError> {
        let program = self.process.get_program();

        // Bare names are looked up on PATH up front for a clearer message.
        if program.components().count() == 1 && find_executable(program).is_none() {
            return Err(self.failure(
                None,
                format!("`{}` was not found on PATH", program.display()),
            ));
        }

        let status = self
            .process
            .status()
            .map_err(|e| self.failure(None, format!("failed to spawn: {}", e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(self.failure(status.code(), format!("exited with {}", status)))
        }
    }
}

/// Ensure the artifact at `expected` exists.
///
/// An existing artifact is returned untouched and `configure` is never run.
/// Otherwise `configure` runs exactly once; a failure is propagated as-is,
/// and a successful run that leaves `expected` missing or empty is a
/// [`SetupError::PostconditionViolation`].
pub fn resolve_artifact(
    expected: &Path,
    configure: &mut dyn ConfigureAction,
) -> Result<ResolvedArtifact, SetupError> {
    if expected.exists() {
        tracing::debug!("using existing {}", expected.display());
        return Ok(ResolvedArtifact {
            path: expected.to_path_buf(),
        });
    }

    tracing::debug!(
        "missing {}, running `{}`",
        expected.display(),
        configure.describe()
    );
    configure.run()?;

    if !is_non_empty_file(expected) {
        return Err(SetupError::PostconditionViolation {
            command: configure.describe(),
            expected: expected.to_path_buf(),
        });
    }

    Ok(ResolvedArtifact {
        path: expected.to_path_buf(),
    })
}

fn is_non_empty_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.is_file() && m.len() > 0)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_existing_artifact_short_circuits() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("compile_commands.json");
        fs::write(&db, "[]").unwrap();

        let mut calls = 0;
        let mut configure = || -> Result<(), SetupError> {
            calls += 1;
            Ok(())
        };

        let resolved = resolve_artifact(&db, &mut configure).unwrap();
        assert_eq!(resolved.path(), db);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_configure_runs_once_and_produces_artifact() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("build").join("compile_commands.json");

        let mut calls = 0;
        let target = db.clone();
        let mut configure = || -> Result<(), SetupError> {
            calls += 1;
            fs::create_dir_all(target.parent().unwrap()).unwrap();
            fs::write(&target, "[]").unwrap();
            Ok(())
        };

        let resolved = resolve_artifact(&db, &mut configure).unwrap();
        assert_eq!(resolved.into_path(), db);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_success_without_artifact_is_postcondition_violation() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("compile_commands.json");

        let mut configure = || -> Result<(), SetupError> { Ok(()) };

        let err = resolve_artifact(&db, &mut configure).unwrap_err();
        assert!(matches!(
            err,
            SetupError::PostconditionViolation { ref expected, .. } if expected == &db
        ));
    }

    #[test]
    fn test_empty_artifact_is_postcondition_violation() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("compile_commands.json");
        let target = db.clone();

        let mut configure = || -> Result<(), SetupError> {
            fs::write(&target, "").unwrap();
            Ok(())
        };

        let err = resolve_artifact(&db, &mut configure).unwrap_err();
        assert!(matches!(err, SetupError::PostconditionViolation { .. }));
    }

    #[test]
    fn test_tool_failure_propagates() {
        let tmp = TempDir::new().unwrap();
        let db = tmp.path().join("compile_commands.json");

        let mut configure = || -> Result<(), SetupError> {
            Err(SetupError::ExternalToolFailure {
                command: "cmake --preset native".into(),
                code: Some(1),
                reason: "exited with exit status: 1".into(),
            })
        };

        let err = resolve_artifact(&db, &mut configure).unwrap_err();
        assert!(matches!(
            err,
            SetupError::ExternalToolFailure { code: Some(1), .. }
        ));
    }

    #[test]
    fn test_empty_command_rejected() {
        let err = CommandConfigure::new(&[], Path::new("/")).unwrap_err();
        assert!(matches!(err, SetupError::ExternalToolFailure { .. }));
    }

    #[test]
    fn test_missing_program_reported_without_exit_code() {
        let tmp = TempDir::new().unwrap();
        let argv = vec!["definitely-not-a-real-configure-tool".to_string()];
        let mut configure = CommandConfigure::new(&argv, tmp.path()).unwrap();

        let err = configure.run().unwrap_err();
        assert!(matches!(
            err,
            SetupError::ExternalToolFailure { code: None, ref reason, .. } if reason.contains("not found on PATH")
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_exit_code_propagates() {
        let tmp = TempDir::new().unwrap();
        let argv: Vec<String> = ["sh", "-c", "exit 7"].iter().map(|s| s.to_string()).collect();
        let mut configure = CommandConfigure::new(&argv, tmp.path()).unwrap();

        let err = configure.run().unwrap_err();
        assert_eq!(err.exit_code(), 7);
        assert!(err.to_string().contains("sh -c exit 7"));
    }

    #[cfg(unix)]
    #[test]
    fn test_command_runs_in_cwd() {
        let tmp = TempDir::new().unwrap();
        let argv: Vec<String> = ["sh", "-c", "echo '[]' > compile_commands.json"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut configure = CommandConfigure::new(&argv, tmp.path()).unwrap();

        let db = tmp.path().join("compile_commands.json");
        resolve_artifact(&db, &mut configure).unwrap();
        assert!(db.exists());
    }
}
