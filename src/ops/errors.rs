//! Setup error types and diagnostics.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Exit code for a missing required SDK path.
pub const EXIT_MISSING_DEPENDENCY: i32 = 2;

/// Exit code for every other fatal error without a more specific code.
pub const EXIT_FAILURE: i32 = 1;

/// Fatal error during setup. None of these are retried.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("required dependency not found at {}", .path.display())]
    MissingDependency { what: String, path: PathBuf },

    #[error("`{command}` failed: {reason}")]
    ExternalToolFailure {
        command: String,
        code: Option<i32>,
        reason: String,
    },

    #[error("expected {} after running `{command}`, but it was not created", .expected.display())]
    PostconditionViolation { command: String, expected: PathBuf },

    #[error("no {} sources found under {}", .extensions.join("/"), .root.display())]
    EmptySourceSet {
        root: PathBuf,
        extensions: Vec<String>,
    },

    #[error("failed to scan sources under {}", .root.display())]
    SourceScanFailure {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to publish {} to {}", .source_path.display(), .destination.display())]
    PublishFailure {
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SetupError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SetupError::MissingDependency { .. } => EXIT_MISSING_DEPENDENCY,
            SetupError::ExternalToolFailure {
                code: Some(code), ..
            } if *code != 0 => *code,
            _ => EXIT_FAILURE,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SetupError::MissingDependency { what, path } => {
                Diagnostic::error(format!("{} not found at {}", what, path.display()))
                    .with_suggestion(suggestions::PASS_CEDEV)
            }

            SetupError::ExternalToolFailure { command, code, reason } => {
                let mut diag = Diagnostic::error(format!("`{}` failed", command))
                    .with_context(reason.clone());
                if let Some(code) = code {
                    diag = diag.with_context(format!("exit code: {}", code));
                }
                diag.with_suggestion(suggestions::CHECK_PRESET)
            }

            SetupError::PostconditionViolation { command, expected } => Diagnostic::error(
                format!("`{}` succeeded but did not produce the compile database", command),
            )
            .with_location(expected)
            .with_suggestion(suggestions::CHECK_PRESET),

            SetupError::EmptySourceSet { root, .. } => Diagnostic::error(self.to_string())
                .with_location(root)
                .with_suggestion(suggestions::CHECK_SOURCES),

            SetupError::SourceScanFailure { root, source } => {
                let location = source.path().map(PathBuf::from).unwrap_or_else(|| root.clone());
                Diagnostic::error(self.to_string())
                    .with_location(location)
                    .with_context(source.to_string())
                    .with_suggestion(suggestions::CHECK_SOURCES)
            }

            SetupError::PublishFailure {
                destination, source, ..
            } => Diagnostic::error(self.to_string())
                .with_location(destination)
                .with_context(source.to_string())
                .with_suggestion(suggestions::CHECK_PERMISSIONS),

            SetupError::WriteFailure { path, source } => Diagnostic::error(self.to_string())
                .with_location(path)
                .with_context(source.to_string()),
        }
    }
}

/// Non-fatal condition reported during setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupWarning {
    #[error("{what} not found at {}", .path.display())]
    MissingOptionalAsset { what: String, path: PathBuf },
}

impl SetupWarning {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SetupWarning::MissingOptionalAsset { .. } => {
                Diagnostic::warning(self.to_string()).with_suggestion(suggestions::INIT_SUBMODULES)
            }
        }
    }
}
