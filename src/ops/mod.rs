//! High-level operations.
//!
//! This module contains the steps of a setup run and the orchestration
//! that sequences them.

pub mod artifact;
pub mod editor;
pub mod errors;
pub mod publish;
pub mod setup;
pub mod synthesize;

pub use artifact::{resolve_artifact, CommandConfigure, ConfigureAction, ResolvedArtifact};
pub use editor::write_editor_preferences;
pub use errors::{SetupError, SetupWarning};
pub use publish::{publish, publish_with, Linker, SystemLinker};
pub use setup::{cross_profile, preview_cross_database, setup, setup_with, SetupOptions, SetupReport};
pub use synthesize::{write_database, Synthesizer};
