//! Core data structures.
//!
//! This module contains the foundational types used throughout the setup:
//! - Toolchain profiles (how one compiler is invoked)
//! - Compile databases and their entries
//! - Project layout (where everything lives on disk)

pub mod compile_db;
pub mod layout;
pub mod profile;

pub use compile_db::{CompilationUnit, CompileCommand, CompileDatabase};
pub use layout::{ProjectLayout, COMPILE_DB_NAME, SHIM_HEADER};
pub use profile::{IncludeDir, IncludeKind, ToolchainProfile};
