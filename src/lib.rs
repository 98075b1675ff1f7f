//! clangd-setup - compile databases for a native + cross-compiled C++ project
//!
//! The project's `core` library builds with the host toolchain and gets its
//! compile database from CMake. The `shell` application targets the TI-84
//! Plus CE through the CEdev SDK, which clangd cannot drive, so its database
//! is synthesized with flags that let host clang parse it.

pub mod core;
pub mod ops;
pub mod util;

/// Test utilities for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides on-disk project fixtures and a linker that
/// simulates filesystems without symlinks.
#[cfg(test)]
pub mod test_support;

pub use core::{CompileDatabase, ProjectLayout, ToolchainProfile};
pub use ops::{setup, SetupError, SetupOptions, SetupReport};
pub use util::context::GlobalContext;
