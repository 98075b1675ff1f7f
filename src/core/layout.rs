//! Project layout.
//!
//! All paths the setup reads or writes are derived from three roots: the
//! project root, the CE SDK root and the native build directory.

use std::path::{Path, PathBuf};

/// Name of the compile database file clangd looks for.
pub const COMPILE_DB_NAME: &str = "compile_commands.json";

/// Project-relative location of the shim header.
pub const SHIM_HEADER: &str = "tools/clangd/ce_shim.hpp";

/// Resolved locations for one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    sdk_root: PathBuf,
    native_build_dir: PathBuf,
}

impl ProjectLayout {
    /// Create a layout. A relative `native_build_dir` is taken relative to `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        sdk_root: impl Into<PathBuf>,
        native_build_dir: impl AsRef<Path>,
    ) -> Self {
        let root = root.into();
        let native_build_dir = root.join(native_build_dir);
        ProjectLayout {
            root,
            sdk_root: sdk_root.into(),
            native_build_dir,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sdk_root(&self) -> &Path {
        &self.sdk_root
    }

    pub fn native_build_dir(&self) -> &Path {
        &self.native_build_dir
    }

    /// SDK headers (`<sdk>/include`). Required.
    pub fn sdk_include(&self) -> PathBuf {
        self.sdk_root.join("include")
    }

    /// Vendored libtexce sources. Optional.
    pub fn vendor_sources(&self) -> PathBuf {
        self.libtexce().join("src")
    }

    /// Vendored libtexce public headers.
    pub fn vendor_include(&self) -> PathBuf {
        self.libtexce().join("include")
    }

    pub fn core_include(&self) -> PathBuf {
        self.root.join("core").join("include")
    }

    pub fn shell_include(&self) -> PathBuf {
        self.root.join("shell").join("include")
    }

    /// Sources compiled by the cross toolchain.
    pub fn cross_sources(&self) -> PathBuf {
        self.root.join("shell").join("src")
    }

    pub fn shim_header(&self) -> PathBuf {
        self.root.join(SHIM_HEADER)
    }

    /// Database produced by configuring the native build.
    pub fn native_database(&self) -> PathBuf {
        self.native_build_dir.join(COMPILE_DB_NAME)
    }

    /// Where the native database is published for clangd.
    pub fn native_publish_path(&self) -> PathBuf {
        self.root.join("core").join(COMPILE_DB_NAME)
    }

    /// Where the synthesized cross database is written.
    pub fn cross_database(&self) -> PathBuf {
        self.root.join("shell").join(COMPILE_DB_NAME)
    }

    pub fn vscode_dir(&self) -> PathBuf {
        self.root.join(".vscode")
    }

    fn libtexce(&self) -> PathBuf {
        self.root.join("third_party").join("libtexce")
    }
}
