//! Test fixtures for common test scenarios.
//!
//! A [`ProjectFixture`] lays out a dual-toolchain project in a temporary
//! directory: `project/` holds the repository and `CEdev/` the SDK.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::core::layout::ProjectLayout;

/// Native compile database content used by fixtures.
pub const NATIVE_DB: &str = r#"[
  {
    "directory": "/proj/build/native",
    "command": "c++ -c /proj/core/src/rational.cpp",
    "file": "/proj/core/src/rational.cpp"
  }
]
"#;

/// A temporary project on disk.
pub struct ProjectFixture {
    tmp: TempDir,
}

impl ProjectFixture {
    /// Create a project with a `CMakePresets.json` and a `core/` library.
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("failed to create temp dir");
        let fixture = ProjectFixture { tmp };
        fixture.write("CMakePresets.json", "{}\n");
        fixture.write("core/CMakeLists.txt", "add_library(core)\n");
        fixture
    }

    /// Project root.
    pub fn root(&self) -> PathBuf {
        self.tmp.path().join("project")
    }

    /// SDK root (exists only after [`with_sdk`](Self::with_sdk)).
    pub fn sdk_root(&self) -> PathBuf {
        self.tmp.path().join("CEdev")
    }

    /// Layout with the default `build/native` build directory.
    pub fn layout(&self) -> ProjectLayout {
        ProjectLayout::new(self.root(), self.sdk_root(), "build/native")
    }

    /// Create `CEdev/include` with a header in it.
    pub fn with_sdk(self) -> Self {
        let include = self.sdk_root().join("include");
        fs::create_dir_all(&include).expect("failed to create sdk include");
        fs::write(include.join("ti_sprintf.h"), "#pragma once\n").expect("failed to write sdk header");
        self
    }

    /// Create `third_party/libtexce/src`.
    pub fn with_vendor_sources(self) -> Self {
        self.write("third_party/libtexce/src/tex.c", "int tex;\n");
        self
    }

    /// Create the native compile database the configure step would produce.
    pub fn with_native_database(self) -> Self {
        self.write("build/native/compile_commands.json", NATIVE_DB);
        self
    }

    /// Create `shell/src/<name>` for each name.
    pub fn with_cross_sources(self, names: &[&str]) -> Self {
        for name in names {
            self.write(&format!("shell/src/{}", name), "int main() { return 0; }\n");
        }
        self
    }

    /// Write a file relative to the project root.
    pub fn write(&self, rel: impl AsRef<Path>, contents: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        fs::write(&path, contents).expect("failed to write fixture file");
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
