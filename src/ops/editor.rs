//! VS Code preference files.
//!
//! Both files have fixed content. The fallback flags mirror the cross
//! profile so headers opened outside any database still parse.

use std::path::{Path, PathBuf};

use crate::ops::errors::SetupError;
use crate::util::fs::write_string;

pub const EXTENSIONS_JSON: &str = r#"{
  "recommendations": [
    "llvm-vs-code-extensions.vscode-clangd",
    "ms-vscode.cmake-tools",
    "twxs.cmake"
  ]
}
"#;

pub const SETTINGS_JSON: &str = r#"{
  "clangd.arguments": [
    "--background-index",
    "--clang-tidy",
    "--completion-style=detailed",
    "--header-insertion=never"
  ],
  "clangd.fallbackFlags": [
    "-std=c++20",
    "-include${workspaceFolder}/tools/clangd/ce_shim.hpp",
    "-I${workspaceFolder}/core/include",
    "-I${workspaceFolder}/shell/include",
    "-I${workspaceFolder}/third_party/libtexce/src",
    "-I${workspaceFolder}/third_party/libtexce/include",
    "-idirafter${env:HOME}/CEdev/include"
  ],
  "C_Cpp.intelliSenseEngine": "disabled",
  "C_Cpp.errorSquiggles": "disabled",
  "cmake.useCMakePresets": "always",
  "cmake.configureOnOpen": false
}
"#;

/// Write `extensions.json` and `settings.json` into `vscode_dir`,
/// replacing existing files. Returns the written paths.
pub fn write_editor_preferences(vscode_dir: &Path) -> Result<Vec<PathBuf>, SetupError> {
    let files = [
        ("extensions.json", EXTENSIONS_JSON),
        ("settings.json", SETTINGS_JSON),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, contents) in files {
        let path = vscode_dir.join(name);
        write_string(&path, contents).map_err(|e| SetupError::WriteFailure {
            path: path.clone(),
            source: e,
        })?;
        written.push(path);
    }
    Ok(written)
}
