//! Toolchain profiles.
//!
//! A profile is the fixed argument template of one compiler configuration.
//! Rendering a profile for a source file yields the argument vector clangd
//! needs to parse that file the way the real toolchain would.

use std::path::{Path, PathBuf};

/// Compile-only flag; always the second-to-last argument.
pub const COMPILE_ONLY_FLAG: &str = "-c";

/// Where an include directory sits relative to the host system headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    /// Searched before system headers (`-I`).
    Before,
    /// Searched after system headers (`-idirafter`).
    AfterSystem,
}

impl IncludeKind {
    /// Flag prefix for this kind.
    pub fn flag_prefix(&self) -> &'static str {
        match self {
            IncludeKind::Before => "-I",
            IncludeKind::AfterSystem => "-idirafter",
        }
    }
}

/// An include directory entry in a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDir {
    pub kind: IncludeKind,
    pub path: PathBuf,
}

impl IncludeDir {
    /// Render as a single compiler flag.
    pub fn to_flag(&self) -> String {
        format!("{}{}", self.kind.flag_prefix(), self.path.display())
    }
}

/// Fixed argument template for one toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainProfile {
    /// Program name placed first in every argument vector (e.g. `clang++`)
    pub invocation: String,
    /// Language standard, without the `-std=` prefix (e.g. `gnu++20`)
    pub standard: String,
    /// Flags emitted right after the standard (e.g. `-fno-rtti`)
    pub extra_flags: Vec<String>,
    /// Header force-included into every unit
    pub shim_header: Option<PathBuf>,
    /// Include directories in insertion order
    pub include_dirs: Vec<IncludeDir>,
    /// Flags occupying the reserved host-system header slot.
    ///
    /// Empty for real toolchains: the host system paths are implicit in the
    /// consuming tool. Anything placed here lands between the `Before` and
    /// `AfterSystem` include flags.
    pub system_slot: Vec<String>,
    /// Preprocessor defines without the `-D` prefix
    pub defines: Vec<String>,
}

impl ToolchainProfile {
    /// Create an empty profile.
    pub fn new(invocation: impl Into<String>, standard: impl Into<String>) -> Self {
        ToolchainProfile {
            invocation: invocation.into(),
            standard: standard.into(),
            extra_flags: Vec::new(),
            shim_header: None,
            include_dirs: Vec::new(),
            system_slot: Vec::new(),
            defines: Vec::new(),
        }
    }

    /// Add a flag emitted after the standard.
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.extra_flags.push(flag.into());
        self
    }

    /// Force-include a shim header.
    pub fn with_shim(mut self, path: impl Into<PathBuf>) -> Self {
        self.shim_header = Some(path.into());
        self
    }

    /// Append an include directory searched before system headers.
    pub fn include_before(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(IncludeDir {
            kind: IncludeKind::Before,
            path: path.into(),
        });
        self
    }

    /// Append an include directory searched after system headers.
    pub fn include_after_system(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(IncludeDir {
            kind: IncludeKind::AfterSystem,
            path: path.into(),
        });
        self
    }

    /// Add a flag to the reserved system-header slot.
    pub fn with_system_slot(mut self, flag: impl Into<String>) -> Self {
        self.system_slot.push(flag.into());
        self
    }

    /// Add a preprocessor define (`NAME` or `NAME=VALUE`).
    pub fn define(mut self, define: impl Into<String>) -> Self {
        self.defines.push(define.into());
        self
    }

    /// Flags shared by every unit, i.e. everything except the leading
    /// invocation name and the trailing `-c <file>`.
    pub fn base_flags(&self) -> Vec<String> {
        let mut flags = Vec::with_capacity(
            2 + self.extra_flags.len()
                + self.include_dirs.len()
                + self.system_slot.len()
                + self.defines.len(),
        );

        flags.push(format!("-std={}", self.standard));
        flags.extend(self.extra_flags.iter().cloned());

        if let Some(shim) = &self.shim_header {
            flags.push(format!("-include{}", shim.display()));
        }

        // Stable partition: AfterSystem entries go behind the system slot
        // even when interleaved with Before entries.
        flags.extend(self.includes_of(IncludeKind::Before).map(IncludeDir::to_flag));
        flags.extend(self.system_slot.iter().cloned());
        flags.extend(
            self.includes_of(IncludeKind::AfterSystem)
                .map(IncludeDir::to_flag),
        );

        flags.extend(self.defines.iter().map(|d| format!("-D{}", d)));
        flags
    }

    /// Full argument vector for one source file.
    pub fn arguments_for(&self, source: &Path) -> Vec<String> {
        let base = self.base_flags();
        let mut args = Vec::with_capacity(base.len() + 3);
        args.push(self.invocation.clone());
        args.extend(base);
        args.push(COMPILE_ONLY_FLAG.to_string());
        args.push(source.display().to_string());
        args
    }

    fn includes_of(&self, kind: IncludeKind) -> impl Iterator<Item = &IncludeDir> {
        self.include_dirs.iter().filter(move |d| d.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOT: &str = "-isystem/host/include";

    fn position(args: &[String], flag: &str) -> usize {
        args.iter()
            .position(|a| a == flag)
            .unwrap_or_else(|| panic!("missing {} in {:?}", flag, args))
    }

    #[test]
    fn test_argument_order() {
        let profile = ToolchainProfile::new("clang++", "gnu++20")
            .with_flag("-fno-exceptions")
            .with_flag("-fno-rtti")
            .with_shim("/proj/shim.hpp")
            .include_before("/core")
            .with_system_slot(SLOT)
            .include_after_system("/sdk")
            .define("FEATURE_X");

        let args = profile.arguments_for(Path::new("/proj/src/a.cpp"));

        assert_eq!(
            args,
            vec![
                "clang++",
                "-std=gnu++20",
                "-fno-exceptions",
                "-fno-rtti",
                "-include/proj/shim.hpp",
                "-I/core",
                SLOT,
                "-idirafter/sdk",
                "-DFEATURE_X",
                "-c",
                "/proj/src/a.cpp",
            ]
        );
    }

    #[test]
    fn test_after_system_sorted_behind_slot_when_interleaved() {
        let profile = ToolchainProfile::new("clang++", "c++20")
            .include_after_system("/sdk/a")
            .include_before("/core")
            .include_after_system("/sdk/b")
            .include_before("/shell")
            .with_system_slot(SLOT);

        let args = profile.arguments_for(Path::new("x.cpp"));
        let slot = position(&args, SLOT);

        assert!(position(&args, "-I/core") < slot);
        assert!(position(&args, "-I/shell") < slot);
        assert!(position(&args, "-I/core") < position(&args, "-I/shell"));
        assert!(position(&args, "-idirafter/sdk/a") > slot);
        assert!(position(&args, "-idirafter/sdk/b") > position(&args, "-idirafter/sdk/a"));
    }

    #[test]
    fn test_no_shim_no_include_flag() {
        let profile = ToolchainProfile::new("clang++", "c++17");
        let args = profile.arguments_for(Path::new("main.cpp"));

        assert_eq!(args, vec!["clang++", "-std=c++17", "-c", "main.cpp"]);
        assert!(!args.iter().any(|a| a.starts_with("-include")));
    }

    #[test]
    fn test_define_with_value() {
        let profile = ToolchainProfile::new("clang++", "c++20").define("LEVEL=3");
        let args = profile.base_flags();
        assert_eq!(args.last().map(String::as_str), Some("-DLEVEL=3"));
    }
}
