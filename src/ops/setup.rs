//! Implementation of the full clangd setup.
//!
//! Steps run in order and the first failure aborts the rest:
//! 1. check the CE SDK headers exist
//! 2. warn if vendored libtexce sources are missing
//! 3. resolve the native compile database, configuring if needed
//! 4. publish it as `core/compile_commands.json`
//! 5. synthesize `shell/compile_commands.json` for the cross toolchain
//! 6. write `.vscode` preferences (optional)

use std::path::PathBuf;

use crate::core::compile_db::CompileDatabase;
use crate::core::layout::ProjectLayout;
use crate::core::profile::ToolchainProfile;
use crate::ops::artifact::{resolve_artifact, CommandConfigure, ConfigureAction};
use crate::ops::editor::write_editor_preferences;
use crate::ops::errors::{SetupError, SetupWarning};
use crate::ops::publish::{publish_with, Linker, SystemLinker};
use crate::ops::synthesize::{write_database, Synthesizer};
use crate::util::fs::write_if_missing;
use crate::util::shell::{Shell, Status};

/// Shim header force-included into shell sources. Host clang has no 24-bit
/// integer types; the CE toolchain does.
pub const CE_SHIM_HEADER: &str = "#pragma once

#include <cstdint>

#if !defined(__INT24_TYPE__) && !defined(int24_t)
using int24_t = std::int32_t;
using uint24_t = std::uint32_t;
#endif
";

/// Options for a setup run.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Project, SDK and native build locations
    pub layout: ProjectLayout,

    /// Command that configures the native build
    pub configure: Vec<String>,

    /// Write .vscode preference files
    pub emit_editor: bool,

    /// Flags appended to the cross profile's extra flags
    pub extra_flags: Vec<String>,

    /// Defines appended to the cross profile's defines
    pub extra_defines: Vec<String>,
}

impl SetupOptions {
    pub fn new(layout: ProjectLayout) -> Self {
        SetupOptions {
            layout,
            configure: ["cmake", "--preset", "native"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            emit_editor: true,
            extra_flags: Vec::new(),
            extra_defines: Vec::new(),
        }
    }

    /// The profile used for the cross database.
    pub fn cross_profile(&self) -> ToolchainProfile {
        cross_profile(&self.layout, &self.extra_flags, &self.extra_defines)
    }
}

/// What a setup run produced.
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    /// Non-fatal problems found along the way
    pub warnings: Vec<SetupWarning>,
    /// The native database that was published
    pub native_database: PathBuf,
    /// Where it was published
    pub published_database: PathBuf,
    /// The synthesized cross database
    pub cross_database: PathBuf,
    /// Number of entries in the cross database
    pub cross_entries: usize,
    /// Whether the shim header had to be created
    pub shim_created: bool,
    /// Editor preference files written
    pub editor_files: Vec<PathBuf>,
}

/// Profile matching the CE toolchain, as seen by host `clang++`.
pub fn cross_profile(
    layout: &ProjectLayout,
    extra_flags: &[String],
    extra_defines: &[String],
) -> ToolchainProfile {
    let mut profile = ToolchainProfile::new("clang++", "gnu++20")
        .with_flag("-fno-exceptions")
        .with_flag("-fno-rtti")
        .with_shim(layout.shim_header())
        .include_before(layout.core_include())
        .include_before(layout.shell_include())
        .include_before(layout.vendor_sources())
        .include_before(layout.vendor_include())
        // CEdev ships its own sys/types.h and friends; it must only fill
        // gaps left by the host headers.
        .include_after_system(layout.sdk_include())
        // Feature flags used by the CE build.
        .define("TEX_USE_FONTLIB")
        .define("TEX_DIRECT_RENDER");

    profile.extra_flags.extend(extra_flags.iter().cloned());
    profile.defines.extend(extra_defines.iter().cloned());
    profile
}

/// Run the full setup with the configured command and the system linker.
pub fn setup(opts: &SetupOptions, shell: &Shell) -> Result<SetupReport, SetupError> {
    let mut configure = CommandConfigure::new(&opts.configure, opts.layout.root())?;
    setup_with(opts, &mut configure, &SystemLinker, shell)
}

/// Run the full setup with an explicit configure action and linker.
pub fn setup_with(
    opts: &SetupOptions,
    configure: &mut dyn ConfigureAction,
    linker: &dyn Linker,
    shell: &Shell,
) -> Result<SetupReport, SetupError> {
    let layout = &opts.layout;
    let mut report = SetupReport::default();

    check_environment(layout, shell, &mut report)?;

    let native_db = layout.native_database();
    if !native_db.exists() {
        shell.status(
            Status::Configuring,
            format!("native build (`{}`)", configure.describe()),
        );
    } else {
        shell.verbose(Status::Resolving, native_db.display());
    }
    let resolved = resolve_artifact(&native_db, configure)?;

    let published = layout.native_publish_path();
    publish_with(linker, resolved.path(), &published)?;
    shell.status(
        Status::Published,
        format!("{} -> {}", published.display(), resolved.path().display()),
    );
    report.native_database = resolved.into_path();
    report.published_database = published;

    // Units are discovered before the shim is written so an empty source
    // tree leaves nothing behind.
    let db = Synthesizer::new(layout.root())
        .synthesize(&layout.cross_sources(), &opts.cross_profile())?;

    report.shim_created = ensure_shim(layout)?;
    if report.shim_created {
        shell.status(Status::Created, layout.shim_header().display());
    }

    let cross_db = layout.cross_database();
    write_database(&db, &cross_db)?;
    shell.status(
        Status::Generated,
        format!("{} ({} entries)", cross_db.display(), db.len()),
    );
    report.cross_database = cross_db;
    report.cross_entries = db.len();

    if opts.emit_editor {
        report.editor_files = write_editor_preferences(&layout.vscode_dir())?;
        for file in &report.editor_files {
            shell.verbose(Status::Created, file.display());
        }
    } else {
        shell.verbose(Status::Skipped, "editor preferences");
    }

    print_summary(layout, &report, shell);
    Ok(report)
}

/// Synthesize the cross database without touching the filesystem.
///
/// The SDK check still applies; the native database is not resolved.
pub fn preview_cross_database(opts: &SetupOptions) -> Result<CompileDatabase, SetupError> {
    require_sdk(&opts.layout)?;
    Synthesizer::new(opts.layout.root())
        .synthesize(&opts.layout.cross_sources(), &opts.cross_profile())
}

fn require_sdk(layout: &ProjectLayout) -> Result<(), SetupError> {
    let sdk_include = layout.sdk_include();
    if sdk_include.is_dir() {
        Ok(())
    } else {
        Err(SetupError::MissingDependency {
            what: "CEdev include dir".to_string(),
            path: sdk_include,
        })
    }
}

fn check_environment(
    layout: &ProjectLayout,
    shell: &Shell,
    report: &mut SetupReport,
) -> Result<(), SetupError> {
    shell.verbose(Status::Checking, layout.sdk_include().display());
    require_sdk(layout)?;

    // Missing vendor sources only make some includes unresolvable; the
    // database is still generated as-is.
    let vendor = layout.vendor_sources();
    if !vendor.is_dir() {
        let warning = SetupWarning::MissingOptionalAsset {
            what: "libtexce sources".to_string(),
            path: vendor,
        };
        tracing::debug!("{}", warning);
        shell.diagnostic(&warning.to_diagnostic());
        report.warnings.push(warning);
    }

    Ok(())
}

fn ensure_shim(layout: &ProjectLayout) -> Result<bool, SetupError> {
    let shim = layout.shim_header();
    write_if_missing(&shim, CE_SHIM_HEADER).map_err(|e| SetupError::WriteFailure {
        path: shim,
        source: e,
    })
}

fn print_summary(layout: &ProjectLayout, report: &SetupReport, shell: &Shell) {
    let rel = |p: &PathBuf| crate::util::fs::relative_path(layout.root(), p).display().to_string();

    shell.status(Status::Finished, "clangd setup");
    shell.note(format!(
        "{} -> {}",
        rel(&report.published_database),
        rel(&report.native_database)
    ));
    shell.note(format!(
        "{} generated for host clang++ parsing",
        rel(&report.cross_database)
    ));
    if !report.editor_files.is_empty() {
        shell.note(".vscode/{settings,extensions}.json written");
        shell.note("restart clangd in VS Code (Command Palette: 'clangd: Restart language server')");
    }
}
