//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.clangd-setup/config.toml` - User-wide defaults
//! - Project: `.clangd-setup.toml` in the project root - Project-specific overrides
//!
//! Project config takes precedence over global config, and command-line
//! flags take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::normalize_path;

/// File name of the project-level config.
pub const PROJECT_CONFIG_NAME: &str = ".clangd-setup.toml";

/// Default native build directory, relative to the project root.
pub const DEFAULT_NATIVE_BUILD_DIR: &str = "build/native";

/// Setup configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CE SDK settings
    pub sdk: SdkConfig,

    /// Native build settings
    pub native: NativeConfig,

    /// Cross database settings
    pub cross: CrossConfig,

    /// Editor preference settings
    pub editor: EditorConfig,
}

/// CE SDK settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// CEdev root (default: ~/CEdev)
    pub root: Option<PathBuf>,
}

/// Native build settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// Build directory holding the native compile database
    pub build_dir: Option<PathBuf>,

    /// Command that configures the native build
    pub configure: Option<Vec<String>>,
}

/// Extra flags for the cross database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossConfig {
    /// Appended after the built-in defines
    pub extra_defines: Option<Vec<String>>,

    /// Appended after the built-in extra flags
    pub extra_flags: Option<Vec<String>>,
}

impl CrossConfig {
    pub fn extra_defines(&self) -> &[String] {
        self.extra_defines.as_deref().unwrap_or_default()
    }

    pub fn extra_flags(&self) -> &[String] {
        self.extra_flags.as_deref().unwrap_or_default()
    }
}

/// Editor preference settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Write .vscode files (default: true)
    pub emit: Option<bool>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        if other.sdk.root.is_some() {
            self.sdk.root = other.sdk.root;
        }
        if other.native.build_dir.is_some() {
            self.native.build_dir = other.native.build_dir;
        }
        if other.native.configure.is_some() {
            self.native.configure = other.native.configure;
        }
        if other.cross.extra_defines.is_some() {
            self.cross.extra_defines = other.cross.extra_defines;
        }
        if other.cross.extra_flags.is_some() {
            self.cross.extra_flags = other.cross.extra_flags;
        }
        if other.editor.emit.is_some() {
            self.editor.emit = other.editor.emit;
        }
    }

    /// The configure command, defaulting to `cmake --preset native`.
    pub fn configure_command(&self) -> Vec<String> {
        self.native
            .configure
            .clone()
            .filter(|argv| !argv.is_empty())
            .unwrap_or_else(|| {
                ["cmake", "--preset", "native"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
    }

    /// Native build directory, defaulting to `build/native`.
    pub fn native_build_dir(&self) -> PathBuf {
        self.native
            .build_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_NATIVE_BUILD_DIR))
    }

    /// Absolute SDK root, defaulting to `~/CEdev`.
    ///
    /// A relative `sdk.root` is taken relative to `project_root`.
    pub fn sdk_root(&self, project_root: &Path) -> Option<PathBuf> {
        self.sdk
            .root
            .as_deref()
            .map(|root| normalize_path(&project_root.join(expand_home(root))))
            .or_else(|| home_dir().map(|home| home.join("CEdev")))
    }

    pub fn emit_editor(&self) -> bool {
        self.editor.emit.unwrap_or(true)
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.clangd-setup.toml)
/// 2. Global config (~/.clangd-setup/config.toml)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_root: &Path) -> Result<Config> {
    let mut config = Config::default();

    if let Some(global_path) = global_path.filter(|p| p.exists()) {
        config.merge(Config::load(global_path)?);
    }

    let project_path = project_config_path(project_root);
    if project_path.exists() {
        config.merge(Config::load(&project_path)?);
    }

    Ok(config)
}

/// Get the global config directory (~/.clangd-setup).
pub fn global_config_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(".clangd-setup"))
}

/// Get the global config path (~/.clangd-setup/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.clangd-setup.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_NAME)
}

fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().to_path_buf())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
