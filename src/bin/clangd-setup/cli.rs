//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use clangd_setup::util::shell::ColorChoice;

/// Generate clangd compile databases for the native core and the CE shell
#[derive(Parser)]
#[command(name = "clangd-setup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project root (defaults to the nearest directory with CMakePresets.json)
    #[arg(long, value_name = "PATH")]
    pub project_root: Option<PathBuf>,

    /// Path to the CEdev SDK
    #[arg(long, visible_alias = "sdk", env = "CEDEV", value_name = "PATH")]
    pub cedev: Option<PathBuf>,

    /// Native build directory holding compile_commands.json
    #[arg(long, value_name = "PATH")]
    pub native_build_dir: Option<PathBuf>,

    /// Do not write .vscode preference files
    #[arg(long, visible_alias = "no-editor")]
    pub no_vscode: bool,

    /// Print the synthesized shell database to stdout and write nothing
    #[arg(long)]
    pub print_db: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["clangd-setup", "--sdk", "/opt/CEdev", "--no-editor"]);
        assert_eq!(cli.cedev, Some(PathBuf::from("/opt/CEdev")));
        assert!(cli.no_vscode);
        assert_eq!(cli.color, ColorChoice::Auto);
    }
}
