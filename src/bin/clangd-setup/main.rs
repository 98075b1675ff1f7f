//! clangd-setup CLI

use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;

use clangd_setup::core::ProjectLayout;
use clangd_setup::ops::{preview_cross_database, setup, SetupError, SetupOptions};
use clangd_setup::util::config::{expand_home, global_config_path, load_config};
use clangd_setup::util::fs::normalize_path;
use clangd_setup::util::{GlobalContext, Shell};

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("clangd_setup=debug")
    } else {
        EnvFilter::new("clangd_setup=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color);

    if let Err(e) = run(cli, &shell) {
        match e.downcast_ref::<SetupError>() {
            Some(err) => {
                shell.diagnostic(&err.to_diagnostic());
                process::exit(err.exit_code());
            }
            None => {
                eprintln!("error: {:#}", e);
                process::exit(1);
            }
        }
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let root = match cli.project_root {
        Some(root) => normalize_path(&ctx.cwd().join(root)),
        None => ctx.find_project_root()?,
    };
    tracing::debug!("project root: {}", root.display());

    // Load configuration (global + project), then apply CLI overrides
    let mut config = load_config(global_config_path().as_deref(), &root)?;
    // Command-line paths are relative to the invocation directory; config
    // paths are relative to the project root.
    if let Some(cedev) = cli.cedev {
        config.sdk.root = Some(normalize_path(&ctx.cwd().join(expand_home(&cedev))));
    }
    if let Some(dir) = cli.native_build_dir {
        config.native.build_dir = Some(dir);
    }
    if cli.no_vscode {
        config.editor.emit = Some(false);
    }

    let sdk_root = config
        .sdk_root(&root)
        .context("could not determine the CEdev location; pass --cedev")?;

    let layout = ProjectLayout::new(&root, sdk_root, config.native_build_dir());
    let mut opts = SetupOptions::new(layout);
    opts.configure = config.configure_command();
    opts.emit_editor = config.emit_editor();
    opts.extra_flags = config.cross.extra_flags().to_vec();
    opts.extra_defines = config.cross.extra_defines().to_vec();

    if cli.print_db {
        let db = preview_cross_database(&opts)?;
        print!("{}", db.to_json_string()?);
        return Ok(());
    }

    setup(&opts, shell)?;
    Ok(())
}
