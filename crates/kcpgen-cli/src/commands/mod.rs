//! Command handlers, one module per subcommand.

use std::path::{Path, PathBuf};

use kcpgen_adapters::{LocalFilesystem, TeraRenderer};
use kcpgen_core::application::Scaffold;

use crate::{
    config::AppConfig,
    error::{CliResult, IntoCli},
};

pub mod completions;
pub mod config;
pub mod create;
pub mod init;

/// `--project-dir`, or the current directory.
fn project_dir(arg: Option<&Path>) -> CliResult<PathBuf> {
    match arg {
        Some(dir) => Ok(dir.to_path_buf()),
        None => std::env::current_dir().with_cli_context(|| "Failed to read current directory"),
    }
}

/// An orchestrator rooted at `dir` over the real filesystem.
fn local_scaffold(dir: &Path, config: &AppConfig) -> Scaffold {
    Scaffold::new(
        dir,
        Box::new(LocalFilesystem::new()),
        Box::new(TeraRenderer::new()),
    )
    .with_options(config.scaffold.options())
}
