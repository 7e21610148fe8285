//! Reading and writing the `PROJECT` file at the project root.

use std::path::{Path, PathBuf};

use tracing::debug;

use kcpgen_core::domain::ProjectConfig;

use crate::error::{CliError, CliResult, IntoCli};

pub const PROJECT_FILE: &str = "PROJECT";

const HEADER: &str = "# Code generated by tool. DO NOT EDIT.\n\
# This file is used to track the info used to scaffold your project\n\
# and allow the plugins properly work.\n\
# More info: https://book.kubebuilder.io/reference/project-config.html\n";

pub fn path_in(dir: &Path) -> PathBuf {
    dir.join(PROJECT_FILE)
}

pub fn exists(dir: &Path) -> bool {
    path_in(dir).is_file()
}

pub fn load(dir: &Path) -> CliResult<ProjectConfig> {
    let path = path_in(dir);
    if !path.is_file() {
        return Err(CliError::ProjectNotFound { path });
    }

    let raw = std::fs::read_to_string(&path)
        .with_cli_context(|| format!("Failed to read {}", path.display()))?;
    let config = serde_yaml::from_str(&raw).map_err(|e| CliError::ProjectFile {
        path: path.clone(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    debug!(path = %path.display(), "Loaded PROJECT");
    Ok(config)
}

pub fn save(dir: &Path, config: &ProjectConfig) -> CliResult<()> {
    let path = path_in(dir);
    let body = serde_yaml::to_string(config).map_err(|e| CliError::ProjectFile {
        path: path.clone(),
        message: e.to_string(),
        source: Some(Box::new(e)),
    })?;

    std::fs::write(&path, format!("{HEADER}{body}"))
        .with_cli_context(|| format!("Failed to write {}", path.display()))?;

    debug!(path = %path.display(), resources = config.resources.len(), "Saved PROJECT");
    Ok(())
}
