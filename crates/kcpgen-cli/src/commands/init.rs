//! `kcpgen init`: lay down a new project and record it in `PROJECT`.

use std::path::Path;

use tracing::{debug, info, instrument};

use kcpgen_core::{
    application::{InitScaffolder, Scaffolder},
    domain::{License, ProjectConfig},
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project_file,
};

/// Scaffold a fresh project.
///
/// Dispatch sequence:
/// 1. Resolve the project directory and refuse an existing `PROJECT`
/// 2. Fill unset flags from config and the directory name
/// 3. Run the init scaffolder over the local filesystem
/// 4. Persist `PROJECT` once every file was written
#[instrument(skip_all, fields(dir = tracing::field::Empty))]
pub fn execute(
    args: InitArgs,
    _global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let dir = super::project_dir(args.project_dir.as_deref())?;
    tracing::Span::current().record("dir", tracing::field::display(dir.display()));

    if project_file::exists(&dir) && !args.force {
        return Err(CliError::ProjectExists {
            path: project_file::path_in(&dir),
        });
    }

    let project = build_project_config(&args, &config, &dir)?;
    let license = resolve_license(&args, &config)?;
    debug!(
        project = %project.project_name,
        domain = %project.domain,
        repo = %project.repo,
        license = license.as_str(),
        "Project resolved"
    );

    std::fs::create_dir_all(&dir).map_err(|e| CliError::IoError {
        message: format!("Failed to create project directory '{}'", dir.display()),
        source: e,
    })?;

    let mut scaffolder = InitScaffolder::new(project.clone())
        .with_license(license)
        .with_force(args.force);
    if let Some(owner) = args.owner.as_ref().or(config.defaults.owner.as_ref()) {
        scaffolder = scaffolder.with_owner(owner.as_str());
    }

    output.header(&format!("Initialising '{}'...", project.project_name))?;
    let report = scaffolder.scaffold(&super::local_scaffold(&dir, &config))?;
    output.report(&report)?;
    report.into_result()?;

    project_file::save(&dir, &project)?;
    info!(project = %project.project_name, "Project initialised");

    output.success(&format!("Project '{}' initialised", project.project_name))?;
    output.print("")?;
    output.print("Next steps:")?;
    output.print("  kcpgen create api --group <group> --version <version> --kind <Kind>")?;

    Ok(())
}

fn build_project_config(args: &InitArgs, config: &AppConfig, dir: &Path) -> CliResult<ProjectConfig> {
    let domain = args
        .domain
        .clone()
        .or_else(|| config.defaults.domain.clone())
        .ok_or_else(|| CliError::InvalidInput {
            message: "--domain is required (or set defaults.domain in the config)".into(),
            source: None,
        })?;

    let project_name = match &args.project_name {
        Some(name) => name.clone(),
        None => default_project_name(dir)?,
    };
    let repo = args.repo.clone().unwrap_or_else(|| project_name.clone());

    let mut project = ProjectConfig::new(project_name, domain, repo)
        .with_multigroup(args.multigroup)
        .with_component_config(args.component_config);
    if !args.plugins.is_empty() {
        project = project.with_plugin_chain(args.plugins.clone());
    }
    Ok(project)
}

/// Lower-cased name of the project directory.
fn default_project_name(dir: &Path) -> CliResult<String> {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::env::current_dir()?.join(dir)
    };

    absolute
        .components()
        .next_back()
        .and_then(|c| c.as_os_str().to_str())
        .filter(|name| !name.is_empty() && *name != "." && *name != "/")
        .map(str::to_lowercase)
        .ok_or_else(|| CliError::InvalidInput {
            message: format!(
                "cannot derive a project name from '{}'; pass --project-name",
                dir.display()
            ),
            source: None,
        })
}

fn resolve_license(args: &InitArgs, config: &AppConfig) -> CliResult<License> {
    match args.license {
        Some(arg) => Ok(arg.into()),
        None => config
            .defaults
            .license
            .parse::<License>()
            .map_err(|e| CliError::ConfigError {
                message: format!("defaults.license: {e}"),
                source: Some(Box::new(e)),
            }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
