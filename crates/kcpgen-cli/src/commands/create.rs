//! `kcpgen create api`: add a resource to an existing project.

use tracing::{info, instrument};

use kcpgen_core::{
    application::{ApiScaffolder, Scaffolder},
    domain::Resource,
};

use crate::{
    cli::{CreateApiArgs, CreateCommands, GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
    project_file,
};

pub fn execute(
    cmd: CreateCommands,
    global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        CreateCommands::Api(args) => execute_api(args, global, config, output),
    }
}

#[instrument(skip_all, fields(group = %args.group, version = %args.version, kind = %args.kind))]
fn execute_api(
    args: CreateApiArgs,
    _global: &GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let dir = super::project_dir(args.project_dir.as_deref())?;
    let project = project_file::load(&dir)?;
    let resource = build_resource(&args)?;

    let scaffolder = ApiScaffolder::new(project, resource, args.force)?;
    output.header(&format!("Creating {}...", scaffolder.resource()))?;

    let report = scaffolder.scaffold(&super::local_scaffold(&dir, &config))?;
    output.report(&report)?;
    report.into_result()?;

    project_file::save(&dir, &scaffolder.updated_config())?;
    info!(resource = %scaffolder.resource(), "API created");

    output.success(&format!("Created {}", scaffolder.resource()))?;
    if scaffolder.resource().has_api() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print("  make generate manifests apiresourceschemas")?;
    }
    Ok(())
}

fn build_resource(args: &CreateApiArgs) -> CliResult<Resource> {
    if !args.resource && !args.controller {
        return Err(CliError::InvalidInput {
            message: "nothing to scaffold: both --resource and --controller are false".into(),
            source: None,
        });
    }

    let mut resource = Resource::new(args.group.as_str(), args.version.as_str(), args.kind.as_str())
        .with_controller(args.controller);
    if args.resource {
        resource = resource.with_api(args.namespaced);
    }
    if let Some(plural) = &args.plural {
        resource = resource.with_plural(plural.as_str());
    }
    Ok(resource)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn api_args(extra: &[&str]) -> CreateApiArgs {
        let mut argv = vec!["kcpgen", "create", "api", "--version", "v1", "--kind", "Widget"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Create(CreateCommands::Api(args)) => args,
            other => panic!("expected create api, got {other:?}"),
        }
    }

    #[test]
    fn defaults_request_api_and_controller() {
        let resource = build_resource(&api_args(&["--group", "apps"])).unwrap();
        assert!(resource.has_api());
        assert!(resource.has_controller());
        assert!(resource.namespaced);
        assert_eq!(resource.group, "apps");
    }

    #[test]
    fn controller_only() {
        let resource = build_resource(&api_args(&["--resource=false"])).unwrap();
        assert!(!resource.has_api());
        assert!(resource.has_controller());
    }

    #[test]
    fn cluster_scoped_api() {
        let resource =
            build_resource(&api_args(&["--namespaced=false", "--controller=false"])).unwrap();
        assert!(resource.has_api());
        assert!(!resource.namespaced);
        assert!(!resource.has_controller());
    }

    #[test]
    fn explicit_plural() {
        let resource = build_resource(&api_args(&["--plural", "widgetz"])).unwrap();
        assert_eq!(resource.plural(), "widgetz");
    }

    #[test]
    fn nothing_requested_is_rejected() {
        let err = build_resource(&api_args(&["--resource=false", "--controller=false"]))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
