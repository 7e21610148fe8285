//! `kcpgen config`: inspect configuration values.

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            let value = get_config_value(&config, &key)?;
            output.print(&format!("{key} = {value}"))?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&AppConfig::config_path().display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match key {
        "defaults.domain" => Ok(config.defaults.domain.clone().unwrap_or_default()),
        "defaults.license" => Ok(config.defaults.license.clone()),
        "defaults.owner" => Ok(config.defaults.owner.clone().unwrap_or_default()),
        "scaffold.file_mode" => Ok(format!("{:o}", config.scaffold.file_mode)),
        "scaffold.dir_mode" => Ok(format!("{:o}", config.scaffold.dir_mode)),
        "scaffold.strict" => Ok(config.scaffold.strict.to_string()),
        "scaffold.dedupe_fragments" => Ok(config.scaffold.dedupe_fragments.to_string()),
        "output.no_color" => Ok(config.output.no_color.to_string()),
        "output.format" => Ok(config.output.format.clone()),
        _ => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn get_known_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.license").unwrap(), "apache2");
    }

    #[test]
    fn modes_print_in_octal() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "scaffold.file_mode").unwrap(), "644");
        assert_eq!(get_config_value(&cfg, "scaffold.dir_mode").unwrap(), "755");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }

    #[test]
    fn unset_domain_is_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.domain").unwrap(), "");
    }
}
