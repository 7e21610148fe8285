//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `KCPGEN__SECTION__KEY`
//! 3. Config file (`--config`, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use kcpgen_core::{application::ScaffoldOptions, domain::FragmentPolicy};

const ENV_PREFIX: &str = "KCPGEN";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Fallbacks for `init` flags.
    pub defaults: Defaults,
    /// Orchestrator settings.
    pub scaffold: ScaffoldConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub domain: Option<String>,
    pub license: String,
    pub owner: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            domain: None,
            license: "apache2".into(),
            owner: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldConfig {
    pub file_mode: u32,
    pub dir_mode: u32,
    /// Stop at the first file that fails.
    pub strict: bool,
    /// Also skip multi-line fragments already present in the file.
    pub dedupe_fragments: bool,
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        let options = ScaffoldOptions::default();
        Self {
            file_mode: options.file_mode,
            dir_mode: options.dir_mode,
            strict: options.strict,
            dedupe_fragments: false,
        }
    }
}

impl ScaffoldConfig {
    pub fn options(&self) -> ScaffoldOptions {
        ScaffoldOptions {
            file_mode: self.file_mode,
            dir_mode: self.dir_mode,
            strict: self.strict,
            fragment_policy: if self.dedupe_fragments {
                FragmentPolicy::SkipExisting
            } else {
                FragmentPolicy::Append
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required)
    }

    fn load_from(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialise built-in defaults")?;

        Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path.to_path_buf())
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.kcpgen.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "kcp", "kcpgen")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kcpgen.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_orchestrator_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.license, "apache2");
        assert_eq!(cfg.scaffold.options(), ScaffoldOptions::default());
    }

    #[test]
    fn default_no_color_is_false() {
        assert!(!AppConfig::default().output.no_color);
    }

    #[test]
    fn missing_optional_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("absent.toml"), false).unwrap();
        assert_eq!(cfg.scaffold.file_mode, 0o644);
        assert_eq!(cfg.output.format, "human");
    }

    #[test]
    fn missing_required_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("absent.toml"), true).is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[defaults]\ndomain = \"example.com\"\n\n[scaffold]\nstrict = true\ndedupe_fragments = true"
        )
        .unwrap();

        let cfg = AppConfig::load_from(file.path(), true).unwrap();
        assert_eq!(cfg.defaults.domain.as_deref(), Some("example.com"));
        assert_eq!(cfg.defaults.license, "apache2");
        assert!(cfg.scaffold.strict);
        assert_eq!(
            cfg.scaffold.options().fragment_policy,
            FragmentPolicy::SkipExisting
        );
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
