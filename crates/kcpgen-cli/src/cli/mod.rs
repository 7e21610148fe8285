//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use kcpgen_core::domain::License;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "kcpgen",
    bin_name = "kcpgen",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Scaffold kcp-aware controller projects",
    long_about = "kcpgen lays out Go controller projects that run against kcp \
                  workspaces and grows them one API at a time.",
    after_help = "EXAMPLES:\n\
        \x20 kcpgen init --domain example.com --repo github.com/acme/widgets\n\
        \x20 kcpgen create api --group apps --version v1 --kind Widget\n\
        \x20 kcpgen completions bash > /usr/share/bash-completion/completions/kcpgen",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialise a new project in the target directory.
    #[command(
        about = "Initialise a new project",
        after_help = "EXAMPLES:\n\
            \x20 kcpgen init --domain example.com\n\
            \x20 kcpgen init --domain example.com --repo github.com/acme/widgets --owner \"Acme\"\n\
            \x20 kcpgen init --domain example.com --multigroup --project-dir ./widgets"
    )]
    Init(InitArgs),

    /// Scaffold something into an existing project.
    #[command(subcommand, about = "Scaffold a Kubernetes API or controller")]
    Create(CreateCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 kcpgen completions bash > ~/.local/share/bash-completion/completions/kcpgen\n\
            \x20 kcpgen completions zsh  > ~/.zfunc/_kcpgen\n\
            \x20 kcpgen completions fish > ~/.config/fish/completions/kcpgen.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the kcpgen configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 kcpgen config get defaults.domain\n\
            \x20 kcpgen config list\n\
            \x20 kcpgen config path"
    )]
    Config(ConfigCommands),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `kcpgen init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Domain for groups, e.g. `example.com`.
    #[arg(long = "domain", value_name = "DOMAIN", help = "Domain for groups")]
    pub domain: Option<String>,

    /// Go module path.  Defaults to the project name.
    #[arg(long = "repo", value_name = "MODULE", help = "Go module path")]
    pub repo: Option<String>,

    /// Project name.  Defaults to the lower-cased directory name.
    #[arg(long = "project-name", value_name = "NAME", help = "Project name")]
    pub project_name: Option<String>,

    /// License header for generated sources.
    #[arg(long = "license", value_enum, help = "License for the boilerplate header")]
    pub license: Option<LicenseArg>,

    /// Copyright owner written into the boilerplate header.
    #[arg(long = "owner", value_name = "OWNER", help = "Copyright owner")]
    pub owner: Option<String>,

    /// Nest API packages under their group.
    #[arg(long = "multigroup", help = "Use the multi-group layout")]
    pub multigroup: bool,

    /// Read manager options from a ComponentConfig file.
    #[arg(long = "component-config", help = "Generate ComponentConfig wiring")]
    pub component_config: bool,

    /// Plugin chain recorded in the PROJECT file.
    #[arg(
        long = "plugins",
        value_name = "KEYS",
        value_delimiter = ',',
        help = "Comma-separated plugin keys"
    )]
    pub plugins: Vec<String>,

    /// Overwrite files that already exist.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Where to create the project.
    #[arg(
        long = "project-dir",
        value_name = "DIR",
        help = "Project directory (default: current directory)"
    )]
    pub project_dir: Option<PathBuf>,
}

/// Licenses the boilerplate header can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LicenseArg {
    Apache2,
    None,
}

impl From<LicenseArg> for License {
    fn from(arg: LicenseArg) -> Self {
        match arg {
            LicenseArg::Apache2 => License::Apache2,
            LicenseArg::None => License::None,
        }
    }
}

// ── create ────────────────────────────────────────────────────────────────────

/// Subcommands for `kcpgen create`.
#[derive(Debug, Subcommand)]
pub enum CreateCommands {
    /// Scaffold a Kubernetes API and/or its controller.
    #[command(
        disable_version_flag = true,
        after_help = "EXAMPLES:\n\
            \x20 kcpgen create api --group apps --version v1 --kind Widget\n\
            \x20 kcpgen create api --group apps --version v1 --kind Widget --controller=false\n\
            \x20 kcpgen create api --group apps --version v1beta1 --kind Gadget --namespaced=false"
    )]
    Api(CreateApiArgs),
}

/// Arguments for `kcpgen create api`.
#[derive(Debug, Args)]
pub struct CreateApiArgs {
    /// API group, without the domain.  Empty means the core group.
    #[arg(long = "group", value_name = "GROUP", default_value = "")]
    pub group: String,

    #[arg(long = "version", value_name = "VERSION", help = "API version, e.g. v1")]
    pub version: String,

    #[arg(long = "kind", value_name = "KIND", help = "Resource kind, e.g. Widget")]
    pub kind: String,

    /// Override the plural resource name.
    #[arg(long = "plural", value_name = "PLURAL")]
    pub plural: Option<String>,

    /// Generate the resource types.
    #[arg(
        long = "resource",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        help = "Generate the resource types"
    )]
    pub resource: bool,

    /// Generate the controller.
    #[arg(
        long = "controller",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        help = "Generate the controller"
    )]
    pub controller: bool,

    /// Whether the resource is namespaced.
    #[arg(
        long = "namespaced",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true",
        help = "Resource is namespace-scoped"
    )]
    pub namespaced: bool,

    /// Overwrite existing types and controller files.
    #[arg(long = "force", help = "Overwrite existing files")]
    pub force: bool,

    #[arg(
        long = "project-dir",
        value_name = "DIR",
        help = "Project directory (default: current directory)"
    )]
    pub project_dir: Option<PathBuf>,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `kcpgen completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `kcpgen config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `defaults.domain`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
