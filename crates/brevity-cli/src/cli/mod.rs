//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "brevity",
    bin_name = "brevity",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Generate projects from brief specifications",
    long_about = "Brevity reads a specification of one or more projects and \
                  generates them from a library of section generators: \
                  templates write files, actions run commands.",
    after_help = "EXAMPLES:\n\
        \x20 brevity generate app.brief ./out --lib ./library\n\
        \x20 brevity generate app.brief ./out --render\n\
        \x20 brevity expand app.brief\n\
        \x20 brevity list --lib ./library",
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
    /// Generate brevity projects into a destination folder.
    #[command(
        visible_alias = "g",
        about = "Generate brevity projects",
        long_about = "Creates files and folders for every project of a brevity \
                      specification. The destination folder must already exist.",
        after_help = "EXAMPLES:\n\
            \x20 brevity generate app.brief ./out\n\
            \x20 brevity generate app.brief ./out --lib ~/brevity/lib --render"
    )]
    Generate(GenerateArgs),

    /// Print the specification after macro expansion.
    #[command(
        about = "Show projects after macro expansion",
        after_help = "EXAMPLES:\n\
            \x20 brevity expand app.brief\n\
            \x20 brevity expand app.brief --lib ./library"
    )]
    Expand(ExpandArgs),

    /// List section kinds available in the library.
    #[command(
        visible_alias = "ls",
        about = "List library sections",
        after_help = "EXAMPLES:\n\
            \x20 brevity list\n\
            \x20 brevity list --format json"
    )]
    List(ListArgs),

    /// Initialise a brevity configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 brevity init\n\
            \x20 brevity init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 brevity completions bash > ~/.local/share/bash-completion/completions/brevity\n\
            \x20 brevity completions zsh  > ~/.zfunc/_brevity\n\
            \x20 brevity completions fish > ~/.config/fish/completions/brevity.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the brevity configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 brevity config get library.path\n\
            \x20 brevity config list\n\
            \x20 brevity config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Where section generators are looked up.
#[derive(Debug, Args)]
pub struct LibraryArgs {
    #[arg(
        short = 'l',
        long = "lib",
        value_name = "DIR",
        env = "BREVITY_LIB",
        help = "Generator library folder"
    )]
    pub lib: Option<PathBuf>,
}

// ── generate ──────────────────────────────────────────────────────────────────

/// Arguments for `brevity generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Brevity specification file.
    #[arg(value_name = "SPECFILE")]
    pub spec: PathBuf,

    /// Where to put the project root folders.
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Report actions instead of running them.
    #[arg(
        short = 'r',
        long = "render",
        help = "Render templates only; print actions without running them"
    )]
    pub render: bool,
}

// ── expand ────────────────────────────────────────────────────────────────────

/// Arguments for `brevity expand`.
#[derive(Debug, Args)]
pub struct ExpandArgs {
    /// Brevity specification file.
    #[arg(value_name = "SPECFILE")]
    pub spec: PathBuf,

    #[command(flatten)]
    pub library: LibraryArgs,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `brevity list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `brevity init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `brevity completions`.
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

/// Subcommands for `brevity config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `library.path`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the active configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
