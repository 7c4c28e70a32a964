//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. Environment variables, `BREVITY_` prefix, `__` between sections
//!    (`BREVITY_LIBRARY__PATH=/opt/brevity/lib`)
//! 3. Config file (`--config FILE`, else the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

const ENV_PREFIX: &str = "BREVITY";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Generator library settings.
    pub library: LibraryConfig,
    /// Defaults for `brevity generate`.
    pub generate: GenerateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub render_only: bool,
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
    /// An explicit `config_file` must exist when `must_exist` is set; the
    /// default location is always optional.
    pub fn load(config_file: Option<&PathBuf>, must_exist: bool) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), must_exist),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> CliResult<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("generate.render_only", defaults.generate.render_only)
            .and_then(|b| b.set_default("output.no_color", defaults.output.no_color))
            .and_then(|b| b.set_default("output.format", defaults.output.format.clone()))
            .map_err(config_error)?
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .add_source(env.prefix_separator("_").separator("__").try_parsing(true))
            .build()
            .map_err(config_error)?;

        settings.try_deserialize().map_err(config_error)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.brevity.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "brevity", "brevity")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".brevity.toml"))
    }

    /// Library folder: the `--lib` flag (or `BREVITY_LIB`) first, then config.
    pub fn library(&self, flag: Option<PathBuf>) -> CliResult<PathBuf> {
        flag.or_else(|| self.library.path.clone())
            .ok_or(CliError::MissingLibrary)
    }

    /// Value of one dotted key, as shown by `brevity config get`.
    pub fn get(&self, key: &str) -> CliResult<String> {
        match key {
            "library.path" => Ok(self
                .library
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()),
            "generate.render_only" => Ok(self.generate.render_only.to_string()),
            "output.no_color" => Ok(self.output.no_color.to_string()),
            "output.format" => Ok(self.output.format.clone()),
            _ => Err(CliError::ConfigError {
                message: format!("Unknown config key: '{key}'"),
                source: None,
            }),
        }
    }
}

fn config_error(e: config::ConfigError) -> CliError {
    CliError::ConfigError {
        message: e.to_string(),
        source: Some(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(config::Map::new()))
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(&temp.path().join("none.toml"), false, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_required_file_is_error() {
        let temp = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&temp.path().join("none.toml"), true, no_env()).unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[library]\npath = \"/opt/lib\"\n\n[generate]\nrender_only = true\n")
            .unwrap();

        let cfg = AppConfig::load_from(&path, true, no_env()).unwrap();
        assert_eq!(cfg.library.path, Some(PathBuf::from("/opt/lib")));
        assert!(cfg.generate.render_only);
        assert_eq!(cfg.output.format, "human");
    }

    #[test]
    fn environment_overrides_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[library]\npath = \"/opt/lib\"\n").unwrap();

        let mut vars = config::Map::new();
        vars.insert("BREVITY_LIBRARY__PATH".to_string(), "/env/lib".to_string());
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));
        let cfg = AppConfig::load_from(&path, true, env).unwrap();
        assert_eq!(cfg.library.path, Some(PathBuf::from("/env/lib")));
    }

    #[test]
    fn library_flag_wins_over_config() {
        let mut cfg = AppConfig::default();
        assert!(matches!(cfg.library(None), Err(CliError::MissingLibrary)));
        cfg.library.path = Some(PathBuf::from("/cfg"));
        assert_eq!(cfg.library(None).unwrap(), PathBuf::from("/cfg"));
        assert_eq!(
            cfg.library(Some(PathBuf::from("/flag"))).unwrap(),
            PathBuf::from("/flag")
        );
    }

    #[test]
    fn get_known_and_unknown_keys() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.get("output.no_color").unwrap(), "false");
        assert_eq!(cfg.get("library.path").unwrap(), "");
        assert!(matches!(cfg.get("does.not.exist"), Err(CliError::ConfigError { .. })));
    }
}
