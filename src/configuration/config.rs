use std::env;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::error_handling::types::ConfigError;

fn default_port() -> u16 {
    8080
}

fn default_database_file() -> PathBuf {
    PathBuf::from("closetheloop.sqlite3")
}

fn default_files_dir() -> PathBuf {
    PathBuf::from("files")
}

fn default_generation_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_generation_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_generation_timeout_secs() -> u64 {
    60
}

/// Application configuration structure that defines all runtime parameters.
///
/// Parsed from command-line arguments and environment variables via `clap`,
/// or from a TOML file when no arguments are given and `closetheloop.toml`
/// exists in the working directory.
///
/// # Fields Overview
///
/// - `port`: TCP port the HTTP API binds to
/// - `database_file`: SQLite database file path
/// - `files_dir`: base directory of the uploaded-files object store
/// - `generation_endpoint`: base URL of the generation backend
/// - `generation_model`: model name passed to the generation backend
/// - `generation_api_key`: API key for the generation backend
/// - `generation_timeout_secs`: per-call deadline for generation requests
#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "closetheloop")]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// TCP port for the HTTP API.
    ///
    /// # Command Line
    /// Use `--port <PORT>` or `CLOSETHELOOP_PORT` to set this value
    #[arg(long, env = "CLOSETHELOOP_PORT", default_value_t = default_port())]
    pub port: u16,

    /// SQLite database file.
    ///
    /// Created (with parent directories) on first start if missing.
    #[arg(long, env = "CLOSETHELOOP_DATABASE_FILE", default_value_os_t = default_database_file())]
    pub database_file: PathBuf,

    /// Base directory for stored upload bytes.
    #[arg(long, env = "CLOSETHELOOP_FILES_DIR", default_value_os_t = default_files_dir())]
    pub files_dir: PathBuf,

    /// Base URL of the generation backend.
    #[arg(long, env = "GENAI_ENDPOINT", default_value_t = default_generation_endpoint())]
    pub generation_endpoint: String,

    /// Model name requested from the generation backend.
    #[arg(long, env = "GENAI_MODEL", default_value_t = default_generation_model())]
    pub generation_model: String,

    /// API key for the generation backend.
    ///
    /// # Command Line
    /// Usually supplied through `GOOGLE_GENAI_API_KEY` rather than a flag
    #[arg(long, env = "GOOGLE_GENAI_API_KEY", hide_env_values = true, default_value = "")]
    pub generation_api_key: String,

    /// Per-call deadline for generation requests, in seconds. Must be > 0.
    #[arg(long, env = "CLOSETHELOOP_GENERATION_TIMEOUT_SECS", default_value_t = default_generation_timeout_secs())]
    pub generation_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            database_file: default_database_file(),
            files_dir: default_files_dir(),
            generation_endpoint: default_generation_endpoint(),
            generation_model: default_generation_model(),
            generation_api_key: String::new(),
            generation_timeout_secs: default_generation_timeout_secs(),
        }
    }
}

impl Config {
    /// Default configuration filename looked up in the working directory
    pub const DEFAULT_CONFIG_FILE: &'static str = "closetheloop.toml";

    /// Creates a new `Config` by parsing command-line arguments (including
    /// environment-variable fallbacks).
    pub fn from_args() -> Self {
        Config::parse()
    }

    /// Reads a `Config` from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration the way the binary does: flags win when present,
    /// otherwise the default TOML file if it exists, otherwise environment
    /// variables and built-in defaults.
    pub fn load() -> Result<Self, ConfigError> {
        if env::args().len() > 1 {
            let config = Config::from_args();
            config.validate()?;
            return Ok(config);
        }
        let file = Path::new(Self::DEFAULT_CONFIG_FILE);
        if file.exists() {
            return Config::from_file(file);
        }
        let config = Config::from_args();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.generation_timeout_secs == 0 {
            return Err(ConfigError::NotInRange(
                "generation_timeout_secs must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
