//! Configuration file management for wayfind.
//!
//! Provides a TOML-based config file at `~/.config/wayfind/config.toml`
//! and a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use wayfind_core::config::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_ERROR_EXCERPT_CHARS, DEFAULT_INTERPRETER, DEFAULT_LAUNCHER,
    DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS, DEFAULT_SEARCH_ALGORITHM,
    DEFAULT_TIMEOUT_SECS, ENV_BACKOFF_FACTOR, ENV_ERROR_EXCERPT, ENV_INTERPRETER, ENV_LAUNCHER,
    ENV_MAX_RETRIES, ENV_RETRY_DELAY, ENV_SEARCH_ALGORITHM, ENV_TIMEOUT, FileConfig, Paths,
    PlanningConfig,
};

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub planner: PlannerSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSection {
    pub launcher: Option<String>,
    pub interpreter: Option<String>,
    pub search_algorithm: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_secs: Option<f64>,
    pub backoff_factor: Option<f64>,
    pub error_excerpt_chars: Option<usize>,
}

impl ConfigFile {
    /// A config file with every default spelled out, so `wayfind init`
    /// produces something self-documenting.
    pub fn with_defaults() -> Self {
        Self {
            planner: PlannerSection {
                launcher: Some(DEFAULT_LAUNCHER.to_string()),
                interpreter: Some(DEFAULT_INTERPRETER.to_string()),
                search_algorithm: Some(DEFAULT_SEARCH_ALGORITHM.to_string()),
                timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
                max_retries: Some(DEFAULT_MAX_RETRIES),
                retry_delay_secs: Some(DEFAULT_RETRY_DELAY_SECS),
                backoff_factor: Some(DEFAULT_BACKOFF_FACTOR),
                error_excerpt_chars: Some(DEFAULT_ERROR_EXCERPT_CHARS),
            },
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the wayfind config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/wayfind` or
/// `~/.config/wayfind`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("wayfind");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("wayfind")
}

/// Return the path to the wayfind config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct WayfindConfig {
    pub planning: PlanningConfig,
    pub files: FileConfig,
    pub paths: Paths,
}

impl WayfindConfig {
    /// Resolve configuration using the chain:
    /// CLI flag > env var > config file > default.
    pub fn resolve(cli_launcher: Option<&str>) -> Result<Self> {
        let section = load_config().map(|f| f.planner).unwrap_or_default();

        let mut planning = PlanningConfig {
            launcher: layered(ENV_LAUNCHER, section.launcher, DEFAULT_LAUNCHER.to_string())?,
            interpreter: layered(
                ENV_INTERPRETER,
                section.interpreter,
                DEFAULT_INTERPRETER.to_string(),
            )?,
            search_algorithm: layered(
                ENV_SEARCH_ALGORITHM,
                section.search_algorithm,
                DEFAULT_SEARCH_ALGORITHM.to_string(),
            )?,
            timeout_secs: layered(ENV_TIMEOUT, section.timeout_secs, DEFAULT_TIMEOUT_SECS)?,
            max_retries: layered(ENV_MAX_RETRIES, section.max_retries, DEFAULT_MAX_RETRIES)?,
            retry_delay_secs: layered(
                ENV_RETRY_DELAY,
                section.retry_delay_secs,
                DEFAULT_RETRY_DELAY_SECS,
            )?,
            backoff_factor: layered(
                ENV_BACKOFF_FACTOR,
                section.backoff_factor,
                DEFAULT_BACKOFF_FACTOR,
            )?,
            error_excerpt_chars: layered(
                ENV_ERROR_EXCERPT,
                section.error_excerpt_chars,
                DEFAULT_ERROR_EXCERPT_CHARS,
            )?,
        };

        // CLI flag beats everything.
        if let Some(launcher) = cli_launcher {
            planning.launcher = launcher.to_string();
        }

        let paths = Paths::from_current_dir()?;

        Ok(Self {
            planning,
            files: FileConfig::default(),
            paths,
        })
    }
}

/// One layer of the resolution chain: a set env var wins (and must
/// parse), else the config-file value, else the default.
fn layered<T>(env_key: &str, file_value: Option<T>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(env_key) {
        Ok(value) if !value.is_empty() => value
            .parse::<T>()
            .map_err(|e| anyhow!("invalid value {value:?} for {env_key}: {e}")),
        _ => Ok(file_value.unwrap_or(default)),
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
