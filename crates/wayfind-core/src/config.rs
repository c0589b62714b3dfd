//! Planning and file-layout configuration.
//!
//! Configuration is environment-sourced with fixed fallback defaults and
//! snapshotted once per invocation: [`PlanningConfig::from_env`] reads the
//! environment at call time and the resulting value is never mutated
//! mid-run. The CLI layers a config file underneath the environment; this
//! module only knows about env vars and defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::error::{CoreResult, Failure};
use crate::retry::RetryPolicy;

// ---------------------------------------------------------------------------
// Defaults and environment variable names
// ---------------------------------------------------------------------------

pub const DEFAULT_LAUNCHER: &str = "fast-downward.py";
pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_SEARCH_ALGORITHM: &str = "astar(blind())";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_RETRY_DELAY_SECS: f64 = 1.0;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
pub const DEFAULT_ERROR_EXCERPT_CHARS: usize = 500;

/// The fixed relative filename the planner writes on success.
pub const RESULT_FILE: &str = "sas_plan";

pub const ENV_LAUNCHER: &str = "FAST_DOWNWARD_PATH";
pub const ENV_INTERPRETER: &str = "WAYFIND_PYTHON";
pub const ENV_DOMAIN: &str = "PDDL_DOMAIN_PATH";
pub const ENV_SEARCH_ALGORITHM: &str = "SEARCH_ALGORITHM";
pub const ENV_TIMEOUT: &str = "MAX_PLANNING_TIME";
pub const ENV_MAX_RETRIES: &str = "MAX_RETRIES";
pub const ENV_RETRY_DELAY: &str = "RETRY_DELAY";
pub const ENV_BACKOFF_FACTOR: &str = "BACKOFF_FACTOR";
pub const ENV_ERROR_EXCERPT: &str = "ERROR_LOG_LENGTH";

// ---------------------------------------------------------------------------
// Planning configuration
// ---------------------------------------------------------------------------

/// Immutable snapshot of everything the invocation engine needs.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanningConfig {
    /// Planner launcher: a script path, or a `wsl `-prefixed remote command.
    pub launcher: String,
    /// Interpreter used to run a script launcher.
    pub interpreter: String,
    /// Search-algorithm descriptor handed to the planner verbatim.
    pub search_algorithm: String,
    /// Wall-time bound for one planner run, in seconds.
    pub timeout_secs: u64,
    /// Extra attempts after the first failed one.
    pub max_retries: u32,
    /// Backoff delay after the first failed attempt, in seconds.
    pub retry_delay_secs: f64,
    /// Multiplier applied to the backoff delay per failed attempt.
    pub backoff_factor: f64,
    /// How many trailing characters of the log to quote on failure.
    pub error_excerpt_chars: usize,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            launcher: DEFAULT_LAUNCHER.to_string(),
            interpreter: DEFAULT_INTERPRETER.to_string(),
            search_algorithm: DEFAULT_SEARCH_ALGORITHM.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_secs: DEFAULT_RETRY_DELAY_SECS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            error_excerpt_chars: DEFAULT_ERROR_EXCERPT_CHARS,
        }
    }
}

impl PlanningConfig {
    /// Read the configuration from the environment, falling back to the
    /// fixed defaults. A present-but-unparsable numeric variable is a
    /// Configuration failure, not a silent default.
    pub fn from_env() -> CoreResult<Self> {
        Ok(Self {
            launcher: env_or(ENV_LAUNCHER, DEFAULT_LAUNCHER),
            interpreter: env_or(ENV_INTERPRETER, DEFAULT_INTERPRETER),
            search_algorithm: env_or(ENV_SEARCH_ALGORITHM, DEFAULT_SEARCH_ALGORITHM),
            timeout_secs: env_parse(ENV_TIMEOUT, DEFAULT_TIMEOUT_SECS)?,
            max_retries: env_parse(ENV_MAX_RETRIES, DEFAULT_MAX_RETRIES)?,
            retry_delay_secs: env_parse(ENV_RETRY_DELAY, DEFAULT_RETRY_DELAY_SECS)?,
            backoff_factor: env_parse(ENV_BACKOFF_FACTOR, DEFAULT_BACKOFF_FACTOR)?,
            error_excerpt_chars: env_parse(ENV_ERROR_EXCERPT, DEFAULT_ERROR_EXCERPT_CHARS)?,
        })
    }

    /// The subprocess wall-time bound.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The retry parameters for the invocation engine.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_delay_secs: self.retry_delay_secs,
            backoff_factor: self.backoff_factor,
        }
    }
}

// ---------------------------------------------------------------------------
// File naming conventions
// ---------------------------------------------------------------------------

/// Output-file naming: `{plan_prefix}{N}{plan_ext}` next to
/// `{log_prefix}{N}{log_ext}`, plus the planner's well-known result file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConfig {
    pub plan_prefix: String,
    pub plan_ext: String,
    pub log_prefix: String,
    pub log_ext: String,
    pub result_file: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            plan_prefix: "plan".to_string(),
            plan_ext: ".txt".to_string(),
            log_prefix: "log".to_string(),
            log_ext: ".txt".to_string(),
            result_file: RESULT_FILE.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Workspace paths
// ---------------------------------------------------------------------------

/// Well-known locations under a project root.
#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Paths rooted in the current working directory.
    pub fn from_current_dir() -> CoreResult<Self> {
        let root = std::env::current_dir()
            .map_err(|e| Failure::configuration("could not determine working directory").with_source(e))?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn templates(&self) -> PathBuf {
        self.root.join("templates")
    }

    pub fn output(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn output_pddl(&self) -> PathBuf {
        self.output().join("pddl")
    }

    pub fn output_plan(&self) -> PathBuf {
        self.output().join("plan")
    }

    pub fn output_explanation(&self) -> PathBuf {
        self.output().join("explanation")
    }

    /// The domain file: `PDDL_DOMAIN_PATH` env override, else
    /// `templates/domain.pddl` under the root.
    pub fn domain_file(&self) -> PathBuf {
        match std::env::var(ENV_DOMAIN) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.templates().join("domain.pddl"),
        }
    }

    /// Create the output directories if they are missing.
    pub fn ensure_directories(&self) -> CoreResult<()> {
        for dir in [
            self.output(),
            self.output_pddl(),
            self.output_plan(),
            self.output_explanation(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                Failure::file_io(format!("could not create directory {}", dir.display()))
                    .with_source(e)
            })?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Configuration check
// ---------------------------------------------------------------------------

/// Existence report for `wayfind check`.
#[derive(Debug, Serialize)]
pub struct ConfigCheck {
    pub launcher: String,
    pub search_algorithm: String,
    pub domain_file: String,
    pub domain_file_exists: bool,
    pub output_dir: String,
    pub output_dir_exists: bool,
    pub templates_dir_exists: bool,
}

/// Inspect the configured files and directories without touching them.
pub fn check(planning: &PlanningConfig, paths: &Paths) -> ConfigCheck {
    let domain = paths.domain_file();
    let output = paths.output();
    ConfigCheck {
        launcher: planning.launcher.clone(),
        search_algorithm: planning.search_algorithm.clone(),
        domain_file: domain.display().to_string(),
        domain_file_exists: domain.exists(),
        output_dir: output.display().to_string(),
        output_dir_exists: output.is_dir(),
        templates_dir_exists: paths.templates().is_dir(),
    }
}

// ---------------------------------------------------------------------------
// Env helpers
// ---------------------------------------------------------------------------

fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_parse<T>(key: &str, default: T) -> CoreResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => value.parse::<T>().map_err(|e| {
            Failure::configuration(format!("invalid value {value:?} for {key}: {e}"))
        }),
        _ => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, MutexGuard};

    // Env-var tests share the process environment; serialize them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn lock_env() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = PlanningConfig::default();
        assert_eq!(config.launcher, "fast-downward.py");
        assert_eq!(config.search_algorithm, "astar(blind())");
        assert_eq!(config.timeout_secs, 300);
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_delay_secs, 1.0);
        assert_eq!(config.backoff_factor, 2.0);
        assert_eq!(config.error_excerpt_chars, 500);
    }

    #[test]
    fn from_env_reads_overrides() {
        let _lock = lock_env();
        unsafe {
            std::env::set_var(ENV_LAUNCHER, "/opt/fd/fast-downward.py");
            std::env::set_var(ENV_TIMEOUT, "60");
            std::env::set_var(ENV_MAX_RETRIES, "5");
        }

        let config = PlanningConfig::from_env().unwrap();

        unsafe {
            std::env::remove_var(ENV_LAUNCHER);
            std::env::remove_var(ENV_TIMEOUT);
            std::env::remove_var(ENV_MAX_RETRIES);
        }

        assert_eq!(config.launcher, "/opt/fd/fast-downward.py");
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.max_retries, 5);
        // Untouched values fall back to defaults.
        assert_eq!(config.backoff_factor, DEFAULT_BACKOFF_FACTOR);
    }

    #[test]
    fn unparsable_numeric_env_is_a_configuration_failure() {
        let _lock = lock_env();
        unsafe { std::env::set_var(ENV_TIMEOUT, "five minutes") };

        let result = PlanningConfig::from_env();

        unsafe { std::env::remove_var(ENV_TIMEOUT) };

        let failure = result.unwrap_err();
        assert_eq!(failure.kind, crate::error::FailureKind::Configuration);
        assert!(failure.message.contains(ENV_TIMEOUT), "message should name the variable");
    }

    #[test]
    fn retry_policy_mirrors_the_config() {
        let config = PlanningConfig {
            max_retries: 4,
            retry_delay_secs: 0.5,
            backoff_factor: 3.0,
            ..PlanningConfig::default()
        };
        let policy = config.retry_policy();
        assert_eq!(policy.max_retries, 4);
        assert_eq!(policy.initial_delay_secs, 0.5);
        assert_eq!(policy.backoff_factor, 3.0);
    }

    #[test]
    fn paths_lay_out_the_workspace() {
        let paths = Paths::new("/srv/wayfind");
        assert_eq!(paths.templates(), Path::new("/srv/wayfind/templates"));
        assert_eq!(paths.output_plan(), Path::new("/srv/wayfind/output/plan"));
    }

    #[test]
    fn domain_file_prefers_the_env_override() {
        let _lock = lock_env();
        unsafe { std::env::set_var(ENV_DOMAIN, "/etc/wayfind/domain.pddl") };
        let paths = Paths::new("/srv/wayfind");
        let domain = paths.domain_file();
        unsafe { std::env::remove_var(ENV_DOMAIN) };

        assert_eq!(domain, Path::new("/etc/wayfind/domain.pddl"));
        assert_eq!(
            paths.domain_file(),
            Path::new("/srv/wayfind/templates/domain.pddl")
        );
    }

    #[test]
    fn ensure_directories_creates_the_output_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::new(tmp.path());
        paths.ensure_directories().unwrap();
        assert!(paths.output_pddl().is_dir());
        assert!(paths.output_plan().is_dir());
        assert!(paths.output_explanation().is_dir());
    }

    #[test]
    fn check_reports_missing_pieces() {
        let _lock = lock_env();
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::new(tmp.path());
        let report = check(&PlanningConfig::default(), &paths);
        assert!(!report.domain_file_exists);
        assert!(!report.output_dir_exists);

        paths.ensure_directories().unwrap();
        let report = check(&PlanningConfig::default(), &paths);
        assert!(report.output_dir_exists);
    }
}
