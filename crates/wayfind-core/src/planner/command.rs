//! Planner command-line construction.
//!
//! Two launcher shapes are understood:
//!
//! - a script path (`fast-downward.py`): run through the configured
//!   interpreter as `interpreter launcher domain problem --search alg`;
//! - a remote-shell command (`wsl <...>`): the launcher string is split
//!   into words, both file paths are rewritten to the remote filesystem
//!   convention, and the search descriptor is quoted so the remote shell
//!   passes it through as one token.

use std::path::Path;

use crate::config::PlanningConfig;

/// Launcher strings starting with this marker run through a remote shell.
pub const REMOTE_SHELL_PREFIX: &str = "wsl ";

/// A fully built planner invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlannerCommand {
    /// Build the command line for one invocation.
    pub fn build(planning: &PlanningConfig, domain: &Path, problem: &Path) -> Self {
        if planning.launcher.starts_with(REMOTE_SHELL_PREFIX) {
            let mut words = planning.launcher.split_whitespace();
            let program = words.next().unwrap_or("wsl").to_string();
            let mut args: Vec<String> = words.map(str::to_string).collect();
            args.push(remote_path(domain));
            args.push(remote_path(problem));
            args.push("--search".to_string());
            args.push(format!("'{}'", planning.search_algorithm));
            Self { program, args }
        } else {
            Self {
                program: planning.interpreter.clone(),
                args: vec![
                    planning.launcher.clone(),
                    domain.display().to_string(),
                    problem.display().to_string(),
                    "--search".to_string(),
                    planning.search_algorithm.clone(),
                ],
            }
        }
    }

    /// The command line as one loggable string.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for arg in &self.args {
            out.push(' ');
            out.push_str(arg);
        }
        out
    }
}

/// Rewrite a host path into the remote filesystem convention: forward
/// slashes, with a drive-letter prefix mapped onto the fixed `/mnt/<x>`
/// mount point.
fn remote_path(path: &Path) -> String {
    let forward = path.display().to_string().replace('\\', "/");
    let mut chars = forward.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            format!("/mnt/{}{}", drive.to_ascii_lowercase(), chars.as_str())
        }
        _ => forward,
    }
}
