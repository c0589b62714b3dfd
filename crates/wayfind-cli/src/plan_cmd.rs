//! `wayfind plan`: run one planning task and print the result map.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use wayfind_core::task::{Task, TaskOutcome, TaskRunner};

use crate::config::WayfindConfig;

/// Run a task from a JSON file and/or CLI flags and print the
/// caller-facing result map on stdout.
///
/// Planning failures are part of the map (`success: false`), not a
/// process error; only CLI-level misuse (unreadable task file, invalid
/// flags) exits non-zero.
pub async fn run_plan(
    config: &WayfindConfig,
    task_file: Option<&Path>,
    domain: Option<PathBuf>,
    problem: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let mut task = match task_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read task file {}", path.display()))?;
            Task::from_json(&text)
                .with_context(|| format!("failed to parse task file {}", path.display()))?
        }
        None => Task::default(),
    };

    // CLI flags override the task file.
    if domain.is_some() {
        task.domain_path = domain;
    }
    if problem.is_some() {
        task.problem_path = problem;
    }
    if output.is_some() {
        task.output_dir = output;
    }

    tracing::info!(
        launcher = %config.planning.launcher,
        search = %config.planning.search_algorithm,
        "running planning task"
    );

    let runner = TaskRunner::new(
        config.planning.clone(),
        config.files.clone(),
        config.paths.clone(),
    );

    let outcome = TaskOutcome::from_result(runner.run(&task).await);
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(())
}
