//! Task intake, orchestration, and the caller-facing boundary.
//!
//! [`TaskRunner::run`] is the exported entry point: it validates the
//! task, renders the problem file when absent, drives the invocation
//! engine, and translates the trace. It returns an explicit
//! `Result<PlanReport, Failure>`; [`TaskOutcome::from_result`] is the
//! single adapter that flattens that result into the wire-shaped
//! `{success, ...}` map. No failure ever crosses the outer boundary as a
//! raised error.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{FileConfig, Paths, PlanningConfig};
use crate::error::{CoreResult, Failure};
use crate::explain::explain_plan_content;
use crate::planner::Planner;
use crate::problem::{PddlRenderer, ProblemRenderer, ProblemSpec, write_problem_file};

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// A caller-supplied task map.
///
/// Two parameter sets are understood: file mode (`domain_path`,
/// `problem_path`, optional `output_dir`) and structured mode (`robot`,
/// `start`, `goal`, `domain`, used to render the problem file when it
/// does not exist yet). At least one complete set must be present;
/// anything missing is a Configuration failure, never a panic.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Task {
    pub domain_path: Option<PathBuf>,
    pub problem_path: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub robot: Option<String>,
    pub start: Option<String>,
    pub goal: Option<String>,
    pub domain: Option<String>,
}

impl Task {
    /// Parse a task from its JSON map form.
    pub fn from_json(text: &str) -> CoreResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| Failure::parsing("task is not a valid JSON map").with_source(e))
    }

    /// The file-mode parameters, or a Configuration failure naming what
    /// is missing.
    fn file_params(&self) -> CoreResult<(PathBuf, PathBuf)> {
        match (self.domain_path.as_ref(), self.problem_path.as_ref()) {
            (Some(domain), Some(problem)) => Ok((domain.clone(), problem.clone())),
            (domain, problem) => {
                let mut missing = Vec::new();
                if domain.is_none() {
                    missing.push("domain_path");
                }
                if problem.is_none() {
                    missing.push("problem_path");
                }
                Err(Failure::configuration(format!(
                    "missing required parameters: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// The structured-mode parameters, or a Configuration failure naming
    /// what is missing.
    pub fn problem_spec(&self) -> CoreResult<ProblemSpec> {
        match (
            self.robot.as_ref(),
            self.start.as_ref(),
            self.goal.as_ref(),
            self.domain.as_ref(),
        ) {
            (Some(robot), Some(start), Some(goal), Some(domain)) => Ok(ProblemSpec {
                domain: domain.clone(),
                robot: robot.clone(),
                start: start.clone(),
                goal: goal.clone(),
            }),
            (robot, start, goal, domain) => {
                let mut missing = Vec::new();
                if robot.is_none() {
                    missing.push("robot");
                }
                if start.is_none() {
                    missing.push("start");
                }
                if goal.is_none() {
                    missing.push("goal");
                }
                if domain.is_none() {
                    missing.push("domain");
                }
                Err(Failure::configuration(format!(
                    "missing required parameters: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// A successful task run.
#[derive(Debug, Clone)]
pub struct PlanReport {
    pub plan_path: PathBuf,
    pub log_path: PathBuf,
    pub plan_content: String,
    pub explanation: String,
    pub timestamp: DateTime<Utc>,
}

/// Runs one task end to end: validate, render, invoke, explain.
pub struct TaskRunner {
    planner: Planner,
    renderer: Arc<dyn ProblemRenderer>,
    paths: Paths,
}

impl TaskRunner {
    pub fn new(planning: PlanningConfig, files: FileConfig, paths: Paths) -> Self {
        Self {
            planner: Planner::new(planning, files),
            renderer: Arc::new(PddlRenderer),
            paths,
        }
    }

    /// Replace the planner (e.g. to inject a scoped result locator).
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = planner;
        self
    }

    /// Replace the problem renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn ProblemRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run the task. Failures are typed and propagate unchanged; the
    /// wire flattening happens in [`TaskOutcome::from_result`].
    pub async fn run(&self, task: &Task) -> CoreResult<PlanReport> {
        let (domain_path, problem_path) = task.file_params()?;
        let output_dir = task
            .output_dir
            .clone()
            .unwrap_or_else(|| self.paths.output());

        if !domain_path.exists() {
            return Err(Failure::configuration(format!(
                "domain file does not exist: {}",
                domain_path.display()
            )));
        }

        if !problem_path.exists() {
            tracing::info!(
                problem = %problem_path.display(),
                "problem file missing; rendering from task parameters"
            );
            let spec = task.problem_spec()?;
            write_problem_file(self.renderer.as_ref(), &spec, &problem_path).await?;
        }

        std::fs::create_dir_all(&output_dir).map_err(|e| {
            Failure::file_io(format!(
                "could not create output directory {}",
                output_dir.display()
            ))
            .with_source(e)
        })?;

        tracing::info!(
            domain = %domain_path.display(),
            problem = %problem_path.display(),
            "starting planning task"
        );

        let files = self
            .planner
            .generate_plan(&domain_path, &problem_path, &output_dir)
            .await?;

        let plan_content = std::fs::read_to_string(&files.plan_path).map_err(|e| {
            Failure::file_io(format!(
                "could not read plan file {}",
                files.plan_path.display()
            ))
            .with_source(e)
        })?;
        let explanation = explain_plan_content(&plan_content);

        tracing::info!(plan = %files.plan_path.display(), "planning task succeeded");

        Ok(PlanReport {
            plan_path: files.plan_path,
            log_path: files.log_path,
            plan_content,
            explanation,
            timestamp: Utc::now(),
        })
    }
}

// ---------------------------------------------------------------------------
// Boundary shape
// ---------------------------------------------------------------------------

/// Failure placeholder for the wire map.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TaskSummary {
    pub reached_goal: bool,
    pub steps: usize,
}

/// The caller-facing result map.
#[derive(Debug, Serialize)]
pub struct TaskOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_path: Option<String>,
    pub plan_content: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TaskSummary>,
}

impl TaskOutcome {
    /// Flatten a run result into the wire shape. This is the only place
    /// a [`Failure`] stops being an error value: the full diagnostic is
    /// logged here and the caller sees the short summary.
    pub fn from_result(result: CoreResult<PlanReport>) -> Self {
        match result {
            Ok(report) => Self {
                success: true,
                plan_path: Some(report.plan_path.display().to_string()),
                log_path: Some(report.log_path.display().to_string()),
                plan_content: report.plan_content,
                explanation: report.explanation,
                timestamp: Some(report.timestamp.to_rfc3339()),
                error: None,
                summary: None,
            },
            Err(failure) => {
                tracing::error!(
                    kind = %failure.kind,
                    details = ?failure.details,
                    diagnostic = %failure,
                    "task failed"
                );
                Self {
                    success: false,
                    plan_path: None,
                    log_path: None,
                    plan_content: String::new(),
                    explanation: "Planning task failed.".to_string(),
                    timestamp: None,
                    error: Some(failure.summary()),
                    summary: Some(TaskSummary {
                        reached_goal: false,
                        steps: 0,
                    }),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
