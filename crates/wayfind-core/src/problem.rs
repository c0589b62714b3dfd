//! PDDL problem rendering.
//!
//! The engine consumes the renderer through the [`ProblemRenderer`]
//! trait; [`PddlRenderer`] is the default implementation, building the
//! problem text for the single-robot movement domain. Rendering failures
//! surface as Parsing-kind failures.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, Failure};

/// The structured parameters a problem is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub domain: String,
    pub robot: String,
    pub start: String,
    pub goal: String,
}

/// Renders a [`ProblemSpec`] into planner-consumable problem text.
#[async_trait]
pub trait ProblemRenderer: Send + Sync {
    async fn render(&self, spec: &ProblemSpec) -> CoreResult<String>;
}

/// Default renderer for the robot-movement domain.
#[derive(Debug, Clone, Default)]
pub struct PddlRenderer;

#[async_trait]
impl ProblemRenderer for PddlRenderer {
    async fn render(&self, spec: &ProblemSpec) -> CoreResult<String> {
        Ok(render_problem(spec))
    }
}

/// Build the problem text for a single robot moving from start to goal.
pub fn render_problem(spec: &ProblemSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("(define (problem robot-{})\n", spec.domain));
    out.push_str(&format!("  (:domain {})\n", spec.domain));
    if spec.start == spec.goal {
        out.push_str(&format!("  (:objects {} {})\n", spec.robot, spec.start));
    } else {
        out.push_str(&format!(
            "  (:objects {} {} {})\n",
            spec.robot, spec.start, spec.goal
        ));
    }
    out.push_str(&format!("  (:init (at {} {}))\n", spec.robot, spec.start));
    out.push_str(&format!("  (:goal (at {} {})))\n", spec.robot, spec.goal));
    out
}

/// Render the problem and write it to `path`, creating parent
/// directories as needed.
pub async fn write_problem_file(
    renderer: &dyn ProblemRenderer,
    spec: &ProblemSpec,
    path: &Path,
) -> CoreResult<()> {
    let content = renderer.render(spec).await?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Failure::parsing(format!(
                "could not render problem file {}: parent directory",
                path.display()
            ))
            .with_source(e)
        })?;
    }

    std::fs::write(path, content).map_err(|e| {
        Failure::parsing(format!("could not render problem file {}", path.display()))
            .with_source(e)
    })?;

    tracing::info!(problem = %path.display(), "problem file generated");
    Ok(())
}
