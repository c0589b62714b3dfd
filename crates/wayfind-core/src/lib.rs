//! Core engine for wayfind: drive an external PDDL planner as a subprocess
//! and turn its plan traces into plain-English explanations.
//!
//! The crate is organized around one pipeline:
//!
//! ```text
//! Task --> problem::write_problem_file (if the problem file is missing)
//!      --> planner::Planner::generate_plan
//!            next_index -> PlannerCommand -> subprocess (timeout, log file)
//!            -> ResultLocator -> (plan_path, log_path)
//!      --> explain::explain_plan_content
//!      --> task::PlanReport / task::TaskOutcome
//! ```
//!
//! Every fallible step returns [`error::Failure`], a kind-tagged error
//! value. Failures are created at the point of detection and flow upward
//! unchanged; the only place they are flattened into a wire shape is
//! [`task::TaskOutcome::from_result`].

pub mod config;
pub mod error;
pub mod explain;
pub mod planner;
pub mod problem;
pub mod retry;
pub mod task;

// Re-export the primary public API at the crate root.
pub use config::{FileConfig, Paths, PlanningConfig};
pub use error::{Failure, FailureKind};
pub use planner::{PlanFiles, Planner};
pub use task::{Task, TaskOutcome, TaskRunner};
