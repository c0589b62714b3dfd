//! Planning invocation engine.
//!
//! [`Planner`] turns a domain/problem file pair into an indexed plan file
//! by driving the external planner as a subprocess:
//!
//! ```text
//! Planner::generate_plan
//!     |
//!     v
//! next_index ---> PlannerCommand ---> subprocess (stdout+stderr -> logN.txt,
//!     |                               bounded by the configured timeout)
//!     |                                   |
//!     v                                   v
//! planN.txt  <--- rename ---  ResultLocator::take_result
//! ```
//!
//! The whole attempt is wrapped in bounded retry with exponential backoff
//! ([`crate::retry::with_retry`]); typed failures pass through the retry
//! loop unchanged.

pub mod command;
pub mod index;
mod invoke;
pub mod locator;

use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use command::PlannerCommand;
pub use index::next_index;
pub use locator::{ResultLocator, WellKnownFile};

use crate::config::{FileConfig, PlanningConfig};
use crate::error::{CoreResult, Failure};
use crate::retry::with_retry;

/// A successful invocation: where the plan and its log ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanFiles {
    pub plan_path: PathBuf,
    pub log_path: PathBuf,
}

/// Drives the external planner subprocess.
///
/// The success signal (the planner's well-known result file) is probed
/// through an injectable [`ResultLocator`], so tests can point it at a
/// sandboxed working directory instead of the real one.
pub struct Planner {
    pub(crate) planning: PlanningConfig,
    pub(crate) files: FileConfig,
    pub(crate) locator: Arc<dyn ResultLocator>,
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("launcher", &self.planning.launcher)
            .field("search_algorithm", &self.planning.search_algorithm)
            .finish()
    }
}

impl Planner {
    /// Create a planner whose result file is looked up in the current
    /// working directory, which is where the real planner writes it.
    pub fn new(planning: PlanningConfig, files: FileConfig) -> Self {
        let locator = Arc::new(WellKnownFile::new(&files.result_file));
        Self {
            planning,
            files,
            locator,
        }
    }

    /// Replace the result locator.
    pub fn with_locator(mut self, locator: Arc<dyn ResultLocator>) -> Self {
        self.locator = locator;
        self
    }

    /// Generate a plan for `domain`/`problem`, writing the plan and log
    /// into the next free indexed slot of `output_dir`.
    ///
    /// A missing output directory fails immediately with Configuration
    /// kind and is not retried; every failure inside an attempt is
    /// retried under the configured policy, and the final attempt's
    /// failure is surfaced unchanged.
    ///
    /// Index assignment is not safe against concurrent invocations into
    /// the same output directory, and the well-known result file is
    /// shared per working directory. Callers running invocations
    /// concurrently must serialize per directory.
    pub async fn generate_plan(
        &self,
        domain: &Path,
        problem: &Path,
        output_dir: &Path,
    ) -> CoreResult<PlanFiles> {
        if !output_dir.is_dir() {
            return Err(Failure::configuration(format!(
                "output directory does not exist: {}",
                output_dir.display()
            )));
        }

        let policy = self.planning.retry_policy();
        with_retry(&policy, "generate_plan", || {
            self.invoke_once(domain, problem, output_dir)
        })
        .await
    }
}
