//! Single planner invocation: spawn, bound, collect.

use std::path::Path;
use std::process::Stdio;

use crate::error::{CoreResult, Failure};

use super::command::PlannerCommand;
use super::index::next_index;
use super::{PlanFiles, Planner};

impl Planner {
    /// One attempt: compute the index slot, run the planner with its
    /// output redirected into the log file, and claim the result file.
    pub(crate) async fn invoke_once(
        &self,
        domain: &Path,
        problem: &Path,
        output_dir: &Path,
    ) -> CoreResult<PlanFiles> {
        let index = next_index(output_dir, &self.files.plan_prefix, &self.files.plan_ext)?;
        let plan_path = output_dir.join(format!(
            "{}{}{}",
            self.files.plan_prefix, index, self.files.plan_ext
        ));
        let log_path = output_dir.join(format!(
            "{}{}{}",
            self.files.log_prefix, index, self.files.log_ext
        ));

        let command = PlannerCommand::build(&self.planning, domain, problem);
        tracing::info!(
            command = %command.display(),
            log = %log_path.display(),
            "invoking planner"
        );

        // Fresh log file per attempt; stale content from a previous run
        // must never leak into this attempt's excerpt.
        let log_out = std::fs::File::create(&log_path).map_err(|e| {
            Failure::planning(format!("could not open log file {}", log_path.display()))
                .with_source(e)
        })?;
        let log_err = log_out.try_clone().map_err(|e| {
            Failure::planning("could not duplicate log file handle").with_source(e)
        })?;

        let mut child = tokio::process::Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log_out))
            .stderr(Stdio::from(log_err))
            .spawn()
            .map_err(|e| {
                Failure::planning(format!("failed to launch planner {:?}", command.program))
                    .with_detail("command", command.display())
                    .with_source(e)
            })?;

        match tokio::time::timeout(self.planning.timeout(), child.wait()).await {
            Ok(Ok(status)) => {
                // The exit status is advisory; presence of the result
                // file is the success signal.
                tracing::debug!(status = %status, "planner exited");
            }
            Ok(Err(e)) => {
                return Err(Failure::planning("failed to wait on planner process")
                    .with_detail("command", command.display())
                    .with_source(e));
            }
            Err(_elapsed) => {
                let _ = child.kill().await;
                return Err(Failure::timeout(format!(
                    "planner timed out after {}s",
                    self.planning.timeout_secs
                ))
                .with_detail("command", command.display())
                .with_detail("log_path", log_path.display().to_string()));
            }
        }

        let claimed = self.locator.take_result(&plan_path).map_err(|e| {
            Failure::planning(format!(
                "could not move planner result to {}",
                plan_path.display()
            ))
            .with_source(e)
        })?;

        if claimed {
            tracing::info!(plan = %plan_path.display(), "plan generated");
            Ok(PlanFiles {
                plan_path,
                log_path,
            })
        } else {
            let excerpt = self.log_excerpt(&log_path);
            Err(Failure::planning("planner produced no result file")
                .with_detail("command", command.display())
                .with_detail("log_path", log_path.display().to_string())
                .with_detail("error_excerpt", excerpt))
        }
    }

    /// Trailing excerpt of the log, bounded in characters.
    fn log_excerpt(&self, log_path: &Path) -> String {
        match std::fs::read(log_path) {
            Ok(bytes) => tail_chars(
                &String::from_utf8_lossy(&bytes),
                self.planning.error_excerpt_chars,
            ),
            Err(e) => {
                tracing::warn!(log = %log_path.display(), error = %e, "could not read log for excerpt");
                String::new()
            }
        }
    }
}

/// The last `n` characters of `s` (characters, not bytes).
pub(crate) fn tail_chars(s: &str, n: usize) -> String {
    let total = s.chars().count();
    if total <= n {
        s.to_string()
    } else {
        s.chars().skip(total - n).collect()
    }
}
