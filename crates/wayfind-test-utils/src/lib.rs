//! Shared test utilities for wayfind integration tests.
//!
//! Provides stub planner scripts so tests can exercise the invocation
//! engine without Fast Downward installed. Each helper writes a small
//! shell script into a test sandbox and returns its path; tests run it
//! through the engine with `interpreter = "sh"`.

use std::path::{Path, PathBuf};

/// Write an executable shell script into `dir` and return its path.
pub fn write_stub_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).expect("failed to write stub script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("failed to chmod stub script");
    }

    path
}

/// A planner that logs some chatter and writes `plan_line` into the
/// result file at `result_path`.
pub fn succeeding_planner(dir: &Path, result_path: &Path, plan_line: &str) -> PathBuf {
    write_stub_script(
        dir,
        "planner_ok.sh",
        &format!(
            "echo 'Solving...'\n\
             echo 'Solution found.'\n\
             printf '%s\\n' '{plan_line}' > '{result}'\n",
            result = result_path.display(),
        ),
    )
}

/// A planner that writes `plan_line` into `sas_plan` relative to its own
/// working directory, the way the real planner does.
pub fn relative_result_planner(dir: &Path, plan_line: &str) -> PathBuf {
    write_stub_script(
        dir,
        "planner_cwd.sh",
        &format!(
            "echo 'Solution found.'\n\
             printf '%s\\n' '{plan_line}' > sas_plan\n"
        ),
    )
}

/// A planner that prints an error and exits without producing a result
/// file.
pub fn failing_planner(dir: &Path, error_text: &str) -> PathBuf {
    write_stub_script(
        dir,
        "planner_fail.sh",
        &format!("echo '{error_text}' >&2\nexit 12\n"),
    )
}

/// A planner that blocks well past any test timeout.
pub fn sleeping_planner(dir: &Path, secs: u32) -> PathBuf {
    write_stub_script(dir, "planner_sleep.sh", &format!("sleep {secs}\n"))
}

/// A planner that fails until `state_path` exists (created on the first
/// run), then succeeds. Exercises the retry loop.
pub fn flaky_planner(
    dir: &Path,
    state_path: &Path,
    result_path: &Path,
    plan_line: &str,
) -> PathBuf {
    write_stub_script(
        dir,
        "planner_flaky.sh",
        &format!(
            "if [ -f '{state}' ]; then\n\
             \x20 printf '%s\\n' '{plan_line}' > '{result}'\n\
             else\n\
             \x20 touch '{state}'\n\
             \x20 echo 'transient failure' >&2\n\
             \x20 exit 1\n\
             fi\n",
            state = state_path.display(),
            result = result_path.display(),
        ),
    )
}
