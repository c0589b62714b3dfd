//! Integration tests for the planning invocation engine, with stub
//! planner scripts standing in for Fast Downward.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use wayfind_core::config::{FileConfig, PlanningConfig};
use wayfind_core::error::FailureKind;
use wayfind_core::planner::{Planner, WellKnownFile};
use wayfind_test_utils as stubs;

fn planning_for(script: &Path) -> PlanningConfig {
    PlanningConfig {
        launcher: script.display().to_string(),
        interpreter: "sh".to_string(),
        timeout_secs: 10,
        max_retries: 0,
        retry_delay_secs: 0.01,
        ..PlanningConfig::default()
    }
}

fn planner_for(planning: PlanningConfig, work_dir: &Path) -> Planner {
    Planner::new(planning, FileConfig::default())
        .with_locator(Arc::new(WellKnownFile::in_dir(work_dir, "sas_plan")))
}

#[tokio::test]
async fn successful_run_claims_the_indexed_slot() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let result_file = tmp.path().join("sas_plan");
    let script = stubs::succeeding_planner(tmp.path(), &result_file, "(move r1 room1 room3)");
    let planner = planner_for(planning_for(&script), tmp.path());

    let files = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .expect("stub planner run should succeed");

    assert_eq!(files.plan_path, out.join("plan1.txt"));
    assert_eq!(files.log_path, out.join("log1.txt"));

    let plan = std::fs::read_to_string(&files.plan_path).unwrap();
    assert!(plan.contains("(move r1 room1 room3)"));

    let log = std::fs::read_to_string(&files.log_path).unwrap();
    assert!(log.contains("Solution found."), "planner chatter should land in the log");

    assert!(!result_file.exists(), "the well-known result file is consumed");
}

#[tokio::test]
async fn successive_runs_advance_the_index() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let result_file = tmp.path().join("sas_plan");
    let script = stubs::succeeding_planner(tmp.path(), &result_file, "(move r1 a b)");
    let planner = planner_for(planning_for(&script), tmp.path());

    let first = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .unwrap();
    let second = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .unwrap();

    assert_eq!(first.plan_path, out.join("plan1.txt"));
    assert_eq!(second.plan_path, out.join("plan2.txt"));
    assert_eq!(second.log_path, out.join("log2.txt"));
}

#[tokio::test]
async fn missing_result_file_is_a_planning_failure_with_context() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let script = stubs::failing_planner(tmp.path(), "the search space exploded horribly");
    let mut planning = planning_for(&script);
    planning.error_excerpt_chars = 16;
    let planner = planner_for(planning, tmp.path());

    let failure = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Planning);

    let log_path = failure
        .detail("log_path")
        .and_then(|v| v.as_str())
        .expect("failure should carry a log path");
    assert!(!log_path.is_empty());
    assert!(Path::new(log_path).exists());

    let excerpt = failure
        .detail("error_excerpt")
        .and_then(|v| v.as_str())
        .expect("failure should carry an error excerpt");
    assert!(!excerpt.is_empty());
    assert!(
        excerpt.chars().count() <= 16,
        "excerpt must be bounded in characters, got {excerpt:?}"
    );

    assert!(failure.detail("command").is_some());
}

#[tokio::test]
async fn flaky_planner_succeeds_after_a_retry() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let state = tmp.path().join("attempted");
    let result_file = tmp.path().join("sas_plan");
    let script = stubs::flaky_planner(tmp.path(), &state, &result_file, "(move r2 lab hall)");

    let mut planning = planning_for(&script);
    planning.max_retries = 2;
    let planner = planner_for(planning, tmp.path());

    let files = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .expect("second attempt should succeed");

    assert!(state.exists(), "first attempt must have run");
    assert_eq!(files.plan_path, out.join("plan1.txt"));
}

#[tokio::test]
async fn exhausted_retries_surface_the_final_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let script = stubs::failing_planner(tmp.path(), "unsolvable");
    let mut planning = planning_for(&script);
    planning.max_retries = 2;
    let planner = planner_for(planning, tmp.path());

    let failure = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .unwrap_err();

    // The failure is typed Planning, not rewrapped by the retry loop.
    assert_eq!(failure.kind, FailureKind::Planning);
    // Failed attempts never create plan files, so the slot stays at 1.
    assert!(out.join("log1.txt").exists());
    assert!(!out.join("plan1.txt").exists());
}

#[tokio::test]
async fn timeout_kills_the_planner_within_bounds() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let script = stubs::sleeping_planner(tmp.path(), 60);
    let mut planning = planning_for(&script);
    planning.timeout_secs = 1;
    let planner = planner_for(planning, tmp.path());

    let started = Instant::now();
    let failure = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &out)
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(failure.kind, FailureKind::Timeout);
    assert!(failure.message.contains("1s"), "message should name the timeout: {}", failure.message);
    assert!(
        elapsed < Duration::from_secs(10),
        "timeout must not block indefinitely (took {elapsed:?})"
    );
}

#[tokio::test]
async fn missing_output_dir_fails_fast_without_retries() {
    let tmp = tempfile::tempdir().unwrap();
    let gone = tmp.path().join("never-created");

    let script = stubs::failing_planner(tmp.path(), "unused");
    let mut planning = planning_for(&script);
    // If the configuration failure were retried, these sleeps would show.
    planning.max_retries = 3;
    planning.retry_delay_secs = 5.0;
    let planner = planner_for(planning, tmp.path());

    let started = Instant::now();
    let failure = planner
        .generate_plan(Path::new("d.pddl"), Path::new("p.pddl"), &gone)
        .await
        .unwrap_err();

    assert_eq!(failure.kind, FailureKind::Configuration);
    assert!(
        started.elapsed() < Duration::from_secs(2),
        "a structurally absent directory must not be retried"
    );
}
