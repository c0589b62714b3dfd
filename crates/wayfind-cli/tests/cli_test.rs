//! End-to-end tests driving the compiled `wayfind` binary.

use std::path::{Path, PathBuf};
use std::process::Command;

use wayfind_test_utils as stubs;

fn wayfind() -> Command {
    Command::new(env!("CARGO_BIN_EXE_wayfind"))
}

fn write_domain(root: &Path) -> PathBuf {
    let domain = root.join("domain.pddl");
    std::fs::write(&domain, "(define (domain delivery))\n").unwrap();
    domain
}

#[test]
fn explain_prints_the_translation() {
    let tmp = tempfile::tempdir().unwrap();
    let plan = tmp.path().join("plan1.txt");
    std::fs::write(&plan, "(move r1 room1 room3)\n; comment\n(noop)\n").unwrap();

    let output = wayfind().arg("explain").arg(&plan).output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim_end(), "Robot r1 moves from room1 to room3.");
}

#[test]
fn explain_writes_to_a_file_when_asked() {
    let tmp = tempfile::tempdir().unwrap();
    let plan = tmp.path().join("plan1.txt");
    let out = tmp.path().join("explanation1.txt");
    std::fs::write(&plan, "(move r2 a b)\n").unwrap();

    let output = wayfind()
        .arg("explain")
        .arg(&plan)
        .arg("--output")
        .arg(&out)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Robot r2 moves from a to b."
    );
}

#[test]
fn plan_emits_the_result_map_on_success() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let domain = write_domain(root);
    let problem = root.join("problem.pddl");
    std::fs::write(&problem, "(define (problem p) (:domain delivery))\n").unwrap();
    let out_dir = root.join("out");
    std::fs::create_dir(&out_dir).unwrap();

    // The stub writes `sas_plan` into its working directory, like the
    // real planner; the binary runs with the sandbox as its cwd.
    let script = stubs::relative_result_planner(root, "(move r1 room1 room3)");

    let task = serde_json::json!({
        "domain_path": domain,
        "problem_path": problem,
        "output_dir": out_dir,
    });
    let task_path = root.join("task.json");
    std::fs::write(&task_path, serde_json::to_string(&task).unwrap()).unwrap();

    let output = wayfind()
        .current_dir(root)
        .env("XDG_CONFIG_HOME", root)
        .env("FAST_DOWNWARD_PATH", &script)
        .env("WAYFIND_PYTHON", "sh")
        .env("MAX_RETRIES", "0")
        .arg("plan")
        .arg(&task_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(map["success"], true);
    assert_eq!(map["explanation"], "Robot r1 moves from room1 to room3.");
    let plan_path = map["plan_path"].as_str().unwrap();
    assert!(plan_path.ends_with("plan1.txt"));
    assert!(Path::new(plan_path).exists());
    assert!(map["timestamp"].as_str().unwrap().contains('T'));
}

#[test]
fn plan_reports_failure_in_the_map_not_the_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    let domain = write_domain(root);
    let problem = root.join("problem.pddl");
    std::fs::write(&problem, "(define (problem p) (:domain delivery))\n").unwrap();
    let out_dir = root.join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let script = stubs::failing_planner(root, "search exhausted");

    let output = wayfind()
        .current_dir(root)
        .env("XDG_CONFIG_HOME", root)
        .env("FAST_DOWNWARD_PATH", &script)
        .env("WAYFIND_PYTHON", "sh")
        .env("MAX_RETRIES", "0")
        .arg("plan")
        .arg("--domain")
        .arg(&domain)
        .arg("--problem")
        .arg(&problem)
        .arg("--output")
        .arg(&out_dir)
        .output()
        .unwrap();

    // Planning failure is data, not a process error.
    assert!(output.status.success());
    let map: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(map["success"], false);
    assert!(map["error"].as_str().unwrap().contains("planning failed"));
    assert_eq!(map["summary"]["reached_goal"], false);
}

#[test]
fn check_reports_the_configuration() {
    let tmp = tempfile::tempdir().unwrap();

    let output = wayfind()
        .current_dir(tmp.path())
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("check")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wayfind configuration:"));
    assert!(stdout.contains("launcher:"));
}

#[test]
fn init_writes_a_config_file_once() {
    let tmp = tempfile::tempdir().unwrap();

    let first = wayfind()
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("init")
        .output()
        .unwrap();
    assert!(first.status.success());
    assert!(tmp.path().join("wayfind").join("config.toml").exists());

    // A second init without --force refuses to clobber.
    let second = wayfind()
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("init")
        .output()
        .unwrap();
    assert!(!second.status.success());

    let forced = wayfind()
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("init")
        .arg("--force")
        .output()
        .unwrap();
    assert!(forced.status.success());
}
