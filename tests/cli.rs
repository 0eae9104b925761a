use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("interval-alarm").unwrap();
    cmd.env("INTERVAL_ALARM_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn config_path_uses_home_override() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("config.yaml");
    cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn config_init_writes_file() {
    let home = TempDir::new().unwrap();
    cmd(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join("config.yaml").exists());

    cmd(&home)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_show_reads_file() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        "session:\n  interval_seconds: 45\n",
    )
    .unwrap();

    cmd(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval_seconds: 45"))
        .stdout(predicate::str::contains("total_intervals: 10"));
}

#[test]
fn invalid_config_is_reported() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("config.yaml"), "session: [1, 2]\n").unwrap();

    cmd(&home)
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn plan_prints_default_schedule() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("Session plan: 10 x 03:00"))
        .stdout(predicate::str::contains("27:00"))
        .stdout(predicate::str::contains("gong"));
}

#[test]
fn plan_json_with_overrides() {
    let home = TempDir::new().unwrap();
    let output = cmd(&home)
        .args(["plan", "--interval", "90s", "--intervals", "4", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["interval_seconds"], 90);
    assert_eq!(parsed["total_seconds"], 360);
    assert_eq!(parsed["intervals"].as_array().unwrap().len(), 4);
}

#[test]
fn plan_rejects_bad_interval() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["plan", "--interval", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
}

#[test]
fn plan_rejects_out_of_range_timing() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["plan", "--interval", "9999999999999999h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid interval"));
    cmd(&home)
        .args(["plan", "--intervals", "4000000000"])
        .assert()
        .failure();
}

#[test]
fn history_is_empty_at_first() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions"));
}

#[test]
fn status_without_session() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session in progress"));
}

#[test]
fn clear_requires_force() {
    let home = TempDir::new().unwrap();
    cmd(&home).arg("clear").assert().failure();
    cmd(&home)
        .args(["clear", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 sessions"));
}

#[test]
fn headless_run_completes_and_is_recorded() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["run", "--headless", "--interval", "1", "--intervals", "2"])
        .timeout(std::time::Duration::from_secs(20))
        .assert()
        .success()
        .stdout(predicate::str::contains("Interval 1 of 2 complete"))
        .stdout(predicate::str::contains("Session complete"));

    let output = cmd(&home)
        .args(["history", "-o", "json"])
        .output()
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["count"], 1);
    assert_eq!(parsed["items"][0]["outcome"], "completed");

    cmd(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No session in progress"));
}

#[test]
fn completions_for_bash() {
    let home = TempDir::new().unwrap();
    cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("interval-alarm"));
}
