//! CLI integration tests for the lockbox-migrate binary.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn database_str(&self) -> String {
        self.temp_dir
            .path()
            .join("lockbox.db")
            .to_string_lossy()
            .to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("lockbox-migrate").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd.args(["--database", &self.database_str()]);
        cmd
    }

    fn up(&self) -> assert_cmd::assert::Assert {
        self.cmd().arg("up").assert()
    }

    fn status_json(&self) -> Value {
        let output = self
            .cmd()
            .args(["status", "--json"])
            .output()
            .expect("failed to run command");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("failed to parse JSON")
    }
}

#[test]
fn test_status_on_fresh_database_shows_everything_pending() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("pending  20230907121500_CoreIdentity"))
        .stdout(predicate::str::contains("applied").not());
}

#[test]
fn test_up_applies_the_full_history() {
    let ctx = TestContext::new();

    ctx.up()
        .success()
        .stdout(predicate::str::contains("applied  20230907121500_CoreIdentity"))
        .stdout(predicate::str::contains("applied  20250615084500_TightenOrganizationDefaults"))
        .stdout(predicate::str::contains("applied 19 change-set(s)"));
}

#[test]
fn test_second_up_is_a_no_op() {
    let ctx = TestContext::new();
    ctx.up().success();

    ctx.up()
        .success()
        .stdout(predicate::str::contains("database is up to date"));
}

#[test]
fn test_up_to_target_stops_there() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["up", "--to", "20230907124500_VaultItems"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied 2 change-set(s)"));

    ctx.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("applied  20230907124500_VaultItems"))
        .stdout(predicate::str::contains("pending  20231019140000_CollectionAccess"));
}

#[test]
fn test_status_json_reports_applied_change_sets() {
    let ctx = TestContext::new();
    ctx.up().success();

    let report = ctx.status_json();
    let changesets = report["changesets"].as_array().expect("changesets array");
    assert_eq!(changesets.len(), 19);
    assert!(changesets.iter().all(|cs| cs["applied"] == true));
    assert_eq!(report["orphaned"].as_array().unwrap().len(), 0);

    let backfill = changesets
        .iter()
        .find(|cs| cs["id"] == "20240705090000_ExpandAccessGrants")
        .unwrap();
    assert_eq!(backfill["reversible"], false);
}

#[test]
fn test_down_reverts_one_step_by_default() {
    let ctx = TestContext::new();
    ctx.up().success();

    ctx.cmd()
        .arg("down")
        .assert()
        .success()
        .stdout(predicate::str::contains("reverted 20250615084500_TightenOrganizationDefaults"))
        .stdout(predicate::str::contains("reverted 1 change-set(s)"));
}

#[test]
fn test_down_refuses_to_cross_the_forward_only_backfill() {
    let ctx = TestContext::new();
    ctx.up().success();

    ctx.cmd()
        .args(["down", "--to", "20230907124500_VaultItems"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("forward-only"));

    // Nothing was reverted.
    let report = ctx.status_json();
    let changesets = report["changesets"].as_array().unwrap();
    assert!(changesets.iter().all(|cs| cs["applied"] == true));
}

#[test]
fn test_unknown_target_is_an_error() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["up", "--to", "20990101000000_NotAChangeSet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no change-set named"));
}

#[test]
fn test_down_on_empty_database_reverts_nothing() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("down")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to revert"));
}

#[test]
fn test_config_file_supplies_the_database_path() {
    let ctx = TestContext::new();
    let database = ctx.temp_dir.path().join("from-config.db");
    let config = ctx.temp_dir.path().join("lockbox-migrate.toml");
    std::fs::write(
        &config,
        format!("database = {:?}\nlock_attempts = 2\n", database),
    )
    .expect("failed to write config");

    Command::cargo_bin("lockbox-migrate")
        .expect("failed to find binary")
        .args(["--config", &config.to_string_lossy(), "up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("applied 19 change-set(s)"));

    assert!(database.exists());
}

#[test]
fn test_missing_config_file_is_an_error() {
    let ctx = TestContext::new();
    let missing = ctx.temp_dir.path().join("nope.toml");

    ctx.cmd()
        .args(["--config", &missing.to_string_lossy(), "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}
