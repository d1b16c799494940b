//! End-to-end tests for the `cw` binary.
//!
//! Every test runs against a temporary home directory and an explicit
//! global config so the user's real configuration never leaks in.

use std::path::Path;

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

// =============================================================================
// Test Fixtures
// =============================================================================

/// A `cw` command isolated from the environment of the test runner.
fn cw(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cw").unwrap();
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("COMPOSEWEAVE_CONFIG")
        .env_remove("COMPOSEWEAVE_ADMIN_SERVICES")
        .env_remove("COMPOSEWEAVE_LOGLEVEL");
    cmd
}

/// A `cw` command reading `global` as its global config.
fn cw_with(home: &TempDir, global: &str) -> Command {
    let config = home.child("global.toml");
    config.write_str(global).unwrap();
    let mut cmd = cw(home.path());
    cmd.env("COMPOSEWEAVE_CONFIG", config.path());
    cmd
}

const SERVICES: &str = r#"
services_file = "/srv/services.yml"
admin_file = "/srv/admin.yml"
"#;

/// A project directory with all three compose files present.
fn project_dir(extra: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child(".composeweave/config.toml")
        .write_str(&format!("name = \"demo\"\n{extra}"))
        .unwrap();
    temp.child(".composeweave/docker-compose.yml")
        .write_str("")
        .unwrap();
    temp.child("docker-compose.yml").write_str("").unwrap();
    temp.child("docker-compose-debug.yml").write_str("").unwrap();
    temp
}

// =============================================================================
// Global flags
// =============================================================================

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    cw(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("services"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("order"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    cw(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cw "));
}

#[test]
fn completion_generates_script() {
    let home = TempDir::new().unwrap();
    cw(home.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cw"));
}

// =============================================================================
// services
// =============================================================================

#[test]
fn services_dry_run_prints_command() {
    let home = TempDir::new().unwrap();
    cw_with(&home, SERVICES)
        .args(["services", "--dry-run", "--", "up", "-d"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would have run:"))
        .stdout(predicate::str::contains(
            "docker-compose --project-name composeweave_services \
             -f /srv/services.yml -f /srv/admin.yml up -d",
        ));
}

#[test]
fn services_quiet_dry_run_prints_only_command() {
    let home = TempDir::new().unwrap();
    cw_with(&home, SERVICES)
        .args(["-q", "services", "--dry-run", "--", "ps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would have run:").not())
        .stdout(predicate::str::contains("docker-compose --project-name"));
}

#[test]
fn admin_services_env_override_drops_admin_file() {
    let home = TempDir::new().unwrap();
    cw_with(&home, SERVICES)
        .env("COMPOSEWEAVE_ADMIN_SERVICES", "0")
        .args(["services", "--dry-run", "--", "ps"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/srv/services.yml ps"))
        .stdout(predicate::str::contains("admin.yml").not());
}

#[test]
fn services_variant_collects_declared_fragments() {
    let home = TempDir::new().unwrap();
    let global = format!(
        r#"{SERVICES}
[[fragments]]
name = "grafana"
options = ["-f", "/srv/grafana.yml"]
location = "_begin"
variant = "monitoring"
"#
    );
    cw_with(&home, &global)
        .args(["services", "--variant", "monitoring", "--dry-run", "--", "up"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose -f /srv/grafana.yml up"));
}

#[test]
fn missing_program_fails() {
    let home = TempDir::new().unwrap();
    let global = format!("program = \"cw-no-such-program\"\n{SERVICES}");
    cw_with(&home, &global)
        .args(["services", "--", "ps"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// =============================================================================
// order
// =============================================================================

#[test]
fn order_shows_keys_in_resolved_order() {
    let home = TempDir::new().unwrap();
    let global = format!(
        r#"{SERVICES}
[[fragments]]
name = "tail"
options = ["-f", "/srv/tail.yml"]
location = "_end"
variant = "services"

[[fragments]]
name = "middle"
options = ["-f", "/srv/middle.yml"]
location = "<tail"
variant = "services"
"#
    );
    cw_with(&home, &global)
        .arg("order")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)^base\s.*\nmiddle\s.*\ntail\s").unwrap());
}

#[test]
fn order_json_is_machine_readable() {
    let home = TempDir::new().unwrap();
    let output = cw_with(&home, SERVICES)
        .args(["order", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let lines: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(lines[0]["key"], "base");
    assert_eq!(lines[0]["options"][0], "--project-name");
}

#[test]
fn order_without_contributions() {
    let home = TempDir::new().unwrap();
    cw(home.path())
        .arg("order")
        .assert()
        .success()
        .stdout(predicate::str::contains("No fragments contributed."));
}

#[test]
fn order_reports_cycles() {
    let home = TempDir::new().unwrap();
    let global = r#"
[[fragments]]
name = "one"
options = ["-f", "one.yml"]
location = "<two"
variant = "services"

[[fragments]]
name = "two"
options = ["-f", "two.yml"]
location = "<one"
variant = "services"
"#;
    cw_with(&home, global)
        .arg("order")
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be satisfied"));
}

#[test]
fn invalid_locations_are_rejected_on_load() {
    let home = TempDir::new().unwrap();
    let global = r#"
[[fragments]]
name = "odd"
options = []
location = "middle"
variant = "services"
"#;
    cw_with(&home, global)
        .arg("order")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized location 'middle'"));
}

// =============================================================================
// project
// =============================================================================

#[test]
fn project_dry_run_orders_local_files() {
    let home = TempDir::new().unwrap();
    let project = project_dir("");
    let root = project.path().display();

    cw(home.path())
        .arg("--cwd")
        .arg(project.path())
        .args(["project", "--dry-run", "--", "ps"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "docker-compose --project-name demo -f {root}/.composeweave/docker-compose.yml \
             -f {root}/docker-compose.yml -f {root}/docker-compose-debug.yml ps"
        )));
}

#[test]
fn project_runmode_selects_override() {
    let home = TempDir::new().unwrap();
    let project = project_dir("runmode = \"production\"\n");
    project
        .child("docker-compose-production.yml")
        .write_str("")
        .unwrap();

    cw(home.path())
        .arg("--cwd")
        .arg(project.path())
        .args(["project", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose-production.yml"))
        .stdout(predicate::str::contains("docker-compose-debug.yml").not());
}

#[test]
fn project_fragment_placed_after_reference() {
    let home = TempDir::new().unwrap();
    let project = project_dir(
        r#"
[[fragments]]
name = "db"
options = ["-f", "db.yml"]
location = ">local-project"
"#,
    );

    cw(home.path())
        .arg("--cwd")
        .arg(project.path())
        .args(["order", "--project"])
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"(?s)^local-project\s.*\ndb\s.*\nlocal-user\s").unwrap(),
        );
}

#[test]
fn project_outside_project_fails() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();

    cw(home.path())
        .arg("--cwd")
        .arg(dir.path())
        .args(["project", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a composeweave project"));
}

// =============================================================================
// config
// =============================================================================

#[test]
fn config_show_reports_values() {
    let home = TempDir::new().unwrap();
    cw_with(&home, SERVICES)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("program = docker-compose"))
        .stdout(predicate::str::contains("services_file = /srv/services.yml"))
        .stdout(predicate::str::contains("project = (none)"));
}

#[test]
fn config_path_reports_missing_project() {
    let home = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    cw_with(&home, SERVICES)
        .arg("--cwd")
        .arg(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("global.toml"))
        .stdout(predicate::str::contains("(not found)"));
}

#[test]
fn malformed_config_fails() {
    let home = TempDir::new().unwrap();
    cw_with(&home, "program = [")
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}
