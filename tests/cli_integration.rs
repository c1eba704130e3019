//! End-to-end tests for the helpdesk binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project plus a private profile location
struct Desk {
    dir: TempDir,
    profile: PathBuf,
}

impl Desk {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let profile = dir.path().join("home").join("profile.yaml");
        Self { dir, profile }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("helpdesk").unwrap();
        cmd.current_dir(self.path())
            .env("HELPDESK__IDENTITY__PROFILE_PATH", &self.profile)
            .env_remove("RUST_LOG")
            .arg("--no-color");
        cmd
    }

    fn initialized() -> Self {
        let desk = Self::new();
        desk.cmd().args(["init", "--name", "Travel Desk"]).assert().success();
        desk.cmd()
            .args(["login", "--name", "Asha Rao", "--email", "asha@example.com"])
            .assert()
            .success();
        desk
    }

    /// Submit a ticket and return its (id, reference)
    fn submit(&self, description: &str) -> (String, String) {
        let output = self
            .cmd()
            .args([
                "--json",
                "new",
                "--category",
                "technical support",
                "--description",
                description,
            ])
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        (
            json["ticket"]["id"].as_str().unwrap().to_string(),
            json["ticket"]["reference"].as_str().unwrap().to_string(),
        )
    }
}

#[test]
#[allow(deprecated)]
fn test_help_lists_commands() {
    Command::cargo_bin("helpdesk")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("sweep"));
}

#[test]
fn test_commands_require_init() {
    let desk = Desk::new();
    desk.cmd()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Project not initialized"))
        .stderr(predicate::str::contains("helpdesk init"));
}

#[test]
fn test_init_writes_config() {
    let desk = Desk::new();
    desk.cmd().arg("init").assert().success();
    assert!(desk.path().join(".helpdesk/config.yaml").is_file());
    assert!(desk.path().join(".helpdesk/tickets").is_dir());

    desk.cmd()
        .args(["config", "show", "lifecycle.closure_threshold"])
        .assert()
        .success()
        .stdout(predicate::str::contains("3d"));
}

#[test]
fn test_new_requires_login() {
    let desk = Desk::new();
    desk.cmd().arg("init").assert().success();
    desk.cmd()
        .args([
            "new",
            "--category",
            "Other",
            "--description",
            "The booking page never loads",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be logged in"));
}

#[test]
fn test_short_description_is_rejected() {
    let desk = Desk::initialized();
    desk.cmd()
        .args(["new", "--category", "Other", "--description", "help!"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 10 characters"));

    desk.cmd()
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets found"));
}

#[test]
fn test_full_lifecycle() {
    let desk = Desk::initialized();
    let (id, reference) = desk.submit("My login is broken and I cannot access my account");
    assert!(reference.starts_with("HID"));

    desk.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(reference.as_str()))
        .stdout(predicate::str::contains("Opened"));

    desk.cmd()
        .args(["resolve", &reference, "--message", "Password reset link sent"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resolved"))
        .stdout(predicate::str::contains("Closes in 7"));

    desk.cmd()
        .args(["show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Password reset link sent"))
        .stdout(predicate::str::contains("Resolved"));

    // resolving twice is an illegal transition
    desk.cmd()
        .args(["resolve", &reference, "--message", "Again"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot resolve"));

    desk.cmd()
        .args(["reopen", &reference, "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reopened"));

    let output = desk.cmd().args(["--json", "show", &reference]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ticket"]["status"], "Reopened");
    assert!(json["ticket"]["resolved_at"].is_null());
    assert_eq!(
        json["ticket"]["responses"]["reopened"][0]["response"],
        "Ticket reopened by user"
    );
    assert!(json["countdown"].is_null());
}

#[test]
fn test_reopen_without_terminal_requires_yes() {
    let desk = Desk::initialized();
    let (_, reference) = desk.submit("Seat selection fails at checkout");
    desk.cmd()
        .args(["resolve", &reference, "--message", "Seat map fixed"])
        .assert()
        .success();

    desk.cmd()
        .args(["reopen", &reference])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"))
        .stderr(predicate::str::contains("Prompt failed").not());

    desk.cmd()
        .args(["--json", "reopen", &reference])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--yes"));

    let output = desk.cmd().args(["--json", "show", &reference]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ticket"]["status"], "Resolved");
}

#[test]
fn test_sweep_closes_aged_resolution() {
    let desk = Desk::initialized();
    let (_, reference) = desk.submit("Refund for cancelled trip never arrived");
    desk.cmd()
        .args(["resolve", &reference, "--message", "Refund issued"])
        .assert()
        .success();

    desk.cmd()
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets due for closure"));

    std::thread::sleep(std::time::Duration::from_millis(1100));
    desk.cmd()
        .env("HELPDESK__LIFECYCLE__CLOSURE_THRESHOLD", "1s")
        .arg("sweep")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Closed {reference}")));

    let output = desk.cmd().args(["--json", "show", &reference]).output().unwrap();
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ticket"]["status"], "Closed");
    assert!(!json["ticket"]["resolved_at"].is_null());
    assert_eq!(
        json["ticket"]["responses"]["closed"][0]["response"],
        "Ticket automatically closed after 1 second of resolution"
    );
}

#[test]
fn test_whoami_and_logout() {
    let desk = Desk::initialized();
    desk.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("asha@example.com"));
    desk.cmd().arg("logout").assert().success();
    desk.cmd()
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not signed in"));
}

#[test]
fn test_login_rejects_bad_email() {
    let desk = Desk::new();
    desk.cmd()
        .args(["login", "--name", "Asha", "--email", "not-an-email"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid email"));
}
