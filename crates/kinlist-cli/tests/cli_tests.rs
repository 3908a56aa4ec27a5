use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temporary database plus a `kl` command bound to it.
struct TestEnv {
    _temp_dir: TempDir,
    db_arg: String,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temporary directory");
        let db_arg = temp_dir
            .path()
            .join("cli_test.db")
            .to_str()
            .expect("utf-8 temp path")
            .to_string();
        Self {
            _temp_dir: temp_dir,
            db_arg,
        }
    }

    fn kl(&self) -> Command {
        let mut cmd = Command::cargo_bin("kl").expect("Failed to find kl binary");
        cmd.args(["--no-color", "--database-file", &self.db_arg]);
        cmd
    }

    fn kl_as(&self, username: &str) -> Command {
        let mut cmd = self.kl();
        cmd.args(["--as", username]);
        cmd
    }

    fn register(&self, username: &str) {
        self.kl()
            .args([
                "user",
                "register",
                &format!("{username}@example.com"),
                "--username",
                username,
            ])
            .assert()
            .success();
    }

    /// `a` sends, `b` accepts. Request ids start at 1 in a fresh database,
    /// so callers pass the id they expect.
    fn befriend(&self, a: &str, b: &str, request_id: u64) {
        self.kl_as(a)
            .args(["friend", "request", b])
            .assert()
            .success();
        self.kl_as(b)
            .args(["friend", "accept", &request_id.to_string()])
            .assert()
            .success()
            .stdout(predicate::str::contains("(accepted)"));
    }
}

#[test]
fn test_cli_register_user() {
    let env = TestEnv::new();
    env.kl()
        .args(["user", "register", "Ada@Example.com", "--username", "ada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered user 1"))
        .stdout(predicate::str::contains("ada@example.com"));
}

#[test]
fn test_cli_duplicate_username_fails() {
    let env = TestEnv::new();
    env.register("ada");
    env.kl()
        .args(["user", "register", "other@example.com", "--username", "ada"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_cli_actor_required() {
    let env = TestEnv::new();
    env.kl()
        .args(["task", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--as"));
}

#[test]
fn test_cli_unknown_actor() {
    let env = TestEnv::new();
    env.kl_as("ghost")
        .args(["friend", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown user 'ghost'"));
}

#[test]
fn test_cli_friend_request_flow() {
    let env = TestEnv::new();
    env.register("ada");
    env.register("bob");

    env.kl_as("ada")
        .args(["friend", "request", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sent friend request 1 to bob"));

    env.kl_as("bob")
        .args(["friend", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Request 1: 1 → 2 (pending)"));

    env.kl_as("ada")
        .args(["friend", "accept", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("only the recipient"));

    env.kl_as("bob")
        .args(["friend", "accept", "1"])
        .assert()
        .success();

    env.kl_as("ada")
        .args(["friend", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- bob (ID: 2)"));

    env.kl_as("bob")
        .args(["friend", "request", "ada"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already friends"));
}

#[test]
fn test_cli_delegated_task_needs_permission() {
    let env = TestEnv::new();
    env.register("owner");
    env.register("helper");
    env.befriend("owner", "helper", 1);

    env.kl_as("helper")
        .args(["task", "add", "Buy milk", "--for", "owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Forbidden"));

    env.kl_as("owner")
        .args(["perm", "grant", "helper"])
        .assert()
        .success();
    env.kl_as("helper")
        .args(["perm", "check", "owner"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You may create tasks for owner"));

    env.kl_as("helper")
        .args(["task", "add", "Buy milk", "--for", "owner", "--due", "2026-11-02"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task 1 for owner"));

    env.kl_as("owner")
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk (due 2026-11-02) *from user 2*"));

    env.kl_as("owner")
        .args(["perm", "revoke", "helper"])
        .assert()
        .success();
    env.kl_as("helper")
        .args(["task", "add", "Another", "--for", "owner"])
        .assert()
        .failure();
}

#[test]
fn test_cli_dashboard_hides_private_tasks() {
    let env = TestEnv::new();
    env.register("me");
    env.register("pal");
    env.befriend("me", "pal", 1);

    env.kl_as("pal")
        .args(["task", "add", "Visible chore"])
        .assert()
        .success();
    env.kl_as("pal")
        .args(["task", "add", "Secret plan", "--private"])
        .assert()
        .success();

    env.kl_as("me")
        .args(["pin", "add", "pal"])
        .assert()
        .success();

    env.kl_as("me")
        .arg("dashboard")
        .assert()
        .success()
        .stdout(predicate::str::contains("## pal (ID: 2)"))
        .stdout(predicate::str::contains("Visible chore"))
        .stdout(predicate::str::contains("Secret plan").not());

    env.kl_as("me")
        .args(["friend", "remove", "pal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pin(s)"));

    env.kl_as("me")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pinned friends."));
}

#[test]
fn test_cli_only_owner_changes_tasks() {
    let env = TestEnv::new();
    env.register("owner");
    env.register("other");

    env.kl_as("owner")
        .args(["task", "add", "Water plants"])
        .assert()
        .success();

    env.kl_as("other")
        .args(["task", "done", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Forbidden"));

    env.kl_as("owner")
        .args(["task", "done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- [x] 1. Water plants"));

    env.kl_as("owner")
        .args(["task", "list", "--open"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found."));

    env.kl_as("owner")
        .args(["task", "delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task 1"));
}

#[test]
fn test_cli_json_output() {
    let env = TestEnv::new();
    let output = env
        .kl()
        .args(["--json", "user", "register", "ada@example.com", "--username", "ada"])
        .output()
        .expect("Failed to run kl");
    assert!(output.status.success());

    let user: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(user["id"], 1);
    assert_eq!(user["email"], "ada@example.com");
    assert_eq!(user["username"], "ada");
}

#[test]
fn test_cli_audit_clean_database() {
    let env = TestEnv::new();
    env.register("a");
    env.register("b");
    env.befriend("a", "b", 1);

    env.kl()
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("No integrity issues."));
}
