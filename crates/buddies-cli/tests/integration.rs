use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn buddies(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("buddies").unwrap();
    cmd.current_dir(dir.path()).env("BUDDIES_ROOT", dir.path());
    cmd
}

fn init_project(dir: &TempDir) {
    buddies(dir).arg("init").assert().success();
}

fn add_voter(dir: &TempDir, slug: &str) {
    buddies(dir)
        .args([
            "voter",
            "add",
            slug,
            &format!("{slug}@example.com"),
            "Jane",
            "Doe",
            "--birth-date",
            "1985-06-19",
            "--zip",
            "49503",
        ])
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// buddies init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_directory_tree() {
    let dir = TempDir::new().unwrap();
    buddies(&dir).arg("init").assert().success();

    assert!(dir.path().join(".buddies").is_dir());
    assert!(dir.path().join(".buddies/voters").is_dir());
    assert!(dir.path().join(".buddies/profiles").is_dir());
    assert!(dir.path().join(".buddies/messages").is_dir());
    assert!(dir.path().join(".buddies/config.yaml").exists());
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    buddies(&dir).arg("init").assert().success();
    buddies(&dir).arg("init").assert().success();
}

// ---------------------------------------------------------------------------
// buddies voter
// ---------------------------------------------------------------------------

#[test]
fn voter_add_and_list() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");

    buddies(&dir)
        .args(["voter", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("jane-doe"))
        .stdout(predicate::str::contains("Jane Doe"));
}

#[test]
fn voter_add_rejects_duplicate_slug() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");

    buddies(&dir)
        .args(["voter", "add", "jane-doe", "x@example.com", "Jane", "Doe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn voter_add_rejects_bad_slug() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    buddies(&dir)
        .args(["voter", "add", "Not A Slug", "x@example.com", "Jane", "Doe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid slug"));
}

#[test]
fn voter_info_shows_milestones() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");

    buddies(&dir)
        .args(["voter", "info", "jane-doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("registered"))
        .stdout(predicate::str::contains("ballot_returned"));
}

#[test]
fn voter_info_json_includes_progress() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");

    let output = buddies(&dir)
        .args(["voter", "info", "jane-doe", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["voter"]["slug"], "jane-doe");
    assert!(value["percent"].is_number());
    assert!(value["progress"]["registered"].is_object());
}

#[test]
fn voter_info_unknown_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    buddies(&dir)
        .args(["voter", "info", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("voter not found"));
}

#[test]
fn voter_link_is_mutual() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");
    add_voter(&dir, "bob-roe");

    buddies(&dir)
        .args(["voter", "link", "jane-doe", "bob-roe"])
        .assert()
        .success();

    let output = buddies(&dir)
        .args(["voter", "info", "bob-roe", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["voter"]["friends"][0], "jane-doe");
}

#[test]
fn voter_mark_records_confirmations() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");

    buddies(&dir)
        .args(["voter", "mark", "jane-doe", "--voted", "2021-11-02", "--shared"])
        .assert()
        .success();

    let output = buddies(&dir)
        .args(["voter", "info", "jane-doe", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(value["voter"]["voted"], "2021-11-02");
    assert_eq!(value["voter"]["ballot_shared"], true);
}

// ---------------------------------------------------------------------------
// batch jobs
// ---------------------------------------------------------------------------

#[test]
fn batch_jobs_require_init() {
    let dir = TempDir::new().unwrap();

    buddies(&dir)
        .arg("update-profiles")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn update_profiles_covers_every_voter() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");
    add_voter(&dir, "bob-roe");

    buddies(&dir)
        .args(["update-profiles", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"refreshed\": 2"));
}

#[test]
fn update_neighbors_reports_count() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_voter(&dir, "jane-doe");
    add_voter(&dir, "bob-roe");
    add_voter(&dir, "sue-loo");
    buddies(&dir)
        .args(["voter", "link", "jane-doe", "bob-roe"])
        .assert()
        .success();
    buddies(&dir)
        .args(["voter", "link", "bob-roe", "sue-loo"])
        .assert()
        .success();

    buddies(&dir)
        .args(["update-neighbors", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"added\": 2"));
}

#[test]
fn send_emails_with_empty_store_sends_nothing() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    buddies(&dir)
        .args(["send-emails", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"sent\": 0"));
}

#[test]
fn send_emails_rejects_bad_weekday() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    buddies(&dir)
        .args(["send-emails", "--day", "someday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a weekday"));
}
