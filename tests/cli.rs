use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bookkeeper(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bookkeeper").unwrap();
    cmd.env("BOOKKEEPER_DATA_DIR", data_dir.path())
        .env_remove("BOOKKEEPER_DB")
        .env("RUST_LOG", "off");
    cmd
}

fn initialized() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    bookkeeper(&data_dir).arg("init").assert().success();
    data_dir
}

#[test]
fn init_creates_defaults() {
    let data_dir = TempDir::new().unwrap();

    bookkeeper(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 10 records"));

    assert!(data_dir.path().join("config.json").exists());
    assert!(data_dir.path().join("data").join("bookkeeper.db").exists());

    bookkeeper(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created 0 records"));
}

#[test]
fn category_tree_is_listed() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries"))
        .stdout(predicate::str::contains("└── meat products"));
}

#[test]
fn add_and_list_expense() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["expense", "add", "250", "Books", "--comment", "novel"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added expense #1"));

    bookkeeper(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("books"))
        .stdout(predicate::str::contains("novel"));

    bookkeeper(&data_dir)
        .args(["budget", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("250"));
}

#[test]
fn invalid_amount_is_rejected() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["expense", "add", "ten", "books"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whole number"));

    bookkeeper(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No expenses found."));
}

#[test]
fn unknown_category_is_rejected() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["expense", "add", "100", "cars"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn exceeded_budget_warns() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["budget", "set", "day", "50"])
        .assert()
        .success();

    bookkeeper(&data_dir)
        .args(["expense", "add", "100", "sweets"])
        .assert()
        .success()
        .stderr(predicate::str::contains("day budget exceeded"));
}

#[test]
fn delete_category_moves_children_up() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "delete", "meat"])
        .assert()
        .success();

    bookkeeper(&data_dir)
        .args(["category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("├── raw meat"))
        .stdout(predicate::str::contains("meat products"))
        .stdout(predicate::str::contains("── meat\n").not());
}

#[test]
fn memory_backend_starts_seeded() {
    let data_dir = TempDir::new().unwrap();

    bookkeeper(&data_dir)
        .args(["--memory", "category", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groceries"));

    assert!(!data_dir.path().join("data").join("bookkeeper.db").exists());
}

#[test]
fn history_shows_changes() {
    let data_dir = initialized();

    bookkeeper(&data_dir)
        .args(["category", "add", "games"])
        .assert()
        .success();

    bookkeeper(&data_dir)
        .args(["history", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE Category"));
}
