use assert_cmd::{cargo, prelude::*};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;


use cli_helpers::{add_ticker, base_cmd, config_home, db_path, remove_ticker, watchlist_json};

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn watch_list_empty_no_color_when_piped() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("watch").arg("list");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Watch list is empty"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn watch_add_list_remove_roundtrip() {
    let home = setup_temp_home();

    let added = add_ticker(&home, "nvda").unwrap();
    assert_eq!(added["ticker"], "NVDA");
    assert_eq!(added["added"], true);
    add_ticker(&home, "AAPL").unwrap();

    assert_eq!(watchlist_json(&home).unwrap(), vec!["NVDA", "AAPL"]);

    let removed = remove_ticker(&home, "nvda").unwrap();
    assert_eq!(removed["removed"], true);
    assert_eq!(watchlist_json(&home).unwrap(), vec!["AAPL"]);

    let conn = sqlite_helpers::open_conn(&db_path(&home)).unwrap();
    let rows = sqlite_helpers::list_watched_rows(&conn).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].0, "AAPL");
}

#[test]
fn watch_add_twice_reports_existing() {
    let home = setup_temp_home();
    add_ticker(&home, "MSFT").unwrap();

    let again = add_ticker(&home, "msft").unwrap();
    assert_eq!(again["added"], false);

    let mut cmd = base_cmd(&home);
    cmd.args(["watch", "add", "MSFT"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MSFT is already on the watch list"));

    assert_eq!(watchlist_json(&home).unwrap(), vec!["MSFT"]);
}

#[test]
fn watch_list_table_output() {
    let home = setup_temp_home();
    add_ticker(&home, "TSLA").unwrap();

    let mut cmd = base_cmd(&home);
    cmd.args(["watch", "list"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Watching 1 ticker"))
        .stdout(predicate::str::contains("TSLA"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn invalid_ticker_is_rejected() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["watch", "add", "AA;PL"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid ticker argument 'AA;PL'"));

    assert!(watchlist_json(&home).unwrap().is_empty());
}

#[test]
fn snapshot_rejects_malformed_date() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["snapshot", "AAPL", "--as-of", "30/06/2025"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date '30/06/2025'"));
}

#[test]
fn check_on_empty_watch_list_json_is_empty_array() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["--json", "check", "--dry-run"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn check_accepts_filing_form() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.args(["--json", "check", "--dry-run", "--filing", "8-k"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn config_file_db_path_is_used_without_env_override() {
    let home = setup_temp_home();
    let custom_db = home.path().join("from-config.db");

    let config_dir = config_home(&home).join("stockwatch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        format!("db_path = {:?}\n", custom_db.to_string_lossy()),
    )
    .unwrap();

    let mut cmd = base_cmd(&home);
    cmd.env_remove("STOCKWATCH_DB");
    cmd.args(["watch", "add", "AMD"]);
    cmd.assert().success();

    assert!(custom_db.exists(), "config db_path should be created");
    assert!(!db_path(&home).exists());
}

#[test]
fn malformed_config_file_fails_with_context() {
    let home = setup_temp_home();
    let config_dir = config_home(&home).join("stockwatch");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "http_timeout_secs = \"soon\"\n").unwrap();

    let mut cmd = base_cmd(&home);
    cmd.args(["watch", "list"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn default_db_lives_under_home() {
    let home = setup_temp_home();

    let mut cmd = Command::new(cargo::cargo_bin!("stockwatch"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", config_home(&home))
        .env_remove("STOCKWATCH_DB")
        .args(["--no-color", "watch", "add", "IBM"]);
    cmd.assert().success();

    assert!(home.path().join(".stockwatch").join("watchlist.db").exists());
}

#[test]
fn help_mentions_commands() {
    let mut cmd = Command::new(cargo::cargo_bin!("stockwatch"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("snapshot"))
        .stdout(predicate::str::contains("check"));
}
