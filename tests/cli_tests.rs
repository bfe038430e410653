use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn beanbudget(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("beanbudget").unwrap();
    cmd.env("BEANBUDGET_DATA_DIR", data_dir.path())
        .env_remove("BEANBUDGET_USER")
        .env("RUST_LOG", "off");
    cmd
}

fn initialized() -> TempDir {
    let data_dir = TempDir::new().unwrap();
    beanbudget(&data_dir)
        .arg("init")
        .assert()
        .success()
        .stdout(contains("Initialization complete!"));
    data_dir
}

const LEDGER: &str = r#"option "operating_currency" "EUR"
plugin "budget_eur"

2024-01-01 * "Fung" "Salary"
  Income:NL:Fung:Salary  -2000.00 EUR
  Assets:NL:ING:Checking59

2024-01-01 * "" "Assign" #budget
  Expenses:Variable:Groceries  250 BGT_EUR
  Income:Available  -250 BGT_EUR

2024-01-05 * "ALBERT HEIJN" ""
  Expenses:Variable:Groceries  40.00 EUR
  Assets:NL:ING:Checking59  -40.00 EUR

;;; FUTURE ;;;
"#;

#[test]
fn init_creates_ledger_and_settings() {
    let data_dir = initialized();

    let ledger = std::fs::read_to_string(data_dir.path().join("main.beancount")).unwrap();
    assert!(ledger.contains("plugin \"budget_eur\""));
    assert!(ledger.contains(";;; FUTURE ;;;"));
    assert!(data_dir.path().join("config.json").exists());
}

#[test]
fn budget_on_starter_ledger() {
    let data_dir = initialized();

    beanbudget(&data_dir)
        .arg("budget")
        .assert()
        .success()
        .stdout(contains("Budget through"))
        .stdout(contains("Assigned"));
}

#[test]
fn budget_rejects_negative_months() {
    let data_dir = initialized();

    beanbudget(&data_dir)
        .args(["budget", "-1"])
        .assert()
        .failure()
        .stderr(contains(
            "Error: Please provide a positive integer for the number of months ahead.",
        ));
}

#[test]
fn budget_rejects_unknown_mode_and_huge_horizon() {
    let data_dir = initialized();

    beanbudget(&data_dir)
        .args(["budget", "0", "ful"])
        .assert()
        .failure()
        .stderr(contains("Error: Unknown report mode 'ful'"));

    beanbudget(&data_dir)
        .args(["budget", "4000000000"])
        .assert()
        .failure()
        .stderr(contains(
            "Error: Please provide a positive integer for the number of months ahead.",
        ));
}

#[test]
fn budget_full_and_csv_export() {
    let data_dir = initialized();
    std::fs::write(data_dir.path().join("main.beancount"), LEDGER).unwrap();
    let csv_path = data_dir.path().join("budget.csv");

    beanbudget(&data_dir)
        .args(["budget", "0", "full", "--csv"])
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(contains("Groceries"))
        .stdout(contains("Available"));

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert!(csv.starts_with("horizon,account,name,"));
    assert!(csv.contains("Expenses:Variable:Groceries"));
}

#[test]
fn broken_ledger_is_reported() {
    let data_dir = initialized();
    std::fs::write(
        data_dir.path().join("main.beancount"),
        "2024-01-01 * \"\"\n  Assets:Cash 5 EUR\n",
    )
    .unwrap();

    beanbudget(&data_dir)
        .arg("budget")
        .assert()
        .failure()
        .stderr(contains("Error loading ledger file:"))
        .stderr(contains("Error: Error").not());
}

#[test]
fn accounts_shows_balances() {
    let data_dir = initialized();
    std::fs::write(data_dir.path().join("main.beancount"), LEDGER).unwrap();

    beanbudget(&data_dir)
        .arg("accounts")
        .assert()
        .success()
        .stdout(contains("Positions as of"))
        .stdout(contains("Checking59"))
        .stdout(contains("1960.00"));
}

#[test]
fn config_prints_paths() {
    let data_dir = initialized();

    beanbudget(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(contains("main.beancount"))
        .stdout(contains("\"budget_tag\""));
}

#[test]
fn add_dialogue_appends_entry() {
    let data_dir = initialized();

    // amount, type, narration, payee, today, counterparty, account, confirm
    beanbudget(&data_dir)
        .arg("add")
        .write_stdin("42.50\n1\n.\n.\n6\n1\n1\n1\n")
        .assert()
        .success()
        .stdout(contains("Is the entry correct?"))
        .stdout(contains("Entry added successfully"));

    let ledger = std::fs::read_to_string(data_dir.path().join("main.beancount")).unwrap();
    assert!(ledger.contains("    Expenses:Variable:HouseTax 42.50 EUR\n"));
    assert!(ledger.contains("    Assets:NL:ING:Checking59 -42.50 EUR\n"));
    assert!(ledger.trim_end().ends_with(";;; FUTURE ;;;"));

    beanbudget(&data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("COMMITTED"))
        .stdout(contains("All sessions: 1 committed, 0 cancelled, 0 failed"));
}

#[test]
fn add_dialogue_cancelled_leaves_ledger() {
    let data_dir = initialized();
    let before = std::fs::read_to_string(data_dir.path().join("main.beancount")).unwrap();

    beanbudget(&data_dir)
        .arg("add")
        .write_stdin("10\n/cancel\n")
        .assert()
        .success()
        .stdout(contains("Operation cancelled"));

    let after = std::fs::read_to_string(data_dir.path().join("main.beancount")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn history_without_sessions() {
    let data_dir = initialized();

    beanbudget(&data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(contains("No entries recorded yet."));
}
