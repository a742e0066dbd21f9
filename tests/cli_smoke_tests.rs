use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("finance_core_cli").expect("binary builds");
    cmd.env("FINANCE_CORE_HOME", home.path());
    cmd
}

#[test]
fn add_then_stats_reports_totals() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Salary", "5000", "income", "2024-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction added"));
    cli(&home)
        .args(["add", "Food", "200", "expense", "2024-01-02", "groceries"])
        .assert()
        .success();
    cli(&home)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("₹5,000.00"))
        .stdout(predicate::str::contains("₹200.00"))
        .stdout(predicate::str::contains("₹4,800.00"));
}

#[test]
fn add_rejects_blank_category_and_keeps_state() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "", "100", "expense", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input"));
    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (0)"));
}

#[test]
fn add_rejects_non_numeric_amount() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Food", "lots", "expense", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a number"));
}

#[test]
fn list_filters_by_kind() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Salary", "5000", "income", "2024-01-01"])
        .assert()
        .success();
    cli(&home)
        .args(["add", "Food", "200", "expense", "2024-01-02"])
        .assert()
        .success();
    cli(&home)
        .args(["list", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (1)"))
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Food").not());
}

#[test]
fn budget_progress_for_the_current_month() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["budget", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly budget set to ₹1,000.00"));
    cli(&home)
        .args(["add", "Food", "300", "expense", "today"])
        .assert()
        .success();
    cli(&home)
        .arg("budget")
        .assert()
        .success()
        .stdout(predicate::str::contains("spent ₹300.00"))
        .stdout(predicate::str::contains("remaining ₹700.00"))
        .stdout(predicate::str::contains("30% used"));
}

#[test]
fn report_includes_top_spending_categories() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Food", "200", "expense", "2024-01-02"])
        .assert()
        .success();
    cli(&home)
        .args(["add", "Transport", "80", "expense", "2024-01-03"])
        .assert()
        .success();
    cli(&home)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Financial Report"))
        .stdout(predicate::str::contains("Top Spending Categories"))
        .stdout(predicate::str::contains("Food"))
        .stdout(predicate::str::contains("Report generated on"));
}

#[test]
fn export_clear_import_roundtrip() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Food", "50", "expense", "2024-01-01"])
        .assert()
        .success();
    let snapshot = home.path().join("snapshot.json");
    cli(&home)
        .args(["export", snapshot.to_str().unwrap()])
        .assert()
        .success();
    cli(&home).arg("clear").assert().success();
    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (0)"));
    cli(&home)
        .args(["import", snapshot.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data imported successfully"));
    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (1)"));
}

#[test]
fn import_rejects_malformed_payload_and_keeps_state() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["add", "Food", "50", "expense", "2024-01-01"])
        .assert()
        .success();
    let bad = home.path().join("bad.json");
    std::fs::write(&bad, "{not valid json").unwrap();
    cli(&home)
        .args(["import", bad.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed data"));
    cli(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions (1)"));
}

#[test]
fn unknown_command_suggests_the_closest_name() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("lst")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown command"))
        .stdout(predicate::str::contains("Suggestion: `list`?"));
}

#[test]
fn script_mode_reads_commands_from_stdin() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add Food 10 expense 2024-01-01\nlist\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transaction added"))
        .stdout(predicate::str::contains("Transactions (1)"));
}
