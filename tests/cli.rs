use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn bin() -> Command {
    Command::cargo_bin("finance-tracker").expect("binary 'finance-tracker' not found")
}

#[test]
fn test_shows_help() {
    let mut cmd = bin();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("summary"));
}

#[test]
fn summary_of_exported_csv() {
    let csv = "date,kind,category,amount,description\n\
2024-01-01,Income,Salary,1000,January pay\n\
2024-01-02,Expense,Food,50,\n\
2024-01-02,Expense,Transport,20,Bus pass\n";

    let dir = tempdir().unwrap();
    let input = dir.path().join("transactions.csv");
    fs::write(&input, csv).unwrap();

    let mut cmd = bin();
    cmd.args(["summary", input.to_str().unwrap()]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("$1,000.00"))
        .stdout(predicate::str::contains("$70.00"))
        .stdout(predicate::str::contains("$930.00"))
        .stdout(predicate::str::contains("Transport"));
}

#[test]
fn summary_rejects_invalid_rows() {
    let csv = "date,kind,category,amount,description\n2024-01-01,Income,Food,10,\n";

    let dir = tempdir().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, csv).unwrap();

    let mut cmd = bin();
    cmd.args(["summary", input.to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not valid for Income"));
}

#[test]
fn summary_missing_file_fails() {
    let mut cmd = bin();
    cmd.args(["summary", "/nonexistent/transactions.csv"]);
    cmd.assert().failure();
}
