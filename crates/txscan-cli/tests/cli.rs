//! End-to-end tests for the txscan binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const INCOME: &str = "Т-Банк\n\
                      Дата операции: 08.10.2025\n\
                      Сумма: 1 500,50 Р\n\
                      Отправитель: Иванов И.";

const FEED: &str = "Т-Банк\nИван И.\nTransfers\n+200 Р\nОлег О.\nTop-ups\n+350 Р";

fn txscan() -> Command {
    Command::cargo_bin("txscan").unwrap()
}

#[test]
fn test_extract_json_from_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("income.txt");
    fs::write(&input, INCOME).unwrap();

    txscan()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""date":"08.10.2025""#))
        .stdout(predicate::str::contains(r#""amount":"1500.50""#))
        .stdout(predicate::str::contains(r#""author":"Иванов И.""#));
}

#[test]
fn test_extract_reads_stdin() {
    txscan()
        .args(["extract", "-", "-f", "text"])
        .write_stdin(INCOME)
        .assert()
        .success()
        .stdout(predicate::str::contains("Income"))
        .stdout(predicate::str::contains("Т-Банк"));
}

#[test]
fn test_extract_aggregate_csv() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("feed.txt");
    fs::write(&input, FEED).unwrap();

    txscan()
        .arg("extract")
        .arg(&input)
        .args(["-p", "aggregate", "-f", "csv", "--today", "08.10.2025"])
        .assert()
        .success()
        .stdout(predicate::str::contains("date,bank,sender,amount,type,card,tag"))
        .stdout(predicate::str::contains("08.10.2025,Т-Банк,Иван И.,200"))
        .stdout(predicate::str::contains("Олег О.,350"));
}

#[test]
fn test_extract_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("income.txt");
    let output = dir.path().join("out.json");
    fs::write(&input, INCOME).unwrap();

    txscan()
        .arg("extract")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("--show-completeness")
        .assert()
        .success()
        .stderr(predicate::str::contains("Extracted fields: 4/5"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains(r#""bank":"Т-Банк""#));
}

#[test]
fn test_extract_missing_file_fails() {
    txscan()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_extract_rejects_unknown_polarity() {
    txscan()
        .args(["extract", "-", "-p", "sideways"])
        .write_stdin(INCOME)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown polarity"));
}

#[test]
fn test_explain_marks_winner() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("income.txt");
    fs::write(&input, INCOME).unwrap();

    txscan()
        .arg("explain")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("date"))
        .stdout(predicate::str::contains("→"))
        .stdout(predicate::str::contains("Иванов И."));
}

#[test]
fn test_rules_for_one_field() {
    txscan()
        .args(["rules", "--field", "bank"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Сбербанк"))
        .stdout(predicate::str::contains("amount").not());
}

#[test]
fn test_batch_with_summary() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::write(dir.path().join("a.txt"), INCOME).unwrap();
    fs::write(dir.path().join("b.txt"), "Сбербанк\nСумма: 700 ₽").unwrap();
    fs::write(dir.path().join("notes.md"), INCOME).unwrap();

    let pattern = dir.path().join("*").to_string_lossy().into_owned();

    txscan()
        .args(["batch", &pattern, "--summary", "-j", "2"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("a.json").exists());
    assert!(out.join("b.json").exists());
    assert!(!out.join("notes.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,date,amount"));
    assert!(summary.contains("a.txt,success,08.10.2025,1500.50"));
    assert_eq!(summary.lines().count(), 3);
}

#[test]
fn test_batch_blank_file_yields_empty_record() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::write(dir.path().join("empty.txt"), "  \n").unwrap();

    let pattern = dir.path().join("*.txt").to_string_lossy().into_owned();

    txscan()
        .args(["batch", &pattern, "--summary"])
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.contains("empty.txt,success,,,,,,0/5,"));
    assert!(out.join("empty.json").exists());
}

#[test]
fn test_config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let config_arg = config.to_string_lossy().into_owned();

    txscan()
        .args(["--config", &config_arg, "config", "init"])
        .assert()
        .success();
    assert!(config.exists());

    txscan()
        .args(["--config", &config_arg, "config", "get", "extraction.comment_max_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("200"));

    txscan()
        .args(["--config", &config_arg, "config", "set", "extraction.comment_max_chars", "80"])
        .assert()
        .success();

    txscan()
        .args(["--config", &config_arg, "config", "get", "extraction.comment_max_chars"])
        .assert()
        .success()
        .stdout(predicate::str::contains("80"));

    txscan()
        .args(["--config", &config_arg, "config", "set", "extraction.comment_max_chars", "1"])
        .assert()
        .failure();

    txscan()
        .args(["--config", &config_arg, "config", "set", "extraction.no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration key not found"));
}
