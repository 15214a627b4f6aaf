//! Integration tests for the jt binary
//!
//! These drive the CLI end to end against temporary prompt and progress files.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STOICS_CSV: &str = "Day,Date,Question\n\
9,1/9,What can you let go of today?\n\
10,1/10,Who did you help today?\n\
11,1/11,What did you fear that never happened?\n";

/// Write a prompt table and a config pointing at it; returns the config path
fn setup(temp: &TempDir, catchup_rate: u32) -> PathBuf {
    let prompts = temp.path().join("stoics.csv");
    fs::write(&prompts, STOICS_CSV).unwrap();

    let config = temp.path().join("jt.yml");
    fs::write(
        &config,
        format!(
            "stoic:\n  prompts-file: {}\n  progress-file: {}\n  catchup-rate: {}\nwordcount:\n  goal: 100\n",
            prompts.display(),
            progress_path(temp).display(),
            catchup_rate
        ),
    )
    .unwrap();
    config
}

fn progress_path(temp: &TempDir) -> PathBuf {
    temp.path().join("state").join("stoic_progress.json")
}

fn jt(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jt").expect("jt binary should build");
    cmd.arg("--config").arg(config);
    cmd
}

// =============================================================================
// Wordcount Tests
// =============================================================================

#[test]
fn test_wordcount_from_stdin() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);

    jt(&config)
        .arg("wordcount")
        .write_stdin("- [ ] Call mom about this/that\n")
        .assert()
        .success()
        .stdout("5\n");
}

#[test]
fn test_wordcount_file_with_goal() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);
    let entry = temp.path().join("entry.txt");
    fs::write(&entry, "Morning\n\n\tskipped block\n\nversion 1.11.23 shipped").unwrap();

    jt(&config)
        .args(["wordcount", "--goal"])
        .arg(&entry)
        .assert()
        .success()
        .stdout("4\nGoal WC: 104\n");
}

#[test]
fn test_wordcount_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);

    jt(&config)
        .arg("wordcount")
        .arg(temp.path().join("nope.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

// =============================================================================
// Stoic Tests
// =============================================================================

#[test]
fn test_stoic_first_run_catches_up_and_persists() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);

    // No progress file: starts at day 1, far behind day 10
    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry for day 1."))
        .stdout(predicate::str::contains("No entry for day 2."));

    let saved = fs::read_to_string(progress_path(&temp)).unwrap();
    let saved: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(saved["day"], 3);
    assert_eq!(saved["updated_on"], "2026-01-10");
}

#[test]
fn test_stoic_same_day_repeats_without_rewriting() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);
    let progress = progress_path(&temp);
    fs::create_dir_all(progress.parent().unwrap()).unwrap();
    fs::write(&progress, r#"{"day": 10, "updated_on": "2026-01-09"}"#).unwrap();

    let expected = "\n- Daily Stoic Prompt, 1/10:\nWho did you help today?\n\t- Morning:\n\t\t- \n\t- Evening:\n\t\t- \n";

    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .success()
        .stdout(expected);
    let after_first = fs::read_to_string(&progress).unwrap();

    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .success()
        .stdout(expected);
    let after_second = fs::read_to_string(&progress).unwrap();

    assert_eq!(after_first, after_second);

    jt(&config)
        .args(["stoic", "--date", "2026-01-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("What did you fear that never happened?"));
}

#[test]
fn test_stoic_dry_run_does_not_write() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);

    jt(&config)
        .args(["stoic", "--date", "2026-01-09", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("would save:"));

    assert!(!progress_path(&temp).exists());
}

#[test]
fn test_stoic_missing_prompts_file_fails() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);
    fs::remove_file(temp.path().join("stoics.csv")).unwrap();

    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load stoic prompts"));
}

#[test]
fn test_stoic_skips_malformed_prompt_row() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);
    let progress = progress_path(&temp);
    fs::create_dir_all(progress.parent().unwrap()).unwrap();
    fs::write(&progress, r#"{"day": 10, "updated_on": "2026-01-09"}"#).unwrap();
    fs::write(
        temp.path().join("stoics.csv"),
        "Day,Date,Question\n10,not a date,Broken row\n11,1/11,Still here\n",
    )
    .unwrap();

    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No entry for day 10."));
}

#[test]
fn test_zero_catchup_rate_is_rejected() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 0);

    jt(&config)
        .args(["stoic", "--date", "2026-01-10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("catchup-rate"));
}

#[test]
fn test_progress_shows_cursor() {
    let temp = TempDir::new().unwrap();
    let config = setup(&temp, 2);
    let progress = progress_path(&temp);
    fs::create_dir_all(progress.parent().unwrap()).unwrap();
    fs::write(&progress, r#"{"day": 400, "updated_on": "2026-02-02"}"#).unwrap();

    jt(&config)
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Day: 400 (cycle day 34)"))
        .stdout(predicate::str::contains("Updated on: 2026-02-02"));
}
