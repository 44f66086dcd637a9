/// CLI integration tests for cadence
///
/// These tests run the binary as a black box: argument handling, output
/// formatting, exit codes and configuration loading.
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, count_table_rows, CliTestHarness};

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["--help"])
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("encode"));

    harness
        .run_success(&["--version"])
        .stdout(predicate::str::contains("cadence"));

    harness
        .run_failure(&["invalid-command"])
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_preview_weekly_on_listed_days() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "preview",
            "--title",
            "Standup",
            "--every",
            "weekly",
            "--on",
            "mon,wed,fri",
            "--start",
            "2024-01-01 09:00",
            "-n",
            "4",
        ])
        .stdout(predicate::str::contains("Standup"))
        .stdout(predicate::str::contains("Weekly on Mon, Wed, Fri"))
        .stdout(assertions::has_occurrence_table_headers())
        .stdout(predicate::str::contains("2024-01-01 09:00"))
        .stdout(predicate::str::contains("2024-01-03 09:00"))
        .stdout(predicate::str::contains("2024-01-05 09:00"))
        .stdout(predicate::str::contains("2024-01-08 09:00"))
        .stdout(predicate::str::contains("2024-01-10").not());
}

#[test]
fn test_preview_last_monday_as_json() {
    let harness = CliTestHarness::new();

    let output = harness
        .run_success(&[
            "preview",
            "--every",
            "monthly",
            "--start",
            "2024-01-01",
            "--monthly-week",
            "-1",
            "--monthly-day",
            "mon",
            "-n",
            "3",
            "--json",
        ])
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("preview should print JSON");
    assert_eq!(json["description"], "Monthly on the last Monday");
    let dates: Vec<&str> = json["occurrences"]
        .as_array()
        .unwrap()
        .iter()
        .map(|occurrence| occurrence["at"].as_str().unwrap())
        .collect();
    assert_eq!(
        dates,
        vec!["2024-01-29T00:00:00", "2024-02-26T00:00:00", "2024-03-25T00:00:00"]
    );
    assert_eq!(json["rule"]["monthly"]["type"], "by_weekday");
}

#[test]
fn test_preview_encoded_rule_clamps_to_month_end() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "preview",
            "--rule",
            "pattern:monthly;start:2024-01-31;monthly:date:31",
            "-n",
            "4",
        ])
        .stdout(predicate::str::contains("Monthly on day 31"))
        .stdout(predicate::str::contains("2024-01-31"))
        .stdout(predicate::str::contains("2024-02-29"))
        .stdout(predicate::str::contains("2024-03-31"))
        .stdout(predicate::str::contains("2024-04-30"));
}

#[test]
fn test_preview_end_conditions() {
    let harness = CliTestHarness::new();

    let assert = harness.run_success(&[
        "preview",
        "--every",
        "daily",
        "--start",
        "2024-03-01",
        "--count",
        "3",
        "-n",
        "10",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Daily, 3 times"));
    assert_eq!(count_table_rows(&stdout, "2024-03-"), 3);

    let assert = harness.run_success(&[
        "preview",
        "--every",
        "weekly",
        "--start",
        "2024-01-01",
        "--until",
        "2024-01-15",
        "-n",
        "10",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("until 2024-01-15"));
    assert_eq!(count_table_rows(&stdout, "2024-01-"), 3);
    assert!(stdout.contains("2024-01-15"));
}

#[test]
fn test_preview_after_skips_earlier_occurrences() {
    let harness = CliTestHarness::new();

    let assert = harness.run_success(&[
        "preview",
        "--every",
        "daily",
        "--start",
        "2024-01-01 08:00",
        "--after",
        "2024-01-03 08:00",
        "-n",
        "2",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(!stdout.contains("2024-01-03 08:00"));
    assert!(stdout.contains("2024-01-04 08:00"));
    assert!(stdout.contains("2024-01-05 08:00"));
    assert_eq!(count_table_rows(&stdout, "2024-01-"), 2);
}

#[test]
fn test_preview_ended_rule_shows_nothing() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "preview",
            "--every",
            "daily",
            "--start",
            "2024-01-01",
            "--count",
            "2",
            "--after",
            "2024-06-01",
        ])
        .stdout(predicate::str::contains("No occurrences."));
}

#[test]
fn test_preview_rejects_unusable_rules() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&[
            "preview",
            "--every",
            "daily",
            "--interval",
            "0",
            "--start",
            "2024-01-01",
        ])
        .stderr(predicate::str::contains("Invalid recurrence rule"))
        .stderr(predicate::str::contains("interval"));

    harness
        .run_failure(&[
            "preview",
            "--every",
            "daily",
            "--start",
            "2024-01-10",
            "--until",
            "2024-01-01",
        ])
        .stderr(predicate::str::contains("Invalid recurrence rule"))
        .stderr(predicate::str::contains("precedes"));

    harness
        .run_failure(&["preview", "--rule", "pattern:hourly;start:2024-01-01"])
        .stderr(assertions::has_error())
        .stderr(predicate::str::contains("hourly"));

    harness
        .run_failure(&["preview", "--start", "2024-01-01"])
        .stderr(predicate::str::contains("--every"));
}

#[test]
fn test_check_reports_field_errors() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["check", "--every", "daily", "--start", "2024-01-01"])
        .stderr(predicate::str::contains("Rule is not valid"))
        .stderr(predicate::str::contains("title"));

    harness
        .run_failure(&[
            "check",
            "--title",
            "Review",
            "--every",
            "weekly",
            "--start",
            "2024-01-01",
        ])
        .stderr(predicate::str::contains("days_of_week"));

    let output = harness
        .command()
        .args(["check", "--every", "daily", "--start", "2024-01-01", "--json"])
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("check should print JSON");
    assert_eq!(json["status"], "invalid");
    assert_eq!(json["errors"][0]["field"], "title");
}

#[test]
fn test_check_valid_rule() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "check",
            "--title",
            "Standup",
            "--every",
            "weekdays",
            "--start",
            "2024-01-01 09:00",
            "--until",
            "2024-12-31",
        ])
        .stdout(predicate::str::contains("Rule is valid"))
        .stdout(predicate::str::contains("Weekly on Mon, Tue, Wed, Thu, Fri, until 2024-12-31"));
}

#[test]
fn test_encode_prints_stored_form() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "encode",
            "--title",
            "Standup",
            "--every",
            "weekly",
            "--interval",
            "2",
            "--start",
            "2024-01-01",
            "--on",
            "mon,wed,fri",
            "--count",
            "10",
        ])
        .stdout(predicate::str::diff(
            "pattern:weekly;interval:2;start:2024-01-01T00:00:00;days:1,3,5;end:after:10;title:Standup\n",
        ));

    harness
        .run_failure(&[
            "encode",
            "--every",
            "monthly",
            "--start",
            "2024-01-01",
            "--monthly-date",
            "32",
        ])
        .stderr(predicate::str::contains("Invalid recurrence rule"));
}

#[test]
fn test_config_file_and_environment() {
    let harness = CliTestHarness::new();
    harness.write_config("cadence.toml", "[preview]\ndefault_count = 3\n");

    let args = ["preview", "--every", "daily", "--start", "2024-01-01"];

    let assert = harness.run_success(&args);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(count_table_rows(&stdout, "2024-01-"), 3);

    let assert = harness
        .command()
        .args(args)
        .env("CADENCE_PREVIEW__DEFAULT_COUNT", "2")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(count_table_rows(&stdout, "2024-01-"), 2);
}

#[test]
fn test_explicit_config_path_and_date_format() {
    let harness = CliTestHarness::new();
    let path = harness.write_config(
        "custom.toml",
        "[display]\ndate_format = \"%d/%m/%Y\"\n\n[preview]\nmax_count = 2\n",
    );
    assert!(path.starts_with(harness.dir()));

    let assert = harness.run_success(&[
        "--config",
        path.to_str().unwrap(),
        "preview",
        "--every",
        "daily",
        "--start",
        "2024-01-01",
        "-n",
        "5",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("01/01/2024"));
    assert_eq!(count_table_rows(&stdout, "/01/2024"), 2);
    assert!(stdout.contains("Showing at most 2 occurrences"));
}

#[test]
fn test_invalid_date_format_uses_default() {
    let harness = CliTestHarness::new();
    harness.write_config("cadence.toml", "[display]\ndate_format = \"%Q\"\n");

    let assert = harness.run_success(&[
        "preview",
        "--every",
        "daily",
        "--start",
        "2024-01-01 09:00",
        "-n",
        "2",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("2024-01-01 09:00"));
    assert_eq!(count_table_rows(&stdout, "2024-01-0"), 2);
}

#[test]
fn test_preview_materialize_uses_configured_window() {
    let harness = CliTestHarness::new();
    harness.write_config("cadence.toml", "[preview]\nmaterialize_count = 5\n");

    let assert = harness.run_success(&[
        "preview",
        "--every",
        "weekly",
        "--start",
        "2024-01-01",
        "--materialize",
    ]);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert_eq!(count_table_rows(&stdout, "2024-"), 5);
    assert!(stdout.contains("2024-01-29"));
    assert!(!stdout.contains("2024-02-05"));

    harness
        .run_failure(&["preview", "--every", "daily", "--materialize", "-n", "2"])
        .stderr(predicate::str::contains("cannot be used with"));
}
