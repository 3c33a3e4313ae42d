//! Runs the binary against fixture files with the offline reference source.

mod common;

use assert_cmd::Command;
use common::write_file;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const WASTE_CSV: &str = indoc! {"
    Country,waste_kg_per_capita
    EU27,16.0
    Germany,19.5
    Italia,13.9
    Narnia,5.0
"};

fn wardrobe(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("wardrobe-index").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("WARDROBE_QUIET", "1")
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_estimate_json_to_file() {
    let dir = TempDir::new().unwrap();
    let waste = write_file(dir.path(), "waste.csv", WASTE_CSV);
    let output = dir.path().join("out/report.json");

    wardrobe(&dir)
        .args(["estimate", "--population-source", "reference", "--format", "json"])
        .arg("--output")
        .arg(&output)
        .arg(&waste)
        .assert()
        .success();

    let report: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let estimates = report["estimates"].as_array().unwrap();
    // Germany, Italy and the US supplement, two default scenarios each
    assert_eq!(estimates.len(), 6);
    assert_eq!(report["metadata"]["population_source"], "reference");

    let usa = estimates
        .iter()
        .find(|r| r["country_key"] == "USA" && r["coverage_fraction"] == 0.25)
        .unwrap();
    assert_eq!(usa["avoided_co2_kg"], 6_849_968_750.0);

    let excluded: Vec<&str> = report["diagnostics"]["exclusions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["label"].as_str().unwrap())
        .collect();
    assert_eq!(excluded, vec!["EU27", "Narnia"]);
}

#[test]
fn test_estimate_terminal_output() {
    let dir = TempDir::new().unwrap();
    let waste = write_file(dir.path(), "waste.csv", WASTE_CSV);

    let assert = wardrobe(&dir)
        .args(["estimate", "--population-source", "reference", "--plain", "--top", "2"])
        .arg(&waste)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    assert!(stdout.contains("Scenario: 10% of purchases second-hand"));
    assert!(stdout.contains("6,849.97"));
    assert!(stdout.contains("... 1 more"));
    assert!(stdout.contains("Excluded (2):"));
}

#[test]
fn test_invalid_coverage_fails_before_loading() {
    let dir = TempDir::new().unwrap();

    let assert = wardrobe(&dir)
        .args(["estimate", "--coverage", "0.2,1.5", "missing.csv"])
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("E020"));
    assert!(stderr.contains("coverage fraction 1.5"));
}

#[test]
fn test_init_then_resolve() {
    let dir = TempDir::new().unwrap();

    wardrobe(&dir).arg("init").assert().success();
    assert!(dir.path().join(".wardrobe.toml").exists());
    wardrobe(&dir).arg("init").assert().failure();

    let assert = wardrobe(&dir)
        .args(["resolve", "Türkiye", "Narnia"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Türkiye -> TUR (manual override)"));
    assert!(stdout.contains("Narnia -> unresolved"));
}
