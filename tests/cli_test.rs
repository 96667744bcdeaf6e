//! Command-line behavior: argument parsing, validation and exit codes.
//!
//! Tests that touch a real PDF build one with printpdf and run the binary
//! against it; the rest only exercise argument handling.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

mod common;
use common::*;

fn redmark() -> Command {
    Command::cargo_bin("redmark").expect("binary is built for integration tests")
}

fn sample_pdf(dir: &TempDir) -> Result<std::path::PathBuf> {
    TestPdfBuilder::new()
        .with_page(&["Account 12345 for Jane Roe", "Balance due"])
        .with_page(&["Reference 12345"])
        .build(&dir.path().join("input.pdf"))
}

#[test]
fn test_help_lists_options() {
    redmark()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--find"))
        .stdout(predicate::str::contains("--rect"))
        .stdout(predicate::str::contains("--regex"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_missing_input_flag() {
    redmark()
        .args(["--output", "out.pdf", "--find", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input is required"));
}

#[test]
fn test_missing_input_file() -> Result<()> {
    let dir = TempDir::new()?;
    let output = dir.path().join("out.pdf");
    redmark()
        .arg("--input")
        .arg(dir.path().join("does_not_exist.pdf"))
        .arg("--output")
        .arg(&output)
        .args(["--find", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_no_targets_is_an_error() -> Result<()> {
    let dir = TempDir::new()?;
    let input = sample_pdf(&dir)?;
    redmark()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(dir.path().join("out.pdf"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No redaction targets"));
    Ok(())
}

#[test]
fn test_malformed_rect_rejected_by_parser() {
    redmark()
        .args(["-i", "in.pdf", "-o", "out.pdf", "--rect", "1:10,20,30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PAGE:X0,Y0,X1,Y1"));
}

#[test]
fn test_zero_page_rect_rejected() {
    redmark()
        .args(["-i", "in.pdf", "-o", "out.pdf", "--rect", "0:10,20,30,40"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start at 1"));
}

#[test]
fn test_invalid_regex_reported() -> Result<()> {
    let dir = TempDir::new()?;
    let input = sample_pdf(&dir)?;
    let output = dir.path().join("out.pdf");
    redmark()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--regex", "--find", "Account("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pattern"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_bad_config_file() -> Result<()> {
    let dir = TempDir::new()?;
    let config = dir.path().join("redmark.toml");
    fs::write(&config, "zoom = -2.0\n")?;
    redmark()
        .arg("--config")
        .arg(&config)
        .args(["-i", "in.pdf", "-o", "out.pdf", "--find", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zoom must be positive"));
    Ok(())
}

#[test]
fn test_no_matches_without_allow_empty_fails() -> Result<()> {
    let dir = TempDir::new()?;
    let input = sample_pdf(&dir)?;
    let output = dir.path().join("out.pdf");
    redmark()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--find", "nowhere-to-be-found"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No matches found"))
        .stderr(predicate::str::contains("--allow-empty"));
    assert!(!output.exists());
    Ok(())
}

#[test]
fn test_find_redacts_and_saves() -> Result<()> {
    let dir = TempDir::new()?;
    let input = sample_pdf(&dir)?;
    let output = dir.path().join("out.pdf");
    redmark()
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--find", "12345"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Redacted 2 region(s)"));

    assert!(is_valid_pdf(&output));
    assert_redacted(&output, "12345");
    assert_preserved(&output, "Balance");
    Ok(())
}

#[test]
fn test_lines_subcommand_prints_reconstructed_text() -> Result<()> {
    let dir = TempDir::new()?;
    let input = sample_pdf(&dir)?;
    redmark()
        .arg("lines")
        .arg("-i")
        .arg(&input)
        .args(["-p", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- page 2 ---"))
        .stdout(predicate::str::contains("Reference 12345"))
        .stdout(predicate::str::contains("page 1").not());
    Ok(())
}
