//! E2E tests for the stampduty commands

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn stampduty(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stampduty"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stampduty_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stampduty"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn command");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for command")
}

/// England sole property above the zero-rate band
#[test]
fn calc_england_sole_property() {
    let output = stampduty(&["calc", "-p", "300000", "-r", "england", "-s", "sole"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Stamp duty to pay: £2,500.00"));
    assert!(stdout.contains("Type: Sole property"));
}

/// Additional property surcharge with band breakdown
#[test]
fn calc_additional_property_breakdown() {
    let output = stampduty(&[
        "calc",
        "--price",
        "300000",
        "--region",
        "england",
        "--status",
        "additional",
        "--breakdown",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Stamp duty to pay: £11,500.00"));
    assert!(stdout.contains("£0 - £250,000"));
    assert!(stdout.contains("£7,500.00"));
    assert!(stdout.contains("£4,000.00"));
}

/// Wales additional property inside the zero-rate band
#[test]
fn calc_wales_additional_json() {
    let output = stampduty(&[
        "calc", "-p", "100000", "-r", "wales", "-s", "additional", "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["duty"], "4000.00");
    assert_eq!(json["rates"], "Wales (additional property)");
    assert_eq!(json["additional_property"], true);
}

/// No region given uses England / Northern Ireland rates
#[test]
fn calc_without_region() {
    let output = stampduty(&["calc", "-p", "300000", "-s", "additional", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["duty"], "11500.00");
    assert_eq!(json["region"], "unset");
}

/// Negative prices are rejected
#[test]
fn calc_negative_price_fails() {
    let output = stampduty(&["calc", "-p", "-5", "-s", "first"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("price must not be negative"));
}

/// Status is required
#[test]
fn calc_requires_status() {
    let output = stampduty(&["calc", "-p", "300000"]);
    assert!(!output.status.success());
}

#[test]
fn rates_for_wales() {
    let output = stampduty(&["rates", "--region", "wales"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Wales (additional property)"));
    assert!(stdout.contains("7.5%"));
    assert!(!stdout.contains("Scotland"));
}

#[test]
fn rates_json() {
    let output = stampduty(&["rates", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["tables"].as_array().map(Vec::len), Some(4));
}

#[test]
fn batch_csv() {
    let output = stampduty(&["batch", "tests/data/purchases.csv"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "price,region,status,duty");
    assert_eq!(lines[1], "200000.00,England,first-time,0.00");
    assert_eq!(lines[2], "300000.00,England,sole-property,2500.00");
    assert_eq!(lines[3], "300000.00,England,additional,11500.00");
    assert_eq!(lines[4], "100000.00,Wales,additional,4000.00");
    assert_eq!(lines[5], "400000.00,Scotland,additional,29350.00");
    assert_eq!(lines[6], "2000000.00,Northern Ireland,sole-property,151250.00");
    assert_eq!(lines[7], "750000.00,unset,additional,47500.00");
}

#[test]
fn batch_json() {
    let output = stampduty(&["batch", "tests/data/purchases.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("300000.00,England,additional,11500.00"));
    assert!(stdout.contains("500000.00,Wales,first-time,15000.00"));
    assert!(stdout.contains("300000.00,unset,sole-property,2500.00"));
}

#[test]
fn batch_from_stdin() {
    let output = stampduty_with_stdin(
        &["batch"],
        "price,region,status\n300000,scotland,first\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("300000.00,Scotland,first-time,4600.00"));
}

#[test]
fn batch_negative_price_fails() {
    let output = stampduty(&["batch", "tests/data/negative.csv"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("Row 2"));
}

#[test]
fn session_recalculates() {
    let output = stampduty_with_stdin(
        &["session"],
        "status additional\nregion wales\nprice £100,000\nquit\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Stamp duty to pay: £4,000.00"));
}

#[test]
fn batch_describe_columns() {
    let output = stampduty(&["batch", "--describe"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout.lines().next(), Some("price,region,status"));
    assert!(stdout.contains("Property price in pounds"));
    assert!(stdout.contains("first-time, sole-property or additional"));
}

#[test]
fn batch_json_schema() {
    let output = stampduty(&["batch", "--json-schema"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["type"], "array");
}

#[test]
fn batch_fractional_price_is_exact() {
    let output = stampduty_with_stdin(
        &["batch"],
        "price,region,status\n300000.40,england,sole\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("300000.40,England,sole-property,2500.02"));
}
