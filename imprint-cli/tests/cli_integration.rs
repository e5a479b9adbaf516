//! CLI integration tests for imprint-cli.
//!
//! These tests run the actual binary against images written to a temp
//! directory. No registry server is started; network commands are only
//! exercised against an unreachable address.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use imprint_core::Fingerprint;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the imprint binary.
fn imprint() -> Command {
    Command::cargo_bin("imprint").unwrap()
}

/// Write a 64x64 diagonal gradient PNG, optionally inverted.
fn write_gradient(dir: &Path, name: &str, invert: bool) -> PathBuf {
    let img = RgbImage::from_fn(64, 64, |x, y| {
        let v = ((x + y) * 2) as u8;
        let v = if invert { 255 - v } else { v };
        Rgb([v, v, v])
    });
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_displays_usage() {
    imprint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Content fingerprinting"))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("distance"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("claim"));
}

#[test]
fn test_version_displays_version() {
    imprint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("imprint"));
}

#[test]
fn test_help_shows_exit_codes() {
    imprint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit codes:"))
        .stdout(predicate::str::contains("65"))
        .stdout(predicate::str::contains("69"));
}

#[test]
fn test_register_help_shows_options() {
    imprint()
        .args(["register", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--owner"))
        .stdout(predicate::str::contains("--code"))
        .stdout(predicate::str::contains("--device"))
        .stdout(predicate::str::contains("--server"));
}

#[test]
fn test_claim_help_shows_options() {
    imprint()
        .args(["claim", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--claimant"))
        .stdout(predicate::str::contains("--claim-type"))
        .stdout(predicate::str::contains("--evidence"));
}

// ============================================================================
// Exit Code Tests
// ============================================================================

#[test]
fn test_unknown_subcommand_returns_usage_error() {
    // Exit code 64 = EX_USAGE
    imprint().arg("transfer").assert().code(64);
}

#[test]
fn test_register_without_owner_returns_usage_error() {
    imprint()
        .args(["register", "image.png", "--code", "1234"])
        .assert()
        .code(64);
}

#[test]
fn test_missing_file_returns_input_error() {
    // Exit code 66 = EX_NOINPUT
    imprint()
        .args(["fingerprint", "nonexistent_file.png"])
        .assert()
        .code(66)
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn test_non_image_returns_data_error() {
    let temp = TempDir::new().unwrap();
    let text_file = temp.path().join("notes.png");
    fs::write(&text_file, b"definitely not an image").unwrap();

    // Exit code 65 = EX_DATAERR
    imprint()
        .args(["fingerprint", text_file.to_str().unwrap()])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Failed to decode image"));
}

#[test]
fn test_unreachable_server_returns_network_error() {
    let temp = TempDir::new().unwrap();
    let image = write_gradient(temp.path(), "work.png", false);

    // Exit code 69 = EX_UNAVAILABLE
    imprint()
        .args([
            "register",
            image.to_str().unwrap(),
            "--owner",
            "alice",
            "--code",
            "482913",
            "--server",
            "http://127.0.0.1:1",
        ])
        .assert()
        .code(69)
        .stderr(predicate::str::contains("Failed to reach registry"));
}

// ============================================================================
// Fingerprint Tests
// ============================================================================

#[test]
fn test_fingerprint_prints_exact_hash() {
    let temp = TempDir::new().unwrap();
    let image = write_gradient(temp.path(), "work.png", false);
    let expected = Fingerprint::from_bytes(&fs::read(&image).unwrap()).unwrap();

    imprint()
        .args(["fingerprint", image.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.exact_hash))
        .stdout(predicate::str::contains("1024 bits"));
}

#[test]
fn test_fingerprint_json_output() {
    let temp = TempDir::new().unwrap();
    let image = write_gradient(temp.path(), "work.png", false);

    let output = imprint()
        .args(["fingerprint", "--json", image.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["exactHash"].as_str().unwrap().len(), 64);
    assert_eq!(json["perceptualHash"].as_str().unwrap().len(), 1024);
}

// ============================================================================
// Distance Tests
// ============================================================================

#[test]
fn test_distance_between_bit_strings() {
    imprint()
        .args(["--quiet", "distance", "00001111", "00000011"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_distance_reports_match_within_threshold() {
    imprint()
        .args(["distance", "0000", "0001", "--threshold", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MATCH"));
}

#[test]
fn test_distance_same_image_is_zero() {
    let temp = TempDir::new().unwrap();
    let image = write_gradient(temp.path(), "work.png", false);
    let path = image.to_str().unwrap();

    imprint()
        .args(["-q", "distance", path, path])
        .assert()
        .success()
        .stdout("0\n");
}

#[test]
fn test_distance_inverted_image_is_distinct() {
    let temp = TempDir::new().unwrap();
    let original = write_gradient(temp.path(), "work.png", false);
    let inverted = write_gradient(temp.path(), "inverted.png", true);

    imprint()
        .args([
            "distance",
            original.to_str().unwrap(),
            inverted.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("DISTINCT"));
}

#[test]
fn test_distance_length_mismatch_returns_data_error() {
    imprint()
        .args(["distance", "0101", "010"])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("length mismatch"));
}

#[test]
fn test_distance_invalid_hash_returns_data_error() {
    imprint()
        .args(["distance", "01ab", "0101"])
        .assert()
        .code(65)
        .stderr(predicate::str::contains("Invalid perceptual hash"));
}
