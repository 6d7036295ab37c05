//! The `tiffregion` binary end to end

mod common;

use std::process::Command;

use common::*;

fn tiffregion() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_tiffregion"));
    command.env_remove("RUST_LOG");
    command
}

#[test]
fn info_lists_every_page() {
    let dir = tempfile::tempdir().unwrap();
    let input = three_page_file(dir.path());

    let output = tiffregion().arg(&input).output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pages: 3"), "stdout: {}", stdout);
}

#[test]
fn fetch_writes_raw_rgba() {
    let dir = tempfile::tempdir().unwrap();
    let input = three_page_file(dir.path());
    let raw = dir.path().join("region.raw");

    let output = tiffregion()
        .arg(&input)
        .args(["--page", "1", "--sample-size", "2", "--region", "2,3,10,6", "-o"])
        .arg(&raw)
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    assert_eq!(std::fs::read(&raw).unwrap(), expected_region(2, 3, 10, 6, 2, 1));
}

#[test]
fn fetch_of_missing_page_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = three_page_file(dir.path());

    let output = tiffregion()
        .arg(&input)
        .args(["--page", "7", "--region", "0,0,4,4", "-o"])
        .arg(dir.path().join("none.raw"))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("getRegion-tiff-null"));
    assert!(!dir.path().join("none.raw").exists());
}
