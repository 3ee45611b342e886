//! Exit-code behaviour of the `matbench` binary

use std::fs;
use std::process::Command;

fn matbench() -> Command {
    Command::new(env!("CARGO_BIN_EXE_matbench"))
}

#[test]
fn test_unknown_option_is_usage_error() {
    let output = matbench().arg("--bogus").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_zero_threads_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = matbench()
        .args(["-i", dir.path().to_str().unwrap(), "-t", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_successful_run() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(
        input.path().join("dense_a.mtx"),
        "%%MatrixMarket matrix array real general\n2 2\n1\n0\n0\n1\n",
    )
    .unwrap();
    fs::write(
        input.path().join("sparse_a.mtx"),
        "%%MatrixMarket matrix coordinate real general\n2 2 2\n1 1 3.0\n2 2 4.0\n",
    )
    .unwrap();

    let status = matbench()
        .args(["-i", input.path().to_str().unwrap()])
        .args(["-o", out.path().to_str().unwrap()])
        .args(["-r", out.path().to_str().unwrap()])
        .args(["--threads", "2", "--check"])
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out.path().join("dense.csv").exists());
    assert!(out.path().join("sparse.csv").exists());
    assert!(out.path().join("dense_a.mtx.out").exists());
    assert!(out.path().join("sparse_a.mtx.out").exists());
}

#[test]
fn test_load_failure_exits_nonzero_with_diagnostic() {
    let input = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(input.path().join("dense_broken.mtx"), b"").unwrap();

    let output = matbench()
        .args(["--input_dir", input.path().to_str().unwrap()])
        .args(["--output_dir", out.path().to_str().unwrap()])
        .args(["--result_dir", out.path().to_str().unwrap()])
        .env("RUST_LOG", "error")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load failed"));
    assert!(stderr.contains("dense_broken.mtx"));
    assert!(!out.path().join("dense.csv").exists());
}
