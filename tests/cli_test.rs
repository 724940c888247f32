//! End-to-end tests for the `twin` binary.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::TestEnv;

/// Builds a `twin` command with an isolated config path.
fn twin(env: &TestEnv) -> Command {
    let mut cmd = Command::cargo_bin("twin").expect("binary builds");
    cmd.env("TWINDIFF_CONFIG_PATH", env.config_path());
    cmd
}

#[test]
fn test_text_comparison_prints_edit_script() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["text", "one\ntwo\nthree", "one\nTWO\nthree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--- left text"))
        .stdout(predicate::str::contains("+++ right text"));
    Ok(())
}

#[test]
fn test_files_comparison_records_last_pair() -> Result<()> {
    let env = TestEnv::new()?;
    let a = env.file("a.txt", b"alpha\n")?;
    let b = env.file("b.txt", b"beta\n")?;

    twin(&env)
        .args(["files", a.to_str().unwrap(), b.to_str().unwrap()])
        .assert()
        .success();

    twin(&env)
        .args(["config", "last_file_a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
    Ok(())
}

#[test]
fn test_strict_xml_failure_names_side() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["text", "--mode", "xml", "<broken", "<fine/>"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("left"));
    Ok(())
}

#[test]
fn test_config_set_get_round_trip() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["config", "compare_mode", "binary"])
        .assert()
        .success();

    twin(&env)
        .args(["config", "compare_mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("binary"));

    twin(&env)
        .args(["config", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("binary_footprint_length"));
    Ok(())
}

#[test]
fn test_config_rejects_unknown_key() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["config", "no_such_key", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown option key"));
    Ok(())
}

#[test]
fn test_filter_add_and_list() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["filter", "add", "*.zig"])
        .assert()
        .success();

    twin(&env)
        .args(["filter", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("*.zig"));
    Ok(())
}

#[test]
fn test_missing_file_fails_with_io_error() -> Result<()> {
    let env = TestEnv::new()?;

    twin(&env)
        .args(["files", "/no/such/a", "/no/such/b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
    Ok(())
}
