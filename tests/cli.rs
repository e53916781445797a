use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::cargo_bin("pritunl-ctl").unwrap()
}

/// Config pointing at an empty profile directory and a missing auth key
fn empty_profiles_config(dir: &TempDir) -> std::path::PathBuf {
    let profiles = dir.path().join("profiles");
    fs::create_dir_all(&profiles).unwrap();
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!(
            "[daemon]\nurl = \"http://127.0.0.1:9\"\nauth_key_path = {:?}\n\n\
             [profiles]\ndir = {:?}\n",
            dir.path().join("auth"),
            profiles,
        ),
    )
    .unwrap();
    config
}

#[test]
fn test_no_arguments_prints_usage_and_fails() {
    cli()
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_version() {
    cli()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_conflicting_actions_fail() {
    cli().args(["-l", "-a"]).assert().failure();
}

#[test]
fn test_list_without_profiles() {
    let dir = TempDir::new().unwrap();
    let config = empty_profiles_config(&dir);

    cli()
        .arg("--config")
        .arg(&config)
        .arg("-l")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("No profiles found in Pritunl"));
}
