use predicates::prelude::*;

use crate::common::TestEnv;

#[test]
fn help_lists_positional_arguments() {
    let env = TestEnv::new();

    env.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<DIR>"))
        .stdout(predicate::str::contains("[PORT]"))
        .stdout(predicate::str::contains("--once"));
}

#[test]
fn port_is_required_without_once() {
    let env = TestEnv::new();

    env.cmd()
        .arg("modules")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<PORT>"));
}

#[test]
fn port_must_be_a_number() {
    let env = TestEnv::new();

    env.cmd()
        .args(["modules", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn missing_source_dir_fails() {
    let env = TestEnv::new();

    env.cmd()
        .args(["does-not-exist", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("source directory does not exist"));
}

#[test]
fn output_inside_source_is_rejected() {
    let env = TestEnv::new();

    env.cmd()
        .args(["modules", "--once", "--out-dir", "modules/dist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("overlaps the watched directory"));
}

#[test]
fn unknown_bundler_kind_is_rejected() {
    let env = TestEnv::new();

    env.cmd()
        .args(["modules", "--once", "--bundler", "webpack"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'webpack'"));
}

#[test]
fn missing_bundler_binary_fails() {
    let env = TestEnv::new();

    env.cmd()
        .args(["modules", "--once", "--bundler-path", "/nonexistent/parcel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not installed"));
}

#[test]
fn malformed_config_fails() {
    let env = TestEnv::new();
    std::fs::write(env.source_dir().join("ms2dev.toml"), "tag_merge = 3\n").unwrap();

    env.cmd()
        .args(["modules", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}
