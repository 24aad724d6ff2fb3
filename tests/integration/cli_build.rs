use predicates::prelude::*;
use sha2::{Digest, Sha512};
use std::fs;

use crate::common::TestEnv;

const FOO: &str = r#"{"name":"Foo","description":"d","version":"1.0","main":"index.js"}"#;

fn sha512_hex(text: &str) -> String {
    format!("{:x}", Sha512::digest(text.as_bytes()))
}

#[test]
fn once_builds_index_and_bundle() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "export default {};");
    let stub = env.esbuild_stub();

    env.build_once("esbuild", &stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("Built 1 module(s)"))
        .stdout(predicate::str::contains("Foo"));

    let bundle = fs::read_to_string(env.out_dir().join("module/Foo.js")).unwrap();
    assert_eq!(bundle, "export default {};;__ms2Module.default");

    let index = env.read_index();
    let entry = &index["modules"][0];
    let keys: Vec<&str> = entry
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        ["name", "description", "version", "tags", "hash", "github"]
    );
    assert_eq!(entry["hash"], sha512_hex(&bundle));
    assert_eq!(entry["github"]["stars"], 0);
    assert_eq!(entry["github"]["repo"], "GooseMod/MS2Builder");
    assert_eq!(index["meta"]["name"], "MS2Builder Dev Repo");
    assert_eq!(
        index["meta"]["description"],
        "Local repo for testing, generated by MS2Builder Dev"
    );
}

#[test]
fn parcel_output_returns_default_export_through_registry() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "1");
    let stub = env.parcel_stub();

    env.build_once("parcel", &stub).assert().success();

    let bundle = fs::read_to_string(env.out_dir().join("module/Foo.js")).unwrap();
    assert_eq!(bundle, "1;parcelRequire('index.js').default");
}

#[test]
fn optional_descriptor_fields_are_carried() {
    let env = TestEnv::new();
    env.create_module(
        "bar",
        r#"{
            "name": "Bar",
            "description": "Bar module",
            "version": "2.1.0",
            "main": "index.js",
            "tags": ["fun"],
            "authors": ["123456"],
            "images": ["https://example.com/shot.png"],
            "dependencies": ["Foo"]
        }"#,
        "localStorage.setItem('a','b')",
    );
    let stub = env.esbuild_stub();

    env.build_once("esbuild", &stub).assert().success();

    let entry = &env.read_index()["modules"][0];
    assert_eq!(entry["tags"], serde_json::json!(["fun", "storage"]));
    assert_eq!(entry["authors"], serde_json::json!(["123456"]));
    assert_eq!(entry["images"], serde_json::json!(["https://example.com/shot.png"]));
    assert_eq!(entry["dependencies"], serde_json::json!(["Foo"]));
}

#[test]
fn rebuild_replaces_previous_output() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "1");
    let stub = env.esbuild_stub();
    fs::create_dir_all(env.out_dir().join("module")).unwrap();
    fs::write(env.out_dir().join("module/Stale.js"), "old").unwrap();
    fs::write(env.out_dir().join("leftover.txt"), "old").unwrap();

    env.build_once("esbuild", &stub).assert().success();

    assert!(env.out_dir().join("module/Foo.js").exists());
    assert!(!env.out_dir().join("module/Stale.js").exists());
    assert!(!env.out_dir().join("leftover.txt").exists());
    assert!(env.work_dir.path().join("devTemp/foo/index.js").exists());
}

#[test]
fn config_file_overrides_index_metadata() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "1");
    fs::write(
        env.source_dir().join("ms2dev.toml"),
        r#"
repo = "me/my-modules"
meta_name = "My Repo"
tag_merge = "declared_only"
"#,
    )
    .unwrap();
    let stub = env.esbuild_stub();

    env.build_once("esbuild", &stub).assert().success();

    let index = env.read_index();
    assert_eq!(index["meta"]["name"], "My Repo");
    assert_eq!(index["modules"][0]["github"]["repo"], "me/my-modules");
    assert_eq!(index["modules"][0]["tags"], serde_json::json!([]));
}

#[test]
fn bundler_failure_aborts_the_build() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "(");
    let stub = env.write_script("broken-bundler", "echo 'Unexpected token (1:1)' >&2\nexit 1");

    env.build_once("esbuild", &stub)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bundling 'Foo' failed"))
        .stderr(predicate::str::contains("Unexpected token"));

    assert!(!env.out_dir().join("modules.json").exists());
}

#[test]
fn skip_policy_builds_the_rest() {
    let env = TestEnv::new();
    env.create_module("foo", FOO, "1");
    env.create_module("broken", "{ not json", "1");
    fs::write(
        env.source_dir().join("ms2dev.toml"),
        "skip_failed_modules = true\n",
    )
    .unwrap();
    let stub = env.esbuild_stub();

    env.build_once("esbuild", &stub)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipped"));

    let index = env.read_index();
    assert_eq!(index["modules"].as_array().unwrap().len(), 1);
    assert_eq!(index["modules"][0]["name"], "Foo");
}
