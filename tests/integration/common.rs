use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct TestEnv {
    pub work_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            work_dir: TempDir::new().expect("failed to create work_dir"),
        };
        fs::create_dir_all(env.source_dir()).unwrap();
        env
    }

    /// Directory holding the modules, passed as the first argument.
    pub fn source_dir(&self) -> PathBuf {
        self.work_dir.path().join("modules")
    }

    pub fn out_dir(&self) -> PathBuf {
        self.work_dir.path().join("devDist")
    }

    /// Build an ms2dev Command with cwd = work_dir.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ms2dev"));
        cmd.current_dir(self.work_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("MS2DEV_CONFIG")
            .env_remove("MS2DEV_BUNDLER")
            .env_remove("MS2DEV_BUNDLER_PATH");
        cmd
    }

    /// Shorthand: `ms2dev modules --once --bundler <kind> --bundler-path <stub>`.
    pub fn build_once(&self, kind: &str, bundler: &Path) -> Command {
        let mut cmd = self.cmd();
        cmd.arg("modules")
            .arg("--once")
            .args(["--bundler", kind])
            .arg("--bundler-path")
            .arg(bundler);
        cmd
    }

    /// Create a module with a descriptor and an `index.js` entry point.
    /// Structure:
    ///   modules/<dir>/
    ///     goosemodModule.json
    ///     index.js
    pub fn create_module(&self, dir: &str, descriptor: &str, code: &str) -> PathBuf {
        let root = self.source_dir().join(dir);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("goosemodModule.json"), descriptor).unwrap();
        fs::write(root.join("index.js"), code).unwrap();
        root
    }

    /// Write an executable shell script into work_dir and return its path.
    #[cfg(unix)]
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.work_dir.path().join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// A stand-in for esbuild: copies the entry to `--outfile=`.
    #[cfg(unix)]
    pub fn esbuild_stub(&self) -> PathBuf {
        self.write_script(
            "esbuild-stub",
            r#"entry="$1"
for arg in "$@"; do
  case "$arg" in
    --outfile=*) out="${arg#--outfile=}" ;;
  esac
done
cp "$entry" "$out""#,
        )
    }

    /// A stand-in for `parcel build <entry> --out-dir <d> --out-file <f> ...`.
    #[cfg(unix)]
    pub fn parcel_stub(&self) -> PathBuf {
        self.write_script("parcel-stub", r#"cp "$2" "$4/$6""#)
    }

    pub fn read_index(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.out_dir().join("modules.json"))
            .expect("modules.json should exist");
        serde_json::from_str(&raw).expect("modules.json should be valid JSON")
    }
}
