//! Drives an external JavaScript bundler over one module entry point.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::DevError;
use crate::model::BundlerKind;

/// Global the esbuild IIFE assigns the entry module's exports to.
const ESBUILD_GLOBAL: &str = "__ms2Module";

pub struct BundleRequest<'a> {
    /// Module name, used for error reporting.
    pub module: &'a str,
    pub entry: &'a Path,
    pub out_dir: &'a Path,
    pub out_file: &'a str,
}

impl BundleRequest<'_> {
    pub fn out_path(&self) -> PathBuf {
        self.out_dir.join(self.out_file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutput {
    pub path: PathBuf,
    /// JavaScript expression that, appended to the bundle, evaluates to the
    /// entry module's default export.
    pub export_expression: String,
}

pub trait Bundler: Send + Sync {
    /// Bundle `request.entry` into a single minified script at `request.out_path()`.
    fn bundle(&self, request: &BundleRequest<'_>) -> Result<BundleOutput, DevError>;
}

/// A bundler invoked through its command-line interface.
#[derive(Debug, Clone)]
pub struct CommandBundler {
    kind: BundlerKind,
    program: PathBuf,
}

impl CommandBundler {
    pub fn new(kind: BundlerKind, program: PathBuf) -> Self {
        Self { kind, program }
    }

    /// Find the bundler binary: an explicit path wins, then `PATH`, then the
    /// watched directory's `node_modules/.bin`.
    pub fn locate(
        kind: BundlerKind,
        explicit: Option<&Path>,
        source: &Path,
    ) -> Result<Self, DevError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(DevError::BundlerNotFound(path.display().to_string()));
            }
            return Ok(Self::new(kind, path.to_path_buf()));
        }

        if let Ok(path) = which::which(kind.program()) {
            return Ok(Self::new(kind, path));
        }

        let local = source.join("node_modules").join(".bin").join(kind.program());
        if local.exists() {
            return Ok(Self::new(kind, local));
        }

        Err(DevError::BundlerNotFound(kind.program().to_string()))
    }

    pub fn kind(&self) -> BundlerKind {
        self.kind
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn args(&self, request: &BundleRequest<'_>) -> Vec<OsString> {
        match self.kind {
            BundlerKind::Parcel => vec![
                "build".into(),
                request.entry.into(),
                "--out-dir".into(),
                request.out_dir.into(),
                "--out-file".into(),
                request.out_file.into(),
                "--no-source-maps".into(),
                "--log-level".into(),
                "1".into(),
            ],
            BundlerKind::Esbuild => {
                let mut outfile = OsString::from("--outfile=");
                outfile.push(request.out_path());
                vec![
                    request.entry.into(),
                    "--bundle".into(),
                    "--minify".into(),
                    "--format=iife".into(),
                    format!("--global-name={ESBUILD_GLOBAL}").into(),
                    outfile,
                    "--log-level=error".into(),
                ]
            }
        }
    }

    fn export_expression(&self, request: &BundleRequest<'_>) -> String {
        match self.kind {
            BundlerKind::Parcel => {
                let basename = request
                    .entry
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("parcelRequire('{basename}').default")
            }
            BundlerKind::Esbuild => format!("{ESBUILD_GLOBAL}.default"),
        }
    }
}

impl Bundler for CommandBundler {
    fn bundle(&self, request: &BundleRequest<'_>) -> Result<BundleOutput, DevError> {
        let args = self.args(request);
        debug!(program = %self.program.display(), ?args, "invoking bundler");

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|_| DevError::BundlerNotFound(self.program.display().to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("{} exited with {}", self.kind, output.status)
            } else {
                stderr
            };
            return Err(DevError::BundleFailed {
                module: request.module.to_string(),
                reason,
            });
        }

        Ok(BundleOutput {
            path: request.out_path(),
            export_expression: self.export_expression(request),
        })
    }
}
