use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use globset::Glob;

use crate::error::DevError;
use crate::model::DESCRIPTOR_FILE;

/// Subdirectory of the output root holding one script per module.
pub const MODULES_SUBDIR: &str = "module";
pub const INDEX_FILE: &str = "modules.json";

/// Directories a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct Workspace {
    source: PathBuf,
    scratch: PathBuf,
    out: PathBuf,
    staging: PathBuf,
}

impl Workspace {
    /// Resolve the three directories and refuse layouts where a build would
    /// write into, or wipe, the tree it watches.
    pub fn new(source: &Path, scratch: &Path, out: &Path) -> Result<Self, DevError> {
        let source = source
            .canonicalize()
            .map_err(|_| DevError::SourceNotFound(source.to_path_buf()))?;
        if !source.is_dir() {
            return Err(DevError::SourceNotFound(source));
        }

        let scratch = resolve(scratch);
        let out = resolve(out);
        for (kind, path) in [("scratch", &scratch), ("output", &out)] {
            if path.starts_with(&source) || source.starts_with(path) {
                return Err(DevError::WorkDirOverlapsSource {
                    kind,
                    path: path.clone(),
                });
            }
        }

        let mut staging_name = out
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("out"));
        staging_name.push(".staging");
        let staging = out.with_file_name(staging_name);

        Ok(Self {
            source,
            scratch,
            out,
            staging,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn scratch(&self) -> &Path {
        &self.scratch
    }

    /// Live output root served over HTTP.
    pub fn out(&self) -> &Path {
        &self.out
    }

    /// Output root a build populates before it is published.
    pub fn staging(&self) -> &Path {
        &self.staging
    }

    pub fn staging_modules(&self) -> PathBuf {
        self.staging.join(MODULES_SUBDIR)
    }
}

/// Find every module root (directory containing a descriptor) under `root`,
/// sorted by path.
pub fn discover_modules(root: &Path) -> Result<Vec<PathBuf>, DevError> {
    let matcher = Glob::new(&format!("**/{DESCRIPTOR_FILE}"))?.compile_matcher();
    let mut modules = Vec::new();

    for entry in walkdir::WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| DevError::FileRead {
            path: root.to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative) {
            if let Some(parent) = entry.path().parent() {
                modules.push(parent.to_path_buf());
            }
        }
    }

    modules.sort();
    Ok(modules)
}

/// Absolute form of `path` with the longest existing prefix canonicalized.
fn resolve(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_default().join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::ParentDir => {
                normalized.pop();
            }
            Component::CurDir => {}
            other => normalized.push(other),
        }
    }

    let mut existing = normalized.clone();
    let mut rest = Vec::new();
    while !existing.exists() {
        match existing.file_name() {
            Some(name) => rest.push(name.to_os_string()),
            None => break,
        }
        if !existing.pop() {
            break;
        }
    }

    let mut resolved = existing.canonicalize().unwrap_or(existing);
    for name in rest.into_iter().rev() {
        resolved.push(name);
    }
    resolved
}
