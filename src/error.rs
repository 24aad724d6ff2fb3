use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DevError {
    #[error("failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create directory: {path}")]
    DirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to remove directory: {path}")]
    DirRemove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to move {from} to {to}")]
    DirRename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}")]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source directory does not exist: {0}")]
    SourceNotFound(PathBuf),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("failed to parse module descriptor {path}")]
    DescriptorParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid module name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("failed to serialize module index: {0}")]
    IndexSerialize(#[from] serde_json::Error),

    #[error("bundler '{0}' is not installed or not in PATH")]
    BundlerNotFound(String),

    #[error("bundling '{module}' failed: {reason}")]
    BundleFailed { module: String, reason: String },

    #[error("bundler produced no output for '{module}' at {path}")]
    BundleMissing { module: String, path: PathBuf },

    #[error("failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{kind} directory {path} overlaps the watched directory")]
    WorkDirOverlapsSource { kind: &'static str, path: PathBuf },

    #[error("file watcher failed: {0}")]
    Watch(#[from] notify::Error),
}

impl DevError {
    /// This error and its sources joined with `: `.
    pub fn chain(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
