use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BundlerKind {
    /// Parcel v1 (`parcel build`), the bundler the module format was designed around.
    #[default]
    Parcel,
    /// esbuild emitting an IIFE bound to a global.
    Esbuild,
}

impl BundlerKind {
    pub fn program(self) -> &'static str {
        match self {
            Self::Parcel => "parcel",
            Self::Esbuild => "esbuild",
        }
    }
}

impl std::fmt::Display for BundlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parcel => write!(f, "parcel"),
            Self::Esbuild => write!(f, "esbuild"),
        }
    }
}

/// How declared descriptor tags combine with tags inferred from the bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TagMergePolicy {
    /// Declared tags first, then inferred ones not already present.
    #[default]
    Union,
    DeclaredOnly,
    InferredOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagRule {
    pub tag: String,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevConfig {
    #[serde(default)]
    pub bundler: BundlerKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundler_path: Option<PathBuf>,
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_meta_name")]
    pub meta_name: String,
    #[serde(default = "default_meta_description")]
    pub meta_description: String,
    #[serde(default)]
    pub tag_merge: TagMergePolicy,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_rules: Vec<TagRule>,
    #[serde(default)]
    pub skip_failed_modules: bool,
}

fn default_repo() -> String {
    "GooseMod/MS2Builder".to_string()
}

fn default_meta_name() -> String {
    "MS2Builder Dev Repo".to_string()
}

fn default_meta_description() -> String {
    "Local repo for testing, generated by MS2Builder Dev".to_string()
}

impl Default for DevConfig {
    fn default() -> Self {
        Self {
            bundler: BundlerKind::default(),
            bundler_path: None,
            repo: default_repo(),
            meta_name: default_meta_name(),
            meta_description: default_meta_description(),
            tag_merge: TagMergePolicy::default(),
            tag_rules: Vec::new(),
            skip_failed_modules: false,
        }
    }
}
