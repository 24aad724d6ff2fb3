use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::descriptor::ModuleDescriptor;

/// The aggregate `modules.json` document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleIndex {
    pub modules: Vec<IndexEntry>,
    pub meta: IndexMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexMeta {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GithubInfo {
    pub stars: u32,
    pub repo: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Value>,
    pub hash: String,
    pub github: GithubInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
}

impl ModuleIndex {
    pub fn new(meta: IndexMeta) -> Self {
        Self {
            modules: Vec::new(),
            meta,
        }
    }
}

impl IndexEntry {
    pub fn from_descriptor(
        descriptor: &ModuleDescriptor,
        tags: Vec<String>,
        hash: String,
        repo: &str,
    ) -> Self {
        Self {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            version: descriptor.version.clone(),
            tags,
            authors: descriptor.authors.clone(),
            hash,
            github: GithubInfo {
                stars: 0,
                repo: repo.to_string(),
            },
            images: descriptor.images.clone(),
            dependencies: descriptor.dependencies.clone(),
        }
    }
}
