use serde::{Deserialize, Serialize};
use serde_json::Value;

/// File name that marks a directory as a module root.
pub const DESCRIPTOR_FILE: &str = "goosemodModule.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub description: String,
    pub version: String,
    /// Entry point, relative to the module directory.
    pub main: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Value>,
}

impl ModuleDescriptor {
    pub fn declared_tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}
