use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DevError;
use crate::model::DevConfig;

/// Config file looked up in the watched directory when none is given.
pub const CONFIG_FILE: &str = "ms2dev.toml";

/// Load the config from `explicit`, else from `<source>/ms2dev.toml`, else defaults.
pub fn load_config(explicit: Option<&Path>, source: &Path) -> Result<DevConfig, DevError> {
    let path: PathBuf = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let candidate = source.join(CONFIG_FILE);
            if !candidate.exists() {
                return Ok(DevConfig::default());
            }
            candidate
        }
    };

    let content = fs::read_to_string(&path).map_err(|source| DevError::FileRead {
        path: path.clone(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| DevError::ConfigParse { path, source })
}
