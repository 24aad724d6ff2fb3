use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::DevError;

/// Remove `path` recursively if it exists, then recreate it when `make` is set.
pub fn reset_dir(path: &Path, make: bool) -> Result<(), DevError> {
    match fs::remove_dir_all(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(DevError::DirRemove {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    if make {
        fs::create_dir_all(path).map_err(|source| DevError::DirCreate {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Deep copy `src` into `dst`. Symlinks are followed, so a linked directory
/// is copied as a directory.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<(), DevError> {
    fs::create_dir_all(dst).map_err(|source| DevError::DirCreate {
        path: dst.to_path_buf(),
        source,
    })?;

    for entry in walkdir::WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| DevError::FileRead {
            path: src.to_path_buf(),
            source: e.into(),
        })?;

        let relative = match entry.path().strip_prefix(src) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| DevError::DirCreate {
                path: target.clone(),
                source,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|source| DevError::FileCopy {
                from: entry.path().to_path_buf(),
                to: target.clone(),
                source,
            })?;
        }
    }
    Ok(())
}
