pub mod coordinator;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha512};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::bundler::{BundleRequest, Bundler};
use crate::error::DevError;
use crate::model::{
    DESCRIPTOR_FILE, DevConfig, IndexEntry, IndexMeta, ModuleDescriptor, ModuleIndex,
};
use crate::store::workspace::INDEX_FILE;
use crate::store::{Workspace, copy_dir_recursive, discover_modules, reset_dir};
use crate::tagger::Tagger;

pub use coordinator::BuildCoordinator;

/// Held for reading while a file is served, for writing while a build is published.
pub type OutputLock = Arc<RwLock<()>>;

#[derive(Debug, Clone)]
pub struct SkippedModule {
    pub dir: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub built: Vec<String>,
    pub skipped: Vec<SkippedModule>,
    pub elapsed: Duration,
}

pub struct Pipeline {
    workspace: Workspace,
    bundler: Arc<dyn Bundler>,
    tagger: Arc<dyn Tagger>,
    config: DevConfig,
    output_lock: OutputLock,
}

impl Pipeline {
    pub fn new(
        workspace: Workspace,
        bundler: Arc<dyn Bundler>,
        tagger: Arc<dyn Tagger>,
        config: DevConfig,
    ) -> Self {
        Self {
            workspace,
            bundler,
            tagger,
            config,
            output_lock: OutputLock::default(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn output_lock(&self) -> OutputLock {
        self.output_lock.clone()
    }

    /// Run one full build and publish it.
    ///
    /// Blocks on filesystem and bundler work; call it from a blocking thread,
    /// never directly from an async task.
    pub fn run(&self) -> Result<BuildReport, DevError> {
        let started = Instant::now();
        info!(source = %self.workspace.source().display(), "building");

        reset_dir(self.workspace.scratch(), false)?;
        copy_dir_recursive(self.workspace.source(), self.workspace.scratch())?;

        reset_dir(self.workspace.staging(), true)?;
        let modules_dir = self.workspace.staging_modules();
        reset_dir(&modules_dir, true)?;

        let mut index = ModuleIndex::new(IndexMeta {
            name: self.config.meta_name.clone(),
            description: self.config.meta_description.clone(),
        });
        let mut report = BuildReport::default();

        for dir in discover_modules(self.workspace.scratch())? {
            let module_started = Instant::now();
            match self.build_module(&dir, &modules_dir) {
                Ok(entry) => {
                    info!(
                        module = %entry.name,
                        elapsed_ms = module_started.elapsed().as_millis() as u64,
                        "built module"
                    );
                    if report.built.contains(&entry.name) {
                        warn!(
                            module = %entry.name,
                            "duplicate module name, earlier bundle overwritten"
                        );
                    }
                    report.built.push(entry.name.clone());
                    index.modules.push(entry);
                }
                Err(e) if self.config.skip_failed_modules => {
                    let reason = e.chain();
                    warn!(dir = %dir.display(), error = %reason, "skipping module");
                    report.skipped.push(SkippedModule { dir, reason });
                }
                Err(e) => return Err(e),
            }
        }

        let index_path = self.workspace.staging().join(INDEX_FILE);
        let json = serde_json::to_string(&index)?;
        fs::write(&index_path, json).map_err(|source| DevError::FileWrite {
            path: index_path,
            source,
        })?;

        self.publish()?;

        report.elapsed = started.elapsed();
        info!(
            built = report.built.len(),
            skipped = report.skipped.len(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "build complete"
        );
        Ok(report)
    }

    fn build_module(&self, dir: &Path, out_dir: &Path) -> Result<IndexEntry, DevError> {
        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        let raw = fs::read_to_string(&descriptor_path).map_err(|source| DevError::FileRead {
            path: descriptor_path.clone(),
            source,
        })?;
        let descriptor: ModuleDescriptor =
            serde_json::from_str(&raw).map_err(|source| DevError::DescriptorParse {
                path: descriptor_path,
                source,
            })?;
        validate_name(&descriptor.name)?;

        let out_file = format!("{}.js", descriptor.name);
        let out_path = out_dir.join(&out_file);
        // A bundle already on disk belongs to an earlier module of the same name.
        let existed = out_path.exists();
        let result = self.bundle_module(&descriptor, dir, out_dir, &out_file);
        if result.is_err() && !existed {
            let _ = fs::remove_file(&out_path);
        }
        result
    }

    fn bundle_module(
        &self,
        descriptor: &ModuleDescriptor,
        dir: &Path,
        out_dir: &Path,
        out_file: &str,
    ) -> Result<IndexEntry, DevError> {
        let entry = dir.join(&descriptor.main);
        let request = BundleRequest {
            module: &descriptor.name,
            entry: &entry,
            out_dir,
            out_file,
        };
        let output = self.bundler.bundle(&request)?;

        if !output.path.is_file() {
            return Err(DevError::BundleMissing {
                module: descriptor.name.clone(),
                path: output.path,
            });
        }
        let code = fs::read_to_string(&output.path).map_err(|source| DevError::FileRead {
            path: output.path.clone(),
            source,
        })?;

        let code = append_export(&code, &output.export_expression);
        fs::write(&output.path, &code).map_err(|source| DevError::FileWrite {
            path: output.path.clone(),
            source,
        })?;

        let hash = hash_bundle(&code);
        let tags = self.tagger.tags(&code, descriptor.declared_tags());
        debug!(module = %descriptor.name, hash = %&hash[..16], ?tags, "bundle finalized");

        Ok(IndexEntry::from_descriptor(
            descriptor,
            tags,
            hash,
            &self.config.repo,
        ))
    }

    /// Swap the staging root onto the live output root.
    fn publish(&self) -> Result<(), DevError> {
        let _guard = self.output_lock.blocking_write();
        reset_dir(self.workspace.out(), false)?;
        fs::rename(self.workspace.staging(), self.workspace.out()).map_err(|source| {
            DevError::DirRename {
                from: self.workspace.staging().to_path_buf(),
                to: self.workspace.out().to_path_buf(),
                source,
            }
        })?;
        Ok(())
    }
}

/// Make evaluating the bundle yield the entry module's default export.
pub fn append_export(code: &str, export_expression: &str) -> String {
    format!("{code};{export_expression}")
}

/// SHA-512 of the final bundle text, lowercase hex.
pub fn hash_bundle(code: &str) -> String {
    format!("{:x}", Sha512::digest(code.as_bytes()))
}

fn validate_name(name: &str) -> Result<(), DevError> {
    if name.trim().is_empty() {
        return Err(DevError::InvalidName {
            name: name.to_string(),
            reason: "name cannot be empty".to_string(),
        });
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(DevError::InvalidName {
            name: name.to_string(),
            reason: "name must not contain path separators or '..'".to_string(),
        });
    }
    Ok(())
}
