pub mod config;
pub mod descriptor;
pub mod index;

pub use config::{BundlerKind, DevConfig, TagMergePolicy, TagRule};
pub use descriptor::{DESCRIPTOR_FILE, ModuleDescriptor};
pub use index::{IndexEntry, IndexMeta, ModuleIndex};
