pub mod config;
pub mod fs;
pub mod workspace;

pub use config::load_config;
pub use fs::{copy_dir_recursive, reset_dir};
pub use workspace::{Workspace, discover_modules};
