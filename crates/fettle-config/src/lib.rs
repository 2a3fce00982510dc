//! Configuration and filesystem collaborators for fettle
//!
//! - [`ProjectConfig`]: the project's `.claude/fettle.toml`
//! - [`DirProfileStore`]: named profiles under `<fettle-home>/profiles`
//! - [`GlobalConfig`]: marketplaces every project should have available
//! - [`FettlePaths`]: where all of the above, and Claude's own files, live

pub mod context;
pub mod error;
pub mod global;
pub mod paths;
pub mod profiles;
pub mod project;

pub use context::{ProjectContext, find_config_path, resolve_project_root};
pub use error::{Error, Result};
pub use global::GlobalConfig;
pub use paths::FettlePaths;
pub use profiles::DirProfileStore;
pub use project::{PROJECT_CONFIG_PATH, ProjectConfig};
