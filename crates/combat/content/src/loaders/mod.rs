//! Content loaders for reading combat data from files.
//!
//! Every loader has a `load(path)` entry point and a `parse(str)` entry point
//! for embedded data.

pub mod config;
pub mod factory;
pub mod replay;
pub mod special;
pub mod weapon;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use replay::{ReplayAction, ReplayEntry, ReplayLoader, ReplayScript};
pub use special::SpecialLoader;
pub use weapon::WeaponLoader;

use std::path::Path;

use combat_core::DefinitionIssue;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Logs definition issues without failing the load.
pub(crate) fn report_issues(subject: &str, issues: &[DefinitionIssue]) {
    for issue in issues {
        tracing::warn!(subject, severity = issue.severity().as_str(), "{issue}");
    }
}
