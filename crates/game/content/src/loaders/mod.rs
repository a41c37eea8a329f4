//! Content loaders for reading rules data from files.
//!
//! Every loader has an embedded variant (data compiled into the crate) and a
//! path-based variant for hosts that ship their own content.

pub mod abilities;
pub mod config;
pub mod factory;

pub use abilities::AbilityCatalogLoader;
pub use config::ConfigLoader;
pub use factory::{Content, ContentFactory};

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
