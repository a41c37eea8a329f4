//! Content factory for loading a complete rules bundle from a directory.

use std::path::{Path, PathBuf};

use rules_core::{AbilityCatalog, RulesConfig};

use crate::loaders::{AbilityCatalogLoader, ConfigLoader, LoadResult};

/// Validated configuration and the catalog built against it.
#[derive(Clone, Debug)]
pub struct Content {
    pub config: RulesConfig,
    pub catalog: AbilityCatalog,
}

impl Content {
    /// Content compiled into this crate.
    pub fn embedded() -> LoadResult<Self> {
        let config = ConfigLoader::load_embedded()?;
        let catalog = AbilityCatalogLoader::load_embedded(&config)?;
        Ok(Self { config, catalog })
    }
}

/// Content factory that loads rules content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// └── abilities.ron
/// ```
///
/// Missing files fall back to the embedded defaults.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const RULES_FILE: &'static str = "rules.toml";
    pub const ABILITIES_FILE: &'static str = "abilities.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load rules configuration from `rules.toml`.
    pub fn load_config(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join(Self::RULES_FILE);
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            tracing::debug!(path = %path.display(), "no rules file, using embedded rules");
            ConfigLoader::load_embedded()
        }
    }

    /// Load the ability catalog from `abilities.ron`, validated against `config`.
    pub fn load_catalog(&self, config: &RulesConfig) -> LoadResult<AbilityCatalog> {
        let path = self.data_dir.join(Self::ABILITIES_FILE);
        if path.exists() {
            AbilityCatalogLoader::load(&path, config)
        } else {
            tracing::debug!(path = %path.display(), "no ability file, using embedded catalog");
            AbilityCatalogLoader::load_embedded(config)
        }
    }

    /// Load configuration, then the catalog built against it.
    pub fn load(&self) -> LoadResult<Content> {
        let config = self.load_config()?;
        let catalog = self.load_catalog(&config)?;
        Ok(Content { config, catalog })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
