//! Rules configuration loader.

use std::path::Path;

use anyhow::Context;
use rules_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_RULES: &str = include_str!("../../data/rules.toml");

/// Loader for rules configuration from TOML files.
///
/// Missing keys fall back to [`RulesConfig::default`].
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Configuration compiled into this crate.
    pub fn load_embedded() -> LoadResult<RulesConfig> {
        Self::parse(EMBEDDED_RULES).context("embedded rules.toml")
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        let config: RulesConfig =
            toml::from_str(content).context("failed to parse rules TOML")?;

        if config.ticks_per_turn == 0 {
            anyhow::bail!("ticks_per_turn must be at least 1");
        }

        tracing::debug!(
            ticks_per_turn = config.ticks_per_turn,
            area_origin = %config.area_origin,
            "loaded rules configuration"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rules_core::AreaOrigin;

    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(ConfigLoader::load_embedded().unwrap(), RulesConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "area_origin = \"caster\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.area_origin, AreaOrigin::Caster);
        assert_eq!(config.ticks_per_turn, rules_core::TICKS_PER_TURN);
    }

    #[test]
    fn rejects_zero_tick_turns_and_unknown_origins() {
        assert!(ConfigLoader::parse("ticks_per_turn = 0").is_err());
        assert!(ConfigLoader::parse("area_origin = \"sky\"").is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.toml"));
    }
}
