//! Ability catalog loader.
//!
//! Abilities are authored as a RON map keyed by ability id. The key becomes
//! the ability's `id`; the catalog is validated as a whole before it is
//! handed out. Keys are kept in authored order, so a repeated key reaches the
//! catalog and is rejected there instead of silently replacing the first.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use rules_core::{Ability, AbilityCatalog, AbilityId, RulesConfig};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::loaders::{LoadResult, read_file};

const EMBEDDED_ABILITIES: &str = include_str!("../../data/abilities.ron");

/// Loader for the ability catalog from RON files.
pub struct AbilityCatalogLoader;

impl AbilityCatalogLoader {
    /// Builds the catalog compiled into this crate.
    pub fn load_embedded(config: &RulesConfig) -> LoadResult<AbilityCatalog> {
        Self::parse(EMBEDDED_ABILITIES, config).context("embedded abilities.ron")
    }

    /// Builds a catalog from a RON file.
    pub fn load(path: &Path, config: &RulesConfig) -> LoadResult<AbilityCatalog> {
        let content = read_file(path)?;
        Self::parse(&content, config).with_context(|| format!("in {}", path.display()))
    }

    /// Parses RON ability definitions and validates them into a catalog.
    pub fn parse(content: &str, config: &RulesConfig) -> LoadResult<AbilityCatalog> {
        let abilities = Self::parse_definitions(content)?;
        let count = abilities.len();
        let catalog =
            AbilityCatalog::build(abilities, config).context("invalid ability definitions")?;

        tracing::info!(abilities = count, "loaded ability catalog");
        Ok(catalog)
    }

    /// Parses definitions without validating them, in authored order.
    pub fn parse_definitions(content: &str) -> LoadResult<Vec<Ability>> {
        let authored: AuthoredAbilities =
            ron::from_str(content).context("failed to parse ability RON")?;

        Ok(authored
            .0
            .into_iter()
            .map(|(id, mut ability)| {
                ability.id = AbilityId::new(id);
                ability
            })
            .collect())
    }
}

/// Map entries in file order, duplicates included.
struct AuthoredAbilities(Vec<(String, Ability)>);

impl<'de> Deserialize<'de> for AuthoredAbilities {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = AuthoredAbilities;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of ability id to ability definition")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::new();
                while let Some(entry) = map.next_entry::<String, Ability>()? {
                    entries.push(entry);
                }
                Ok(AuthoredAbilities(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
