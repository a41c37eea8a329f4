//! Authorable ability content and rules configuration.
//!
//! This crate houses the static rules data and the loaders that turn it into
//! validated engine inputs:
//! - Ability catalog (data-driven via RON)
//! - Rules configuration (data-driven via TOML)
//!
//! The default catalog and configuration are embedded at compile time; hosts
//! can point a [`ContentFactory`] at a directory to override both.
//!
//! All loaders use rules-core types directly with serde for RON/TOML
//! deserialization.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{AbilityCatalogLoader, ConfigLoader, Content, ContentFactory, LoadResult};
