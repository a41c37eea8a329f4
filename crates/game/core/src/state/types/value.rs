//! Named entity state and the values stored in it.

use std::fmt;

use super::common::Position;

/// Key into an entity's named state.
///
/// [`StateKey::LOCATION`] (`"loc"`) addresses the entity's map position; every
/// other key addresses the open-ended named-state map.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StateKey(String);

impl StateKey {
    pub const LOCATION: &'static str = "loc";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn location() -> Self {
        Self(Self::LOCATION.to_string())
    }

    pub fn is_location(&self) -> bool {
        self.0 == Self::LOCATION
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// A value that can be written into (or read out of) entity state.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateValue {
    Int(i64),
    Text(String),
    Flag(bool),
    Location(Position),
}

impl StateValue {
    /// Short type name used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Text(_) => "text",
            Self::Flag(_) => "flag",
            Self::Location(_) => "location",
        }
    }

    pub fn as_location(&self) -> Option<Position> {
        match self {
            Self::Location(position) => Some(*position),
            _ => None,
        }
    }
}

impl fmt::Display for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Location(position) => write!(f, "{position}"),
        }
    }
}
