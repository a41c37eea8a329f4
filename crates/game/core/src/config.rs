/// Number of ticks every caster may spend within a single turn.
///
/// Ability step costs are expressed as fractions of this value
/// (`TICKS_PER_TURN / 2` for a quick strike, the full turn for a bandage).
pub const TICKS_PER_TURN: u32 = 4;

/// Where area-of-effect secondary targets are measured from.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AreaOrigin {
    /// Radius is centred on the primary target's location.
    #[default]
    Target,
    /// Radius is centred on the caster's location.
    Caster,
}

/// Rules configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesConfig {
    /// Tick budget each caster receives at the start of a turn.
    pub ticks_per_turn: u32,

    /// Centre used when selecting area-of-effect secondary targets.
    pub area_origin: AreaOrigin,

    /// Capacity of each event bus topic channel.
    pub event_capacity: usize,
}

impl RulesConfig {
    pub const DEFAULT_EVENT_CAPACITY: usize = 100;

    pub fn new() -> Self {
        Self {
            ticks_per_turn: TICKS_PER_TURN,
            area_origin: AreaOrigin::default(),
            event_capacity: Self::DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_ticks_per_turn(mut self, ticks_per_turn: u32) -> Self {
        self.ticks_per_turn = ticks_per_turn;
        self
    }

    pub fn with_area_origin(mut self, area_origin: AreaOrigin) -> Self {
        self.area_origin = area_origin;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self::new()
    }
}
