use serde::{Deserialize, Serialize};

use crate::RoomDimensions;

/// Engine-wide tunables, constructed once and handed to every room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Columns of freshly created rooms.
    pub columns: u32,
    /// Rows of freshly created rooms.
    pub rows: u32,
    /// Turns between tar growth rings; zero disables growth.
    pub tar_growth_interval: u32,
    /// Turns between serpent growth; zero disables growth.
    pub serpent_growth_interval: u32,
    /// Runs the invariant validator at the end of every turn.
    pub validate_each_turn: bool,
}

impl EngineConfig {
    /// Default room width in squares.
    pub const DEFAULT_COLUMNS: u32 = 38;
    /// Default room height in squares.
    pub const DEFAULT_ROWS: u32 = 32;
    /// Default tar growth period in turns.
    pub const DEFAULT_TAR_GROWTH_INTERVAL: u32 = 20;
    /// Serpents never grow unless configured.
    pub const DEFAULT_SERPENT_GROWTH_INTERVAL: u32 = 0;

    /// Creates the default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            columns: Self::DEFAULT_COLUMNS,
            rows: Self::DEFAULT_ROWS,
            tar_growth_interval: Self::DEFAULT_TAR_GROWTH_INTERVAL,
            serpent_growth_interval: Self::DEFAULT_SERPENT_GROWTH_INTERVAL,
            validate_each_turn: true,
        }
    }

    /// Dimensions used for new rooms.
    #[must_use]
    pub const fn dimensions(&self) -> RoomDimensions {
        RoomDimensions::new(self.columns, self.rows)
    }

    /// Reports whether the turn falls on a positive multiple of the interval.
    #[must_use]
    pub const fn is_interval_turn(interval: u32, turn: u32) -> bool {
        interval != 0 && turn != 0 && turn % interval == 0
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
