//! Player position, facing and sword reach.

use roomsim_core::{Direction, PlayerSnapshot, RoomDimensions, Square};

/// The player and its sword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Player {
    pub(crate) square: Square,
    pub(crate) orientation: Direction,
    pub(crate) alive: bool,
}

impl Player {
    pub(crate) const fn new(square: Square, orientation: Direction) -> Self {
        Self {
            square,
            orientation,
            alive: true,
        }
    }

    /// Square covered by the sword, if it lies inside the room.
    pub(crate) fn sword(&self, dimensions: RoomDimensions) -> Option<Square> {
        dimensions.step(self.square, self.orientation)
    }

    pub(crate) fn snapshot(&self, dimensions: RoomDimensions) -> PlayerSnapshot {
        PlayerSnapshot {
            square: self.square,
            orientation: self.orientation,
            sword: self.sword(dimensions),
        }
    }
}
