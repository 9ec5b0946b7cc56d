//! Physical door detection and the agent upkeep rules tied to door edits.

use std::collections::{BTreeSet, VecDeque};

use roomsim_core::{OpaqueTile, Square};
use tracing::debug;

use crate::{grid::Grid, Room};

/// Every square of the door containing `square`, sorted; empty when it is not a door.
pub(crate) fn door_squares(grid: &Grid, square: Square) -> Vec<Square> {
    if !grid.opaque(square).is_some_and(OpaqueTile::is_door) {
        return Vec::new();
    }
    let dimensions = grid.dimensions();
    let mut visited = BTreeSet::from([square]);
    let mut queue = VecDeque::from([square]);
    while let Some(current) = queue.pop_front() {
        for neighbor in dimensions.orthogonal_neighbors(current) {
            if grid.opaque(neighbor).is_some_and(OpaqueTile::is_door) && visited.insert(neighbor) {
                queue.push_back(neighbor);
            }
        }
    }
    visited.into_iter().collect()
}

impl Room {
    /// Brings a freshly plotted door tile in line with the door it joined.
    ///
    /// Every square of the merged door takes the plotted state, and each orb
    /// keeps only its first agent targeting the merged door.
    pub(crate) fn merge_door_at(&mut self, square: Square, tile: OpaqueTile) {
        let door = door_squares(&self.grid, square);
        for member in &door {
            if self.grid.opaque(*member) != Some(tile) {
                let _ = self.plot_opaque(*member, tile);
            }
        }
        let members: BTreeSet<Square> = door.into_iter().collect();
        let removed = self.orbs.dedupe_agents(&members);
        if removed > 0 {
            debug!(removed, "collapsed duplicate orb agents after door merge");
        }
    }

    /// Re-targets agents that pointed at a door square which is no longer a door.
    ///
    /// Each agent moves to an orthogonally adjacent square of the same former
    /// door when one remains; otherwise the agent is dropped.
    pub(crate) fn retarget_agents_from(&mut self, square: Square, former_door: &[Square]) {
        let replacement = self
            .dimensions()
            .orthogonal_neighbors(square)
            .find(|neighbor| {
                former_door.contains(neighbor)
                    && self.grid.opaque(*neighbor).is_some_and(OpaqueTile::is_door)
            });
        let (moved, dropped) = self.orbs.retarget_agents(square, replacement);
        if moved + dropped > 0 {
            debug!(moved, dropped, "orb agents updated after door removal");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomsim_core::RoomDimensions;

    #[test]
    fn door_flood_is_orthogonal_only() {
        let mut grid = Grid::new(RoomDimensions::new(4, 4));
        for square in [Square::new(1, 1), Square::new(1, 2), Square::new(2, 3)] {
            let _ = grid.set_opaque(square, OpaqueTile::DoorClosed).expect("in range");
        }
        let _ = grid.set_opaque(Square::new(2, 1), OpaqueTile::DoorOpen).expect("in range");

        assert_eq!(
            door_squares(&grid, Square::new(1, 2)),
            vec![Square::new(1, 1), Square::new(1, 2), Square::new(2, 1)]
        );
        assert_eq!(door_squares(&grid, Square::new(2, 3)), vec![Square::new(2, 3)]);
        assert!(door_squares(&grid, Square::new(0, 0)).is_empty());
    }
}
