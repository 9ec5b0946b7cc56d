//! Per-movement-class reachability grids seeded from one origin square.

use std::collections::VecDeque;

use roomsim_core::{MovementType, RoomDimensions, Square};

use crate::grid::Grid;

/// Dense step-count grid for one movement class.
///
/// Distances come from an 8-connected breadth-first flood out of the origin.
/// Squares the class cannot reach hold `u16::MAX`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathMap {
    movement: MovementType,
    origin: Square,
    dimensions: RoomDimensions,
    distances: Vec<u16>,
}

impl PathMap {
    fn build(grid: &Grid, movement: MovementType, origin: Square) -> Self {
        let dimensions = grid.dimensions();
        let mut distances = vec![u16::MAX; dimensions.square_count()];
        let mut queue = VecDeque::new();

        if let Some(index) = dimensions.index(origin) {
            distances[index] = 0;
            queue.push_back(origin);
        }

        while let Some(square) = queue.pop_front() {
            let Some(current) = dimensions.index(square).map(|index| distances[index]) else {
                continue;
            };
            if current >= u16::MAX.saturating_sub(1) {
                continue;
            }
            let next = current + 1;

            for neighbor in dimensions.neighbors(square) {
                let Some(cell) = grid.cell(neighbor) else {
                    continue;
                };
                if !movement.permits(cell.opaque, cell.overlay) {
                    continue;
                }
                let Some(index) = dimensions.index(neighbor) else {
                    continue;
                };
                if distances[index] <= next {
                    continue;
                }
                distances[index] = next;
                queue.push_back(neighbor);
            }
        }

        Self {
            movement,
            origin,
            dimensions,
            distances,
        }
    }

    /// Movement class the map was built for.
    #[must_use]
    pub fn movement(&self) -> MovementType {
        self.movement
    }

    /// Square the flood started from.
    #[must_use]
    pub fn origin(&self) -> Square {
        self.origin
    }

    /// Dimensions of the room when the map was built.
    #[must_use]
    pub fn dimensions(&self) -> RoomDimensions {
        self.dimensions
    }

    /// Row-major distances.
    #[must_use]
    pub fn cells(&self) -> &[u16] {
        &self.distances
    }

    /// Stored distance of the square, `u16::MAX` when unreachable.
    #[must_use]
    pub fn distance(&self, square: Square) -> Option<u16> {
        self.dimensions
            .index(square)
            .and_then(|index| self.distances.get(index).copied())
    }

    /// Steps from the square to the origin, if reachable.
    #[must_use]
    pub fn steps(&self, square: Square) -> Option<u16> {
        self.distance(square).filter(|distance| *distance != u16::MAX)
    }
}

/// One lazily built map per movement class; any edit drops them all.
#[derive(Clone, Debug, Default)]
pub(crate) struct PathMapCache {
    maps: [Option<PathMap>; 3],
}

impl PathMapCache {
    pub(crate) fn invalidate_all(&mut self) {
        self.maps = Default::default();
    }

    pub(crate) fn get(&self, movement: MovementType) -> Option<&PathMap> {
        self.maps[movement.index()].as_ref()
    }

    /// Returns the map for the class, rebuilding it when missing or seeded elsewhere.
    pub(crate) fn ensure(&mut self, grid: &Grid, movement: MovementType, origin: Square) -> &PathMap {
        let slot = &mut self.maps[movement.index()];
        if slot.as_ref().is_some_and(|map| map.origin != origin) {
            *slot = None;
        }
        slot.get_or_insert_with(|| PathMap::build(grid, movement, origin))
    }
}
