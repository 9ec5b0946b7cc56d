//! Flood repair of staircases after one of their squares is deleted.

use std::collections::{BTreeSet, VecDeque};

use roomsim_core::{ExitRecord, GridError, OpaqueTile, Square};
use tracing::debug;

use crate::Room;

/// Outcome of a staircase repair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StaircaseRepair {
    /// Stair squares turned back into floor, sorted.
    pub removed_stairs: Vec<Square>,
    /// Bordering wall squares left orphaned and turned into floor, sorted.
    pub removed_walls: Vec<Square>,
    /// Exit region that belonged to the removed staircase.
    pub removed_exit: Option<ExitRecord>,
}

impl Room {
    /// Removes the staircase touching `square` together with its exit and orphaned walls.
    ///
    /// Only stair squares sharing the exit region of `square` are flooded, so a
    /// distinct staircase that merely touches this one survives. Walls on the
    /// room border are never removed, and nothing changes when `square` has no
    /// staircase around it.
    pub(crate) fn fix_corrupt_staircase(
        &mut self,
        square: Square,
    ) -> Result<StaircaseRepair, GridError> {
        self.check(square)?;
        let identity = self.exits.at(square).map(|(index, _)| index);
        let dimensions = self.dimensions();
        let belongs = |room: &Room, candidate: Square| {
            room.grid.opaque(candidate) == Some(OpaqueTile::Stairs)
                && room.exits.at(candidate).map(|(index, _)| index) == identity
        };

        let mut stairs = BTreeSet::new();
        let mut queue = VecDeque::new();
        for seed in std::iter::once(square).chain(dimensions.orthogonal_neighbors(square)) {
            if belongs(self, seed) && stairs.insert(seed) {
                queue.push_back(seed);
            }
        }
        while let Some(current) = queue.pop_front() {
            for neighbor in dimensions.orthogonal_neighbors(current) {
                if belongs(self, neighbor) && stairs.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        if stairs.is_empty() {
            return Ok(StaircaseRepair::default());
        }

        let candidates: BTreeSet<Square> = stairs
            .iter()
            .flat_map(|removed| dimensions.neighbors(*removed))
            .filter(|neighbor| {
                self.grid.opaque(*neighbor) == Some(OpaqueTile::Wall)
                    && !dimensions.is_border(*neighbor)
            })
            .collect();
        let walls = self.orphaned_walls(&candidates, &stairs);

        for stair in &stairs {
            let _ = self.plot_opaque(*stair, OpaqueTile::Floor)?;
        }
        for wall in &walls {
            let _ = self.plot_opaque(*wall, OpaqueTile::Floor)?;
        }
        let removed_exit = identity.and_then(|index| self.exits.remove(index));

        debug!(
            stairs = stairs.len(),
            walls = walls.len(),
            exit_removed = removed_exit.is_some(),
            "staircase repaired"
        );
        Ok(StaircaseRepair {
            removed_stairs: stairs.into_iter().collect(),
            removed_walls: walls,
            removed_exit,
        })
    }

    /// Bordering walls whose connected wall group stays inside `candidates`.
    ///
    /// A group touching any other wall, or a stair outside `stairs`, is kept whole.
    fn orphaned_walls(
        &self,
        candidates: &BTreeSet<Square>,
        stairs: &BTreeSet<Square>,
    ) -> Vec<Square> {
        let dimensions = self.dimensions();
        let mut visited = BTreeSet::new();
        let mut orphaned = Vec::new();
        for start in candidates {
            if !visited.insert(*start) {
                continue;
            }
            let mut group = vec![*start];
            let mut queue = VecDeque::from([*start]);
            let mut anchored = false;
            while let Some(current) = queue.pop_front() {
                for neighbor in dimensions.neighbors(current) {
                    if candidates.contains(&neighbor) {
                        if visited.insert(neighbor) {
                            group.push(neighbor);
                            queue.push_back(neighbor);
                        }
                        continue;
                    }
                    anchored |= !stairs.contains(&neighbor)
                        && matches!(
                            self.grid.opaque(neighbor),
                            Some(OpaqueTile::Wall | OpaqueTile::CrumblyWall | OpaqueTile::Stairs)
                        );
                }
            }
            if !anchored {
                orphaned.extend(group);
            }
        }
        orphaned.sort();
        orphaned
    }
}
