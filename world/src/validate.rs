//! Cross-checks between the grid and the entity registries.

use std::collections::BTreeSet;

use roomsim_core::{CorruptionError, OverlayTile};

use crate::{doors::door_squares, Room};

impl Room {
    /// Verifies every invariant tying cells to registries.
    pub(crate) fn validate(&self) -> Result<(), CorruptionError> {
        self.validate_occupancy()?;
        self.validate_serpents()?;
        self.validate_orbs()?;
        self.validate_scrolls()?;
        self.validate_player()
    }

    fn validate_occupancy(&self) -> Result<(), CorruptionError> {
        for (square, cell) in self.grid.iter() {
            let Some(id) = cell.occupant else {
                continue;
            };
            let owned = self
                .monsters
                .get(id)
                .is_some_and(|monster| monster.squares().any(|member| member == square));
            if !owned {
                return Err(CorruptionError::OccupancyMismatch(square));
            }
        }
        for (id, monster) in self.monsters.ordered() {
            if let Some(square) = monster
                .squares()
                .find(|square| self.grid.occupant(*square) != Some(id))
            {
                return Err(CorruptionError::OccupancyMismatch(square));
            }
        }
        Ok(())
    }

    fn validate_serpents(&self) -> Result<(), CorruptionError> {
        for (_, monster) in self.monsters.ordered() {
            if !monster.kind.is_long() && !monster.segments.is_empty() {
                return Err(CorruptionError::SerpentChainBroken(monster.square));
            }
            let mut seen = BTreeSet::from([monster.square]);
            let mut previous = monster.square;
            for segment in &monster.segments {
                let linked = previous.is_orthogonally_adjacent(*segment)
                    && seen.insert(*segment)
                    && self.grid.overlay(*segment).is_some_and(OverlayTile::is_serpent);
                if !linked {
                    return Err(CorruptionError::SerpentChainBroken(*segment));
                }
                previous = *segment;
            }
        }
        for (square, cell) in self.grid.iter() {
            if !cell.overlay.is_serpent() {
                continue;
            }
            let backed = cell
                .occupant
                .and_then(|id| self.monsters.get(id))
                .is_some_and(|monster| monster.kind.is_long() && monster.segments.contains(&square));
            if !backed {
                return Err(CorruptionError::SerpentTileOrphaned(square));
            }
        }
        Ok(())
    }

    fn validate_orbs(&self) -> Result<(), CorruptionError> {
        for (id, orb) in self.orbs.iter() {
            if self.grid.overlay(orb.square) != Some(OverlayTile::Orb) {
                return Err(CorruptionError::OrbRecordMismatch(orb.square));
            }
            let mut doors: Vec<Vec<_>> = Vec::with_capacity(orb.agents.len());
            for agent in &orb.agents {
                let door = door_squares(&self.grid, agent.door);
                if door.is_empty() {
                    return Err(CorruptionError::DanglingAgent {
                        orb: id,
                        door: agent.door,
                    });
                }
                if doors.iter().any(|known| known.contains(&agent.door)) {
                    return Err(CorruptionError::DuplicateAgent {
                        orb: id,
                        door: agent.door,
                    });
                }
                doors.push(door);
            }
        }
        for square in self.grid.squares_with_overlay(OverlayTile::Orb) {
            if self.orbs.id_at(square).is_none() {
                return Err(CorruptionError::OrbRecordMismatch(square));
            }
        }
        Ok(())
    }

    fn validate_scrolls(&self) -> Result<(), CorruptionError> {
        for (_, scroll) in self.scrolls.iter() {
            if self.grid.overlay(scroll.square) != Some(OverlayTile::Scroll) {
                return Err(CorruptionError::ScrollRecordMismatch(scroll.square));
            }
        }
        for square in self.grid.squares_with_overlay(OverlayTile::Scroll) {
            if self.scrolls.id_at(square).is_none() {
                return Err(CorruptionError::ScrollRecordMismatch(square));
            }
        }
        Ok(())
    }

    fn validate_player(&self) -> Result<(), CorruptionError> {
        let Some(player) = self.live_player() else {
            return Ok(());
        };
        let overlapped = !self.dimensions().contains(player.square)
            || self
                .grid
                .occupant(player.square)
                .and_then(|id| self.monsters.get(id))
                .is_some_and(|monster| monster.is_alive());
        if overlapped {
            return Err(CorruptionError::PlayerOverlap(player.square));
        }
        Ok(())
    }
}
