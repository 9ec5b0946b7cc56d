//! Block stability for tar and obstacles, tar growth and sword damage.

use std::collections::BTreeSet;

use roomsim_core::{
    CueData, CueEventKind, CueEvents, Direction, EntityRef, MonsterKind, OverlayTile, Square,
    Substance,
};
use tracing::{debug, warn};

use crate::{grid::Grid, Room};

/// Reports whether the square lies inside a fully filled 2×2 block of the substance.
///
/// Squares holding something else are trivially stable.
pub(crate) fn is_stable(grid: &Grid, square: Square, substance: Substance) -> bool {
    let tile = substance.tile();
    if grid.overlay(square) != Some(tile) {
        return true;
    }
    let corners = [
        Some(square),
        square.step(Direction::West),
        square.step(Direction::North),
        square.step(Direction::NorthWest),
    ];
    corners.into_iter().flatten().any(|corner| {
        [
            Some(corner),
            corner.step(Direction::East),
            corner.step(Direction::South),
            corner.step(Direction::SouthEast),
        ]
        .into_iter()
        .all(|member| member.is_some_and(|member| grid.overlay(member) == Some(tile)))
    })
}

/// Reports whether a sword can cut the tar on the square.
pub(crate) fn is_tar_vulnerable(grid: &Grid, square: Square) -> bool {
    grid.overlay(square) == Some(OverlayTile::Tar)
        && grid
            .dimensions()
            .neighbors(square)
            .any(|neighbor| grid.overlay(neighbor) != Some(OverlayTile::Tar))
}

impl Room {
    /// Clears unstable squares of the substance until a full pass finds none.
    pub(crate) fn fix_unstable(&mut self, substance: Substance) -> Vec<Square> {
        let mut removed = Vec::new();
        loop {
            let unstable: Vec<Square> = self
                .grid
                .squares_with_overlay(substance.tile())
                .into_iter()
                .filter(|square| !is_stable(&self.grid, *square, substance))
                .collect();
            if unstable.is_empty() {
                break;
            }
            for square in unstable {
                let _ = self.plot_overlay(square, OverlayTile::Empty);
                removed.push(square);
            }
        }
        if !removed.is_empty() {
            debug!(?substance, removed = removed.len(), "unstable squares cleared");
        }
        removed
    }

    /// Grows tar by one orthogonal ring and returns the squares that kept it.
    ///
    /// New squares that would be unstable revert and hatch tar babies instead.
    pub(crate) fn grow_tar(&mut self, cue: &mut CueEvents) -> Vec<Square> {
        let player = self.player_square();
        let dimensions = self.dimensions();
        let mut grown = BTreeSet::new();
        for tar in self.grid.squares_with_overlay(OverlayTile::Tar) {
            for neighbor in dimensions.orthogonal_neighbors(tar) {
                let qualifies = self.grid.cell(neighbor).is_some_and(|cell| {
                    cell.opaque.is_floor_like()
                        && cell.overlay == OverlayTile::Empty
                        && cell.occupant.is_none()
                });
                if qualifies && player != Some(neighbor) {
                    let _ = grown.insert(neighbor);
                }
            }
        }
        for square in &grown {
            let _ = self.plot_overlay(*square, OverlayTile::Tar);
        }

        let mut hatching = Vec::new();
        loop {
            let unstable: Vec<Square> = grown
                .iter()
                .copied()
                .filter(|square| !is_stable(&self.grid, *square, Substance::Tar))
                .collect();
            if unstable.is_empty() {
                break;
            }
            for square in unstable {
                let _ = grown.remove(&square);
                let _ = self.plot_overlay(square, OverlayTile::Empty);
                hatching.push(square);
            }
        }

        let grown: Vec<Square> = grown.into_iter().collect();
        if !grown.is_empty() {
            cue.add_attached(CueEventKind::TarGrew, CueData::Squares(grown.clone()));
        }
        for square in hatching {
            match self.add_monster(MonsterKind::TarBaby, square, Direction::South, true) {
                Ok(id) => cue.add_borrowed(CueEventKind::TarBabyFormed, EntityRef::Monster(id)),
                Err(error) => warn!(%error, "tar baby could not hatch"),
            }
        }
        debug!(grown = grown.len(), "tar grew");
        grown
    }

    /// Cuts vulnerable tar on the square and clears the tar left unstable.
    pub(crate) fn cut_tar(&mut self, square: Square, cue: &mut CueEvents) -> bool {
        if !is_tar_vulnerable(&self.grid, square) {
            return false;
        }
        let _ = self.plot_overlay(square, OverlayTile::Empty);
        cue.add_attached(CueEventKind::TarDestroyed, CueData::Square(square));
        for removed in self.fix_unstable(Substance::Tar) {
            cue.add_attached(CueEventKind::TarDestroyed, CueData::Square(removed));
        }
        true
    }
}
