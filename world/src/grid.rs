//! Two-layer tile storage with per-square occupancy.

use roomsim_core::{GridError, MonsterId, OpaqueTile, OverlayTile, RoomDimensions, Square};

/// Everything stored for one square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) opaque: OpaqueTile,
    pub(crate) overlay: OverlayTile,
    pub(crate) occupant: Option<MonsterId>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            opaque: OpaqueTile::Floor,
            overlay: OverlayTile::Empty,
            occupant: None,
        }
    }
}

/// Dense row-major grid of cells plus the squares replotted since the last drain.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    dimensions: RoomDimensions,
    cells: Vec<Cell>,
    plotted_marks: Vec<bool>,
    plotted: Vec<Square>,
}

impl Grid {
    pub(crate) fn new(dimensions: RoomDimensions) -> Self {
        let count = dimensions.square_count();
        Self {
            dimensions,
            cells: vec![Cell::default(); count],
            plotted_marks: vec![false; count],
            plotted: Vec::new(),
        }
    }

    pub(crate) fn dimensions(&self) -> RoomDimensions {
        self.dimensions
    }

    /// Index of the square, or the out-of-range error naming it.
    pub(crate) fn check(&self, square: Square) -> Result<usize, GridError> {
        self.dimensions
            .index(square)
            .ok_or(GridError::OutOfRange {
                column: square.column(),
                row: square.row(),
                columns: self.dimensions.columns(),
                rows: self.dimensions.rows(),
            })
    }

    pub(crate) fn cell(&self, square: Square) -> Option<&Cell> {
        self.dimensions
            .index(square)
            .and_then(|index| self.cells.get(index))
    }

    pub(crate) fn opaque(&self, square: Square) -> Option<OpaqueTile> {
        self.cell(square).map(|cell| cell.opaque)
    }

    pub(crate) fn overlay(&self, square: Square) -> Option<OverlayTile> {
        self.cell(square).map(|cell| cell.overlay)
    }

    pub(crate) fn occupant(&self, square: Square) -> Option<MonsterId> {
        self.cell(square).and_then(|cell| cell.occupant)
    }

    pub(crate) fn set_opaque(
        &mut self,
        square: Square,
        tile: OpaqueTile,
    ) -> Result<OpaqueTile, GridError> {
        let index = self.check(square)?;
        let previous = std::mem::replace(&mut self.cells[index].opaque, tile);
        if previous != tile {
            self.mark_plotted(index, square);
        }
        Ok(previous)
    }

    pub(crate) fn set_overlay(
        &mut self,
        square: Square,
        tile: OverlayTile,
    ) -> Result<OverlayTile, GridError> {
        let index = self.check(square)?;
        let previous = std::mem::replace(&mut self.cells[index].overlay, tile);
        if previous != tile {
            self.mark_plotted(index, square);
        }
        Ok(previous)
    }

    pub(crate) fn set_occupant(
        &mut self,
        square: Square,
        occupant: Option<MonsterId>,
    ) -> Result<Option<MonsterId>, GridError> {
        let index = self.check(square)?;
        Ok(std::mem::replace(&mut self.cells[index].occupant, occupant))
    }

    fn mark_plotted(&mut self, index: usize, square: Square) {
        if !self.plotted_marks[index] {
            self.plotted_marks[index] = true;
            self.plotted.push(square);
        }
    }

    /// Drains the squares replotted since the previous call, in plot order.
    pub(crate) fn take_plotted(&mut self) -> Vec<Square> {
        self.plotted_marks.fill(false);
        std::mem::take(&mut self.plotted)
    }

    /// Iterates every square with its cell in row-major order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (Square, &Cell)> + '_ {
        self.dimensions.squares().zip(self.cells.iter())
    }

    /// Squares whose overlay equals the tile.
    pub(crate) fn squares_with_overlay(&self, tile: OverlayTile) -> Vec<Square> {
        self.iter()
            .filter(|(_, cell)| cell.overlay == tile)
            .map(|(square, _)| square)
            .collect()
    }

    pub(crate) fn opaque_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.opaque.code()).collect()
    }

    pub(crate) fn overlay_codes(&self) -> Vec<u8> {
        self.cells.iter().map(|cell| cell.overlay.code()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plots_are_recorded_once_per_square_in_order() {
        let mut grid = Grid::new(RoomDimensions::new(3, 3));
        let first = Square::new(2, 0);
        let second = Square::new(0, 1);

        let _ = grid.set_opaque(first, OpaqueTile::Wall).expect("in range");
        let _ = grid.set_overlay(second, OverlayTile::Tar).expect("in range");
        let _ = grid.set_overlay(first, OverlayTile::Obstacle).expect("in range");
        let _ = grid.set_opaque(Square::new(1, 1), OpaqueTile::Floor).expect("in range");

        assert_eq!(grid.take_plotted(), vec![first, second]);
        assert!(grid.take_plotted().is_empty());
    }

    #[test]
    fn out_of_range_squares_are_rejected_without_clamping() {
        let mut grid = Grid::new(RoomDimensions::new(3, 2));

        let error = grid
            .set_opaque(Square::new(3, 0), OpaqueTile::Wall)
            .expect_err("column 3 lies outside");

        assert_eq!(
            error,
            GridError::OutOfRange {
                column: 3,
                row: 0,
                columns: 3,
                rows: 2,
            }
        );
        assert_eq!(grid.opaque(Square::new(2, 0)), Some(OpaqueTile::Floor));
        assert!(grid.take_plotted().is_empty());
    }
}
