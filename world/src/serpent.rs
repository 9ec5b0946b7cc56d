//! Segment chains of long monsters.
//!
//! The head is a regular monster square; every body segment is drawn on the
//! overlay layer as a [`SerpentPiece`] and occupied by the same monster. Edits
//! only ever touch the ends of the chain, which keeps it a simple path.

use roomsim_core::{
    CueData, CueEventKind, CueEvents, Direction, MonsterId, OverlayTile, PlacementRejected,
    SerpentPiece, Square,
};
use tracing::{debug, warn};

use crate::Room;

impl Room {
    fn long_monster_at(&self, square: Square) -> Result<MonsterId, PlacementRejected> {
        self.check(square)?;
        let id = self
            .grid
            .occupant(square)
            .ok_or(PlacementRejected::MissingMonster(square))?;
        match self.monsters.get(id) {
            Some(monster) if monster.kind.is_long() => Ok(id),
            Some(_) => Err(PlacementRejected::NotLongMonster(square)),
            None => Err(PlacementRejected::MissingMonster(square)),
        }
    }

    /// Extends the chain of the long monster standing on `serpent` by one square.
    ///
    /// The new segment must be free floor orthogonally adjacent to the current
    /// tail, or to the head when there is no body yet. Nothing changes on
    /// rejection.
    pub(crate) fn append_serpent_segment(
        &mut self,
        serpent: Square,
        square: Square,
    ) -> Result<(), PlacementRejected> {
        let id = self.long_monster_at(serpent)?;
        self.check(square)?;
        let cell = self
            .grid
            .cell(square)
            .copied()
            .ok_or(PlacementRejected::Obstructed(square))?;
        if cell.occupant.is_some() {
            return Err(PlacementRejected::Occupied(square));
        }
        if self.player_square() == Some(square) {
            return Err(PlacementRejected::PlayerPresent(square));
        }
        if !cell.opaque.is_floor_like() || cell.overlay != OverlayTile::Empty {
            return Err(PlacementRejected::Obstructed(square));
        }
        let end = self
            .monsters
            .get(id)
            .map(|monster| monster.segments.last().copied().unwrap_or(monster.square))
            .ok_or(PlacementRejected::MissingMonster(serpent))?;
        if !end.is_orthogonally_adjacent(square) {
            warn!(
                column = square.column(),
                row = square.row(),
                "segment rejected: not adjacent to the chain end"
            );
            return Err(PlacementRejected::NotAdjacent(square));
        }

        if let Some(monster) = self.monsters.get_mut(id) {
            monster.segments.push(square);
        }
        let _ = self.grid.set_occupant(square, Some(id))?;
        self.refresh_serpent_tiles(id);
        Ok(())
    }

    /// Removes the head or tail square of a long monster.
    ///
    /// Removing the head promotes the first segment; removing the last square
    /// removes the monster. Middle segments are rejected.
    pub(crate) fn remove_serpent_segment(&mut self, square: Square) -> Result<(), PlacementRejected> {
        let id = self.long_monster_at(square)?;
        let Some(monster) = self.monsters.get(id) else {
            return Err(PlacementRejected::MissingMonster(square));
        };
        let is_head = monster.square == square;
        let is_tail = monster.segments.last() == Some(&square);
        let has_body = !monster.segments.is_empty();

        if is_head && !has_body {
            self.remove_monster_now(id);
            return Ok(());
        }
        if is_tail {
            self.drop_tail(id);
            return Ok(());
        }
        if !is_head {
            return Err(PlacementRejected::NotAtEnd(square));
        }

        let Some(monster) = self.monsters.get_mut(id) else {
            return Err(PlacementRejected::MissingMonster(square));
        };
        let promoted = monster.segments.remove(0);
        monster.square = promoted;
        if let Some(facing) = Direction::between(square, promoted) {
            monster.orientation = facing;
        }
        let _ = self.grid.set_occupant(square, None)?;
        let _ = self.plot_overlay(promoted, OverlayTile::Empty)?;
        self.refresh_serpent_tiles(id);
        Ok(())
    }

    /// Moves the head onto `to`; the body follows and the tail stays when growing.
    pub(crate) fn advance_serpent(&mut self, id: MonsterId, to: Square, facing: Direction, grow: bool) {
        let Some(monster) = self.monsters.get_mut(id) else {
            return;
        };
        let from = std::mem::replace(&mut monster.square, to);
        monster.orientation = facing;
        monster.segments.insert(0, from);
        if let Err(error) = self.grid.set_occupant(to, Some(id)) {
            warn!(%error, "serpent head moved outside the room");
        }
        if !grow {
            self.drop_tail(id);
        }
        self.refresh_serpent_tiles(id);
    }

    /// Cuts the tail segment off, killing the monster when only the head remains.
    pub(crate) fn shrink_serpent(&mut self, id: MonsterId, cue: &mut CueEvents) {
        let Some(tail) = self
            .monsters
            .get(id)
            .and_then(|monster| monster.segments.last().copied())
        else {
            self.kill_monster(id, cue);
            return;
        };
        self.drop_tail(id);
        cue.add_attached(CueEventKind::SerpentShrank, CueData::Square(tail));
    }

    fn drop_tail(&mut self, id: MonsterId) {
        let Some(tail) = self
            .monsters
            .get_mut(id)
            .and_then(|monster| monster.segments.pop())
        else {
            return;
        };
        if self.grid.occupant(tail) == Some(id) {
            let _ = self.grid.set_occupant(tail, None);
        }
        let _ = self.plot_overlay(tail, OverlayTile::Empty);
        self.refresh_serpent_tiles(id);
    }

    /// Redraws every body piece from the current chain.
    pub(crate) fn refresh_serpent_tiles(&mut self, id: MonsterId) {
        let Some(monster) = self.monsters.get(id) else {
            return;
        };
        let chain: Vec<Square> = monster.squares().collect();
        for (offset, window) in chain.windows(2).enumerate() {
            let (previous, square) = (window[0], window[1]);
            let next = chain.get(offset + 2).copied();
            match body_piece(previous, square, next) {
                Some(piece) => {
                    let _ = self.plot_overlay(square, OverlayTile::Serpent(piece));
                }
                None => debug!(
                    column = square.column(),
                    row = square.row(),
                    "serpent segment has no drawable shape"
                ),
            }
        }
    }
}

fn body_piece(previous: Square, square: Square, next: Option<Square>) -> Option<SerpentPiece> {
    let toward_head = Direction::between(square, previous)?;
    match next {
        Some(next) => SerpentPiece::connecting(toward_head, Direction::between(square, next)?),
        None => SerpentPiece::tail(toward_head),
    }
}
