//! Direct mutation API used by editing tools outside the turn loop.
//!
//! Every function either succeeds with the room invariants intact or fails
//! without mutating anything. Repair routines ([`fix_unstable`],
//! [`fix_corrupt_staircase`]) are opt-in; plotting never runs them.

use roomsim_core::{
    CueEvents, Direction, EditError, ExitRecord, GridError, LevelId, MonsterId, MonsterKind,
    MovementType, OpaqueTile, OrbAgent, OrbId, OverlayTile, PlacementRejected, ScrollId, Square,
    SquareRect, Substance, Tile,
};
use tracing::{debug, warn};

use crate::{doors::door_squares, player::Player, PathMap, Room, StaircaseRepair};

/// Replaces one tile, keeping the registries tied to tiles consistent.
///
/// Orb and scroll tiles create or retire their records, door tiles apply the
/// merge and removal rules, and serpent tiles are refused because segments are
/// managed through [`append_serpent_segment`] and [`remove_serpent_segment`].
pub fn plot(room: &mut Room, square: Square, tile: Tile) -> Result<(), EditError> {
    room.check(square)?;
    let plotted = match tile {
        Tile::Opaque(tile) => plot_opaque(room, square, tile),
        Tile::Overlay(tile) => plot_overlay(room, square, tile),
    };
    plotted.inspect_err(|error| warn!(%error, "plot rejected"))
}

fn plot_opaque(room: &mut Room, square: Square, tile: OpaqueTile) -> Result<(), EditError> {
    let former_door = door_squares(&room.grid, square);
    let previous = room.plot_opaque(square, tile)?;
    if tile.is_door() {
        room.merge_door_at(square, tile);
    } else if previous.is_door() {
        room.retarget_agents_from(square, &former_door);
    }
    debug!(column = square.column(), row = square.row(), ?tile, "opaque tile plotted");
    Ok(())
}

fn plot_overlay(room: &mut Room, square: Square, tile: OverlayTile) -> Result<(), EditError> {
    let current = room.grid.overlay(square);
    if tile.is_serpent() || current.is_some_and(OverlayTile::is_serpent) {
        return Err(EditError::SerpentTile(square));
    }
    if matches!(tile, OverlayTile::Orb | OverlayTile::Obstacle) {
        if room.grid.occupant(square).is_some() {
            return Err(PlacementRejected::Occupied(square).into());
        }
        if room.player_square() == Some(square) {
            return Err(PlacementRejected::PlayerPresent(square).into());
        }
    }

    let previous = room.plot_overlay(square, tile)?;
    if previous == OverlayTile::Orb && tile != OverlayTile::Orb {
        let _ = room.orbs.remove_at(square);
    }
    if tile == OverlayTile::Orb && previous != OverlayTile::Orb {
        let _ = room.orbs.insert(square);
    }
    if previous == OverlayTile::Scroll && tile != OverlayTile::Scroll {
        let _ = room.scrolls.retire_at(square);
    }
    if tile == OverlayTile::Scroll && previous != OverlayTile::Scroll {
        let _ = room.scrolls.set_text(square, String::new());
    }
    debug!(column = square.column(), row = square.row(), ?tile, "overlay tile plotted");
    Ok(())
}

/// Puts an orb on the square, returning the existing orb if one is there.
pub fn add_orb_to_square(room: &mut Room, square: Square) -> Result<OrbId, EditError> {
    room.check(square)?;
    if let Some(id) = room.orbs.id_at(square) {
        return Ok(id);
    }
    plot(room, square, Tile::Overlay(OverlayTile::Orb))?;
    room.orbs.id_at(square).ok_or(EditError::NoOrb(square))
}

/// Removes the orb on the square together with its agents.
pub fn delete_orb_at_square(room: &mut Room, square: Square) -> Result<(), EditError> {
    room.check(square)?;
    if room.orbs.id_at(square).is_none() {
        return Err(EditError::NoOrb(square));
    }
    plot(room, square, Tile::Overlay(OverlayTile::Empty))
}

/// Binds the orb on `orb_square` to a door; an existing agent for that door is replaced.
pub fn add_orb_agent(room: &mut Room, orb_square: Square, agent: OrbAgent) -> Result<(), EditError> {
    room.add_orb_agent(orb_square, agent)
        .inspect_err(|error| warn!(%error, "orb agent rejected"))
}

/// Unbinds the orb on `orb_square` from the door containing `door`.
pub fn remove_orb_agent(
    room: &mut Room,
    orb_square: Square,
    door: Square,
) -> Result<OrbAgent, EditError> {
    room.remove_orb_agent(orb_square, door)
}

/// Strikes the orb on the square as if hit by a sword.
pub fn activate_orb(
    room: &mut Room,
    square: Square,
    cue: &mut CueEvents,
    by_mimic: bool,
) -> Result<(), EditError> {
    room.check(square)?;
    if room.activate_orb(square, cue, by_mimic)? {
        Ok(())
    } else {
        Err(EditError::NoOrb(square))
    }
}

/// Places a new monster with only its head square.
pub fn add_new_monster(
    room: &mut Room,
    kind: MonsterKind,
    square: Square,
    orientation: Direction,
) -> Result<MonsterId, PlacementRejected> {
    room.add_monster(kind, square, orientation, false)
        .inspect_err(|error| warn!(%error, ?kind, "monster placement rejected"))
}

/// Extends the long monster standing on `serpent` with a segment on `square`.
pub fn append_serpent_segment(
    room: &mut Room,
    serpent: Square,
    square: Square,
) -> Result<(), PlacementRejected> {
    room.append_serpent_segment(serpent, square)
}

/// Removes the head or tail square of a long monster.
pub fn remove_serpent_segment(room: &mut Room, square: Square) -> Result<(), PlacementRejected> {
    room.remove_serpent_segment(square)
        .inspect_err(|error| warn!(%error, "segment removal rejected"))
}

/// Marks the monster on the square dead; it leaves the room at the next commit.
pub fn kill_monster_at_square(
    room: &mut Room,
    square: Square,
    cue: &mut CueEvents,
) -> Result<MonsterId, PlacementRejected> {
    room.check(square)?;
    let id = room
        .grid
        .occupant(square)
        .ok_or(PlacementRejected::MissingMonster(square))?;
    room.kill_monster(id, cue);
    Ok(id)
}

/// Puts the player on the square, replacing any previous player.
pub fn place_player(
    room: &mut Room,
    square: Square,
    orientation: Direction,
) -> Result<(), PlacementRejected> {
    room.check(square)?;
    let Some(cell) = room.grid.cell(square).copied() else {
        return Err(PlacementRejected::Obstructed(square));
    };
    if cell.occupant.is_some() {
        return Err(PlacementRejected::Occupied(square));
    }
    if !player_can_stand(cell.opaque, cell.overlay) {
        return Err(PlacementRejected::Obstructed(square));
    }
    room.player = Some(Player::new(square, orientation));
    Ok(())
}

/// Reports whether the player may stand on a square with these tiles.
pub(crate) fn player_can_stand(opaque: OpaqueTile, overlay: OverlayTile) -> bool {
    (opaque.is_floor_like() || opaque == OpaqueTile::Stairs)
        && matches!(overlay, OverlayTile::Empty | OverlayTile::Scroll)
}

/// Sets the text of the scroll on the square, dropping a new scroll on empty squares.
pub fn set_scroll_text_at_square(
    room: &mut Room,
    square: Square,
    text: impl Into<String>,
) -> Result<ScrollId, EditError> {
    room.check(square)?;
    match room.grid.overlay(square) {
        Some(OverlayTile::Scroll) => {}
        Some(OverlayTile::Empty) => plot(room, square, Tile::Overlay(OverlayTile::Scroll))?,
        _ => return Err(EditError::NoScroll(square)),
    }
    Ok(room.scrolls.set_text(square, text.into()))
}

/// Adds an exit region, or retargets an identical one.
pub fn set_exit(room: &mut Room, region: SquareRect, destination: LevelId) -> Result<(), EditError> {
    if !region.fits_within(room.dimensions()) {
        return Err(EditError::ExitOutOfRange);
    }
    room.exits.set(ExitRecord {
        region,
        destination,
    });
    Ok(())
}

/// Clears every unstable square of the substance, returning them.
pub fn fix_unstable(room: &mut Room, substance: Substance) -> Vec<Square> {
    room.fix_unstable(substance)
}

/// Grows tar by one ring immediately, ignoring the growth interval.
pub fn grow_tar(room: &mut Room, cue: &mut CueEvents) -> Vec<Square> {
    room.grow_tar(cue)
}

/// Removes the staircase touching `square`, its exit and its orphaned walls.
pub fn fix_corrupt_staircase(
    room: &mut Room,
    square: Square,
) -> Result<StaircaseRepair, GridError> {
    room.fix_corrupt_staircase(square)
}

/// Builds the path map of the movement class seeded from `origin`.
///
/// The map is cached until the next tile or monster change.
pub fn create_path_map(
    room: &mut Room,
    origin: Square,
    movement: MovementType,
) -> Result<&PathMap, GridError> {
    room.check(origin)?;
    Ok(room.path_maps.ensure(&room.grid, movement, origin))
}

/// Physically removes dead monsters and releases retired scroll texts.
pub fn commit(room: &mut Room) {
    room.remove_dead_monsters();
    room.scrolls.release_retired();
}
