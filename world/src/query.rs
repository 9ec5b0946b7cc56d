//! Read-only access to room state for renderers and editing tools.

use roomsim_core::{
    CorruptionError, EdgeClass, EngineConfig, EntityRef, ExitRecord, GridError, LevelId,
    MonsterId, MonsterSnapshot, MovementType, OpaqueTile, OrbAgent, OrbId, OverlayTile,
    PlayerSnapshot, RoomDimensions, RoomId, ScrollId, Side, Square, Substance,
};

use crate::{doors::door_squares, orbs::Orb, tar, PathMap, Room};

/// Read-only description of one orb and its agents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrbSnapshot {
    /// Handle of the orb.
    pub id: OrbId,
    /// Square the orb sits on.
    pub square: Square,
    /// Agents fired when the orb is struck.
    pub agents: Vec<OrbAgent>,
}

impl OrbSnapshot {
    fn capture(id: OrbId, orb: &Orb) -> Self {
        Self {
            id,
            square: orb.square,
            agents: orb.agents.clone(),
        }
    }
}

/// One agent that targets a door, with the orb owning it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentBinding {
    /// Orb owning the agent.
    pub orb: OrbId,
    /// Square of the owning orb.
    pub orb_square: Square,
    /// The agent itself.
    pub agent: OrbAgent,
}

/// Dimensions of the room.
#[must_use]
pub fn dimensions(room: &Room) -> RoomDimensions {
    room.dimensions()
}

/// Level the room belongs to.
#[must_use]
pub fn level(room: &Room) -> LevelId {
    room.level
}

/// Identifier of the room within its level.
#[must_use]
pub fn room_id(room: &Room) -> RoomId {
    room.id
}

/// Number of turns processed since the room was created or loaded.
#[must_use]
pub fn turn(room: &Room) -> u32 {
    room.turn
}

/// Configuration the room runs with.
#[must_use]
pub fn config(room: &Room) -> &EngineConfig {
    &room.config
}

/// Opaque tile of the square.
pub fn opaque_tile(room: &Room, square: Square) -> Result<OpaqueTile, GridError> {
    room.check(square)?;
    Ok(room.grid.opaque(square).unwrap_or(OpaqueTile::Floor))
}

/// Overlay tile of the square.
pub fn overlay_tile(room: &Room, square: Square) -> Result<OverlayTile, GridError> {
    room.check(square)?;
    Ok(room.grid.overlay(square).unwrap_or(OverlayTile::Empty))
}

/// Monster occupying the square, including one killed this turn.
///
/// Killed monsters keep their squares until the next commit.
pub fn monster_at(room: &Room, square: Square) -> Result<Option<MonsterSnapshot>, GridError> {
    room.check(square)?;
    Ok(room.grid.occupant(square).and_then(|id| monster(room, id)))
}

/// Resolves a monster handle; handles stay valid until the next commit.
#[must_use]
pub fn monster(room: &Room, id: MonsterId) -> Option<MonsterSnapshot> {
    room.monsters.get(id).map(|monster| monster.snapshot(id))
}

/// Reports whether the handle names a monster that has not been killed.
#[must_use]
pub fn is_monster_alive(room: &Room, id: MonsterId) -> bool {
    room.monsters.get(id).is_some_and(|monster| monster.is_alive())
}

/// Live monsters in processing order.
#[must_use]
pub fn monsters(room: &Room) -> Vec<MonsterSnapshot> {
    room.monsters
        .ordered()
        .filter(|(_, monster)| monster.is_alive())
        .map(|(id, monster)| monster.snapshot(id))
        .collect()
}

/// The living player, if one is placed.
#[must_use]
pub fn player(room: &Room) -> Option<PlayerSnapshot> {
    room.live_player()
        .map(|player| player.snapshot(room.dimensions()))
}

/// Reports whether a placed player has been killed.
#[must_use]
pub fn is_player_dead(room: &Room) -> bool {
    room.player.is_some_and(|player| !player.alive)
}

/// Orb on the square.
pub fn orb_at(room: &Room, square: Square) -> Result<Option<OrbSnapshot>, GridError> {
    room.check(square)?;
    Ok(room.orbs.id_at(square).and_then(|id| orb(room, id)))
}

/// Resolves an orb handle.
#[must_use]
pub fn orb(room: &Room, id: OrbId) -> Option<OrbSnapshot> {
    room.orbs.get(id).map(|orb| OrbSnapshot::capture(id, orb))
}

/// Every orb in square order.
#[must_use]
pub fn orbs(room: &Room) -> Vec<OrbSnapshot> {
    room.orbs
        .iter()
        .map(|(id, orb)| OrbSnapshot::capture(id, orb))
        .collect()
}

/// Agents of every orb that target the door containing the square.
pub fn find_agent_for(room: &Room, door: Square) -> Result<Vec<AgentBinding>, GridError> {
    room.check(door)?;
    Ok(room
        .find_agents_for(door)
        .into_iter()
        .map(|(orb, orb_square, agent)| AgentBinding {
            orb,
            orb_square,
            agent,
        })
        .collect())
}

/// Every square of the door containing the square, in square order.
///
/// Empty when the square holds no door.
pub fn all_door_squares(room: &Room, square: Square) -> Result<Vec<Square>, GridError> {
    room.check(square)?;
    Ok(door_squares(&room.grid, square))
}

/// Scroll lying on the square.
pub fn scroll_at(room: &Room, square: Square) -> Result<Option<ScrollId>, GridError> {
    room.check(square)?;
    Ok(room.scrolls.id_at(square))
}

/// Text of a scroll, including one removed since the last commit.
#[must_use]
pub fn scroll_text(room: &Room, id: ScrollId) -> Option<&str> {
    room.scrolls.text(id)
}

/// Exit region covering the square.
pub fn exit_at(room: &Room, square: Square) -> Result<Option<ExitRecord>, GridError> {
    room.check(square)?;
    Ok(room.exits.at(square).map(|(_, record)| *record))
}

/// Every exit region in lookup order.
#[must_use]
pub fn exits(room: &Room) -> &[ExitRecord] {
    room.exits.records()
}

/// Square a cue payload handle refers to.
#[must_use]
pub fn entity_square(room: &Room, entity: EntityRef) -> Option<Square> {
    match entity {
        EntityRef::Monster(id) => room.monsters.get(id).map(|monster| monster.square),
        EntityRef::Orb(id) => room.orbs.get(id).map(|orb| orb.square),
        EntityRef::Scroll(id) => room.scrolls.square(id),
    }
}

/// Whether the square blocks passage into a neighbouring room.
pub fn classify_edge(room: &Room, square: Square) -> Result<EdgeClass, GridError> {
    room.check(square)?;
    let closed_terrain = matches!(
        room.grid.opaque(square),
        Some(OpaqueTile::Wall | OpaqueTile::CrumblyWall | OpaqueTile::Pit)
    );
    let closed_overlay = room.grid.overlay(square).is_some_and(|overlay| {
        matches!(
            overlay,
            OverlayTile::Obstacle | OverlayTile::Orb | OverlayTile::Tar
        ) || overlay.is_serpent()
    });
    let serpent_head = room
        .grid
        .occupant(square)
        .and_then(|id| room.monsters.get(id))
        .is_some_and(|monster| monster.kind.is_long());
    if closed_terrain || closed_overlay || serpent_head {
        Ok(EdgeClass::Closed)
    } else {
        Ok(EdgeClass::Open)
    }
}

/// Squares of one border, ordered by increasing offset along it.
#[must_use]
pub fn border(room: &Room, side: Side) -> Vec<Square> {
    let dimensions = room.dimensions();
    let (columns, rows) = (dimensions.columns(), dimensions.rows());
    if columns == 0 || rows == 0 {
        return Vec::new();
    }
    match side {
        Side::North => (0..columns).map(|column| Square::new(column, 0)).collect(),
        Side::South => (0..columns)
            .map(|column| Square::new(column, rows - 1))
            .collect(),
        Side::West => (0..rows).map(|row| Square::new(0, row)).collect(),
        Side::East => (0..rows).map(|row| Square::new(columns - 1, row)).collect(),
    }
}

/// Offsets along `side` of `room` whose class differs from the facing border of `neighbor`.
///
/// Offsets past the shorter of the two borders are not compared.
#[must_use]
pub fn edge_mismatches(room: &Room, neighbor: &Room, side: Side) -> Vec<u32> {
    let ours = border(room, side);
    let theirs = border(neighbor, side.opposite());
    ours.into_iter()
        .zip(theirs)
        .zip(0_u32..)
        .filter(|((mine, facing), _)| {
            classify_edge(room, *mine).ok() != classify_edge(neighbor, *facing).ok()
        })
        .map(|(_, offset)| offset)
        .collect()
}

/// Whether tar or obstacle on the square sits inside a full 2×2 block.
///
/// Squares without the substance are stable.
pub fn is_stable(room: &Room, square: Square, substance: Substance) -> Result<bool, GridError> {
    room.check(square)?;
    Ok(tar::is_stable(&room.grid, square, substance))
}

/// Whether a sword blow would cut the tar on the square.
pub fn is_tar_vulnerable(room: &Room, square: Square) -> Result<bool, GridError> {
    room.check(square)?;
    Ok(tar::is_tar_vulnerable(&room.grid, square))
}

/// Cached path map of the movement class, if one is current.
///
/// Any tile or monster change drops every cached map.
#[must_use]
pub fn path_map(room: &Room, movement: MovementType) -> Option<&PathMap> {
    room.path_maps.get(movement)
}

/// Runs the invariant validator on demand.
pub fn validate(room: &Room) -> Result<(), CorruptionError> {
    room.validate()
}
