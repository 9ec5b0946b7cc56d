//! Read-only view of a room handed to pure behavior systems.

use crate::{
    Direction, EngineConfig, MonsterId, MonsterKind, MovementType, OpaqueTile, OverlayTile,
    RoomDimensions, Square,
};

/// Snapshot of the player taken for behavior planning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Square the player stands on.
    pub square: Square,
    /// Facing of the player.
    pub orientation: Direction,
    /// Square covered by the sword, if it lies inside the room.
    pub sword: Option<Square>,
}

/// Snapshot of one monster taken for behavior planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonsterSnapshot {
    /// Handle of the monster.
    pub id: MonsterId,
    /// Creature kind.
    pub kind: MonsterKind,
    /// Head square.
    pub square: Square,
    /// Facing.
    pub orientation: Direction,
    /// Whether a dormant kind has woken.
    pub awake: bool,
    /// Body squares from the head outward.
    pub segments: Vec<Square>,
}

/// Action a behavior wants the room to carry out for one monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Do nothing this turn.
    Stay,
    /// Step one square, attacking the player if it stands there.
    Step(Direction),
    /// Leave the dormant state.
    Wake,
    /// Expand the surrounding tar by one ring.
    GrowTar,
    /// Repeat the player's command.
    Mirror,
}

/// Read access to the room state a behavior may consult.
pub trait TurnView {
    /// Size of the room.
    fn dimensions(&self) -> RoomDimensions;

    /// Number of the turn being resolved, starting at one.
    fn turn(&self) -> u32;

    /// Engine tunables.
    fn config(&self) -> &EngineConfig;

    /// The player, if present and alive.
    fn player(&self) -> Option<PlayerSnapshot>;

    /// Opaque tile at the square.
    fn opaque(&self, square: Square) -> Option<OpaqueTile>;

    /// Overlay tile at the square.
    fn overlay(&self, square: Square) -> Option<OverlayTile>;

    /// Monster standing on the square, including serpent segments.
    fn occupant(&self, square: Square) -> Option<MonsterId>;

    /// Reports whether a sword covers the square.
    fn is_guarded(&self, square: Square) -> bool;

    /// Steps from the square to the player for the movement class.
    ///
    /// Returns `None` when the square cannot reach the player.
    fn path_distance(&self, movement: MovementType, square: Square) -> Option<u16>;

    /// Reports whether a monster of the movement class may step onto the square.
    ///
    /// The player's own square counts as enterable so seekers can attack it.
    fn can_enter(&self, square: Square, movement: MovementType) -> bool {
        if self.player().is_some_and(|player| player.square == square) {
            return true;
        }
        let (Some(opaque), Some(overlay)) = (self.opaque(square), self.overlay(square)) else {
            return false;
        };
        movement.permits(opaque, overlay)
            && self.occupant(square).is_none()
            && !self.is_guarded(square)
    }
}
