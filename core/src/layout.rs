//! Persisted room layout exchanged with the storage layer.

use serde::{Deserialize, Serialize};

use crate::{Direction, LevelId, MonsterKind, OrbAgent, RoomDimensions, RoomId, Square, SquareRect};

/// Serializable snapshot of a whole room.
///
/// Tile layers hold one byte code per square in row-major order; see
/// [`OpaqueTile::code`](crate::OpaqueTile::code) and
/// [`OverlayTile::code`](crate::OverlayTile::code).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLayout {
    /// Level the room belongs to.
    pub level: LevelId,
    /// Room identifier inside the level.
    pub room: RoomId,
    /// Number of columns.
    pub columns: u32,
    /// Number of rows.
    pub rows: u32,
    /// Opaque layer tile codes.
    pub opaque: Vec<u8>,
    /// Overlay layer tile codes; serpent pieces are recomputed on load.
    pub overlay: Vec<u8>,
    /// Orbs and their agents.
    #[serde(default)]
    pub orbs: Vec<OrbRecord>,
    /// Scroll texts.
    #[serde(default)]
    pub scrolls: Vec<ScrollRecord>,
    /// Exit regions in lookup order.
    #[serde(default)]
    pub exits: Vec<ExitRecord>,
    /// Monsters in processing order.
    #[serde(default)]
    pub monsters: Vec<MonsterRecord>,
    /// The player, if present.
    #[serde(default)]
    pub player: Option<PlayerRecord>,
}

impl RoomLayout {
    /// Dimensions described by the layout.
    #[must_use]
    pub const fn dimensions(&self) -> RoomDimensions {
        RoomDimensions::new(self.columns, self.rows)
    }
}

/// Persisted orb with its agents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrbRecord {
    /// Square holding the orb.
    pub square: Square,
    /// Door bindings.
    #[serde(default)]
    pub agents: Vec<OrbAgent>,
}

/// Persisted scroll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollRecord {
    /// Square holding the scroll.
    pub square: Square,
    /// Message text.
    pub text: String,
}

/// Persisted exit region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitRecord {
    /// Squares covered by the exit.
    pub region: SquareRect,
    /// Level reached through the exit.
    pub destination: LevelId,
}

/// Persisted monster.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    /// Creature kind.
    pub kind: MonsterKind,
    /// Head square.
    pub square: Square,
    /// Facing.
    pub orientation: Direction,
    /// Whether a dormant kind has already woken.
    #[serde(default)]
    pub awake: bool,
    /// Body squares from the head outward; empty for short monsters.
    #[serde(default)]
    pub segments: Vec<Square>,
}

/// Persisted player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Square the player stands on.
    pub square: Square,
    /// Facing of the player and its sword.
    pub orientation: Direction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrbAction, RectSize};

    #[test]
    fn layout_survives_binary_encoding() {
        let layout = RoomLayout {
            level: LevelId::new(3),
            room: RoomId::new(7),
            columns: 2,
            rows: 2,
            opaque: vec![1, 1, 7, 5],
            overlay: vec![1, 0, 0, 0],
            orbs: vec![OrbRecord {
                square: Square::new(0, 0),
                agents: vec![OrbAgent::new(Square::new(0, 1), OrbAction::Toggle)],
            }],
            scrolls: Vec::new(),
            exits: vec![ExitRecord {
                region: SquareRect::from_origin_and_size(Square::new(1, 1), RectSize::new(1, 1)),
                destination: LevelId::new(4),
            }],
            monsters: vec![MonsterRecord {
                kind: MonsterKind::Roach,
                square: Square::new(1, 0),
                orientation: Direction::South,
                awake: false,
                segments: Vec::new(),
            }],
            player: None,
        };

        let bytes = bincode::serialize(&layout).expect("layout serializes");
        let decoded: RoomLayout = bincode::deserialize(&bytes).expect("layout deserializes");

        assert_eq!(decoded, layout);
        assert_eq!(decoded.dimensions().square_count(), 4);
    }
}
