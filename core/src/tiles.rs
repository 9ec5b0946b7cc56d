//! Tile codes for the two grid layers and the passability rules derived from them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Direction;

/// Tile occupying the opaque (terrain) layer of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpaqueTile {
    /// Plain walkable floor.
    Floor,
    /// Solid wall.
    Wall,
    /// Wall that breaks when struck by a sword.
    CrumblyWall,
    /// Bottomless pit; only flyers cross it.
    Pit,
    /// Staircase leading to another level.
    Stairs,
    /// Floor that drops into a pit once the player steps off it.
    Trapdoor,
    /// Closed door square.
    DoorClosed,
    /// Open door square.
    DoorOpen,
}

impl OpaqueTile {
    /// Stable persisted byte code of the tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Floor => 1,
            Self::Wall => 2,
            Self::CrumblyWall => 3,
            Self::Pit => 4,
            Self::Stairs => 5,
            Self::Trapdoor => 6,
            Self::DoorClosed => 7,
            Self::DoorOpen => 8,
        }
    }

    /// Decodes a persisted byte code.
    pub fn from_code(code: u8) -> Result<Self, TileCodeError> {
        match code {
            1 => Ok(Self::Floor),
            2 => Ok(Self::Wall),
            3 => Ok(Self::CrumblyWall),
            4 => Ok(Self::Pit),
            5 => Ok(Self::Stairs),
            6 => Ok(Self::Trapdoor),
            7 => Ok(Self::DoorClosed),
            8 => Ok(Self::DoorOpen),
            _ => Err(TileCodeError::UnknownOpaque(code)),
        }
    }

    /// Reports whether the tile is part of a door, open or closed.
    #[must_use]
    pub const fn is_door(self) -> bool {
        matches!(self, Self::DoorClosed | Self::DoorOpen)
    }

    /// Reports whether the tile is any kind of wall.
    #[must_use]
    pub const fn is_wall(self) -> bool {
        matches!(self, Self::Wall | Self::CrumblyWall)
    }

    /// Reports whether creatures can stand on the tile.
    #[must_use]
    pub const fn is_floor_like(self) -> bool {
        matches!(self, Self::Floor | Self::Trapdoor | Self::DoorOpen)
    }
}

/// Shape of one serpent body segment drawn on the overlay layer.
///
/// Body pieces name the two edges they connect; tail pieces name the edge that
/// leads back toward the head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SerpentPiece {
    /// Connects west and east.
    Horizontal,
    /// Connects north and south.
    Vertical,
    /// Connects north and east.
    NorthEast,
    /// Connects north and west.
    NorthWest,
    /// Connects south and east.
    SouthEast,
    /// Connects south and west.
    SouthWest,
    /// Tail whose body lies to the north.
    TailNorth,
    /// Tail whose body lies to the east.
    TailEast,
    /// Tail whose body lies to the south.
    TailSouth,
    /// Tail whose body lies to the west.
    TailWest,
}

impl SerpentPiece {
    /// Body piece joining two orthogonal directions.
    #[must_use]
    pub fn connecting(first: Direction, second: Direction) -> Option<Self> {
        use Direction::{East, North, South, West};
        match (first, second) {
            (West, East) | (East, West) => Some(Self::Horizontal),
            (North, South) | (South, North) => Some(Self::Vertical),
            (North, East) | (East, North) => Some(Self::NorthEast),
            (North, West) | (West, North) => Some(Self::NorthWest),
            (South, East) | (East, South) => Some(Self::SouthEast),
            (South, West) | (West, South) => Some(Self::SouthWest),
            _ => None,
        }
    }

    /// Tail piece whose body lies in the provided orthogonal direction.
    #[must_use]
    pub const fn tail(toward_body: Direction) -> Option<Self> {
        match toward_body {
            Direction::North => Some(Self::TailNorth),
            Direction::East => Some(Self::TailEast),
            Direction::South => Some(Self::TailSouth),
            Direction::West => Some(Self::TailWest),
            _ => None,
        }
    }

    /// Reports whether the piece ends the chain.
    #[must_use]
    pub const fn is_tail(self) -> bool {
        matches!(
            self,
            Self::TailNorth | Self::TailEast | Self::TailSouth | Self::TailWest
        )
    }

    const fn code_offset(self) -> u8 {
        match self {
            Self::Horizontal => 0,
            Self::Vertical => 1,
            Self::NorthEast => 2,
            Self::NorthWest => 3,
            Self::SouthEast => 4,
            Self::SouthWest => 5,
            Self::TailNorth => 6,
            Self::TailEast => 7,
            Self::TailSouth => 8,
            Self::TailWest => 9,
        }
    }

    const fn from_code_offset(offset: u8) -> Option<Self> {
        match offset {
            0 => Some(Self::Horizontal),
            1 => Some(Self::Vertical),
            2 => Some(Self::NorthEast),
            3 => Some(Self::NorthWest),
            4 => Some(Self::SouthEast),
            5 => Some(Self::SouthWest),
            6 => Some(Self::TailNorth),
            7 => Some(Self::TailEast),
            8 => Some(Self::TailSouth),
            9 => Some(Self::TailWest),
            _ => None,
        }
    }
}

const SERPENT_CODE_BASE: u8 = 16;

/// Tile occupying the transparent (overlay) layer of a square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayTile {
    /// Nothing drawn over the terrain.
    Empty,
    /// Orb that signals doors when struck.
    Orb,
    /// Scroll holding a message.
    Scroll,
    /// Immovable obstacle; must form 2×2 blocks.
    Obstacle,
    /// Tar; must form 2×2 blocks.
    Tar,
    /// Serpent body segment.
    Serpent(SerpentPiece),
}

impl OverlayTile {
    /// Stable persisted byte code of the tile.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Orb => 1,
            Self::Scroll => 2,
            Self::Obstacle => 3,
            Self::Tar => 4,
            Self::Serpent(piece) => SERPENT_CODE_BASE + piece.code_offset(),
        }
    }

    /// Decodes a persisted byte code.
    pub fn from_code(code: u8) -> Result<Self, TileCodeError> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Orb),
            2 => Ok(Self::Scroll),
            3 => Ok(Self::Obstacle),
            4 => Ok(Self::Tar),
            _ => code
                .checked_sub(SERPENT_CODE_BASE)
                .and_then(SerpentPiece::from_code_offset)
                .map(Self::Serpent)
                .ok_or(TileCodeError::UnknownOverlay(code)),
        }
    }

    /// Reports whether the tile is a serpent body segment.
    #[must_use]
    pub const fn is_serpent(self) -> bool {
        matches!(self, Self::Serpent(_))
    }
}

/// Tile addressed to either layer, used by the single plot entry point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Replaces the opaque layer.
    Opaque(OpaqueTile),
    /// Replaces the overlay layer.
    Overlay(OverlayTile),
}

/// Overlay substances governed by the 2×2 block stability rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Substance {
    /// Tar, grown by tar mothers and cut by swords.
    Tar,
    /// Obstacles, placed by editing tools.
    Obstacle,
}

impl Substance {
    /// Overlay tile that holds the substance.
    #[must_use]
    pub const fn tile(self) -> OverlayTile {
        match self {
            Self::Tar => OverlayTile::Tar,
            Self::Obstacle => OverlayTile::Obstacle,
        }
    }
}

/// Movement capability classes; each has its own path map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MovementType {
    /// Walks on floor-like terrain with an empty or scroll overlay.
    Ground,
    /// Like ground, but also crosses pits.
    Air,
    /// Like ground, but also wades through tar.
    TarWading,
}

impl MovementType {
    /// Every movement class.
    pub const ALL: [MovementType; 3] = [Self::Ground, Self::Air, Self::TarWading];

    /// Dense index of the class, for per-class tables.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Ground => 0,
            Self::Air => 1,
            Self::TarWading => 2,
        }
    }

    /// Reports whether a square with the provided tiles is passable for the class.
    #[must_use]
    pub const fn permits(self, opaque: OpaqueTile, overlay: OverlayTile) -> bool {
        let terrain = match self {
            Self::Air => opaque.is_floor_like() || matches!(opaque, OpaqueTile::Pit),
            Self::Ground | Self::TarWading => opaque.is_floor_like(),
        };
        let cover = match self {
            Self::TarWading => matches!(
                overlay,
                OverlayTile::Empty | OverlayTile::Scroll | OverlayTile::Tar
            ),
            Self::Ground | Self::Air => matches!(overlay, OverlayTile::Empty | OverlayTile::Scroll),
        };
        terrain && cover
    }
}

/// Errors raised while decoding persisted tile codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum TileCodeError {
    /// The byte does not name an opaque tile.
    #[error("unknown opaque tile code {0}")]
    UnknownOpaque(u8),
    /// The byte does not name an overlay tile.
    #[error("unknown overlay tile code {0}")]
    UnknownOverlay(u8),
}
