//! Error taxonomy shared by the room and its callers.

use thiserror::Error;

use crate::{OrbId, Square, TileCodeError};

/// Coordinate that falls outside the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The square lies beyond the room's columns or rows.
    #[error("square ({column}, {row}) lies outside the {columns}x{rows} room")]
    OutOfRange {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
        /// Column count of the room.
        columns: u32,
        /// Row count of the room.
        rows: u32,
    },
}

/// Reasons a placement request was refused without mutating the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PlacementRejected {
    /// The target square lies outside the room.
    #[error(transparent)]
    OutOfRange(#[from] GridError),
    /// Another creature already stands on the square.
    #[error("square ({}, {}) is already occupied", .0.column(), .0.row())]
    Occupied(Square),
    /// The square cannot hold the creature.
    #[error("square ({}, {}) is obstructed", .0.column(), .0.row())]
    Obstructed(Square),
    /// The new segment does not touch the end of the chain.
    #[error("square ({}, {}) is not orthogonally adjacent to the chain end", .0.column(), .0.row())]
    NotAdjacent(Square),
    /// Segments may only be removed from the head or tail.
    #[error("square ({}, {}) is not an end of the chain", .0.column(), .0.row())]
    NotAtEnd(Square),
    /// No monster stands on the square.
    #[error("no monster at ({}, {})", .0.column(), .0.row())]
    MissingMonster(Square),
    /// The monster has no segment chain.
    #[error("monster at ({}, {}) has no body segments", .0.column(), .0.row())]
    NotLongMonster(Square),
    /// The player stands on the square.
    #[error("the player stands on ({}, {})", .0.column(), .0.row())]
    PlayerPresent(Square),
}

/// Direct edits refused by the room; nothing was mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    /// The square lies outside the room.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The edit would place or move a creature illegally.
    #[error(transparent)]
    Placement(#[from] PlacementRejected),
    /// Serpent tiles are managed through the segment API only.
    #[error("serpent tiles cannot be plotted directly at ({}, {})", .0.column(), .0.row())]
    SerpentTile(Square),
    /// No orb is anchored at the square.
    #[error("no orb at ({}, {})", .0.column(), .0.row())]
    NoOrb(Square),
    /// The square does not hold a door.
    #[error("no door at ({}, {})", .0.column(), .0.row())]
    NoDoor(Square),
    /// No scroll lies on the square.
    #[error("no scroll at ({}, {})", .0.column(), .0.row())]
    NoScroll(Square),
    /// The orb has no agent targeting the door.
    #[error("orb at ({}, {}) has no agent for that door", .0.column(), .0.row())]
    NoAgent(Square),
    /// Exit regions must lie inside the room.
    #[error("exit region does not fit inside the room")]
    ExitOutOfRange,
    /// The edit ran into broken room state.
    #[error(transparent)]
    Corrupt(#[from] CorruptionError),
}

/// Broken room invariants; the room must be reloaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CorruptionError {
    /// A cell's occupant disagrees with the monster registry.
    #[error("occupancy of ({}, {}) disagrees with the monster registry", .0.column(), .0.row())]
    OccupancyMismatch(Square),
    /// A serpent tile has no segment behind it.
    #[error("serpent tile at ({}, {}) belongs to no serpent", .0.column(), .0.row())]
    SerpentTileOrphaned(Square),
    /// A serpent chain has a gap or a branch.
    #[error("serpent chain broken at ({}, {})", .0.column(), .0.row())]
    SerpentChainBroken(Square),
    /// An orb agent targets a square that is no longer a door.
    #[error("orb {orb:?} targets ({}, {}) which is not a door", .door.column(), .door.row())]
    DanglingAgent {
        /// Orb owning the agent.
        orb: OrbId,
        /// Square the agent targets.
        door: Square,
    },
    /// An orb holds two agents for the same physical door.
    #[error("orb {orb:?} holds two agents for the door at ({}, {})", .door.column(), .door.row())]
    DuplicateAgent {
        /// Orb owning the agents.
        orb: OrbId,
        /// One square of the shared door.
        door: Square,
    },
    /// An orb record and the overlay layer disagree.
    #[error("orb record and overlay disagree at ({}, {})", .0.column(), .0.row())]
    OrbRecordMismatch(Square),
    /// A scroll record and the overlay layer disagree.
    #[error("scroll record and overlay disagree at ({}, {})", .0.column(), .0.row())]
    ScrollRecordMismatch(Square),
    /// The player shares a square with a live monster or stands outside the room.
    #[error("the player cannot stand on ({}, {})", .0.column(), .0.row())]
    PlayerOverlap(Square),
}

/// Failures while turning a persisted layout into a room.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadError {
    /// A tile layer has the wrong number of bytes.
    #[error("{layer} layer holds {actual} tiles, expected {expected}")]
    LayerLength {
        /// Name of the offending layer.
        layer: &'static str,
        /// Expected length.
        expected: usize,
        /// Length found in the layout.
        actual: usize,
    },
    /// A tile byte is not a known code.
    #[error("tile {index}: {source}")]
    TileCode {
        /// Row-major index of the tile.
        index: usize,
        /// Decoding failure.
        source: TileCodeError,
    },
    /// A record could not be placed.
    #[error("record rejected: {0}")]
    Placement(#[from] PlacementRejected),
    /// A record names an invalid square or target.
    #[error("record rejected: {0}")]
    Edit(#[from] EditError),
    /// The assembled room breaks an invariant.
    #[error(transparent)]
    Corrupt(#[from] CorruptionError),
}
