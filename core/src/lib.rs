#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the room simulation engine.
//!
//! This crate defines the message surface that connects callers, the
//! authoritative room, and pure systems. Callers submit [`Command`] values
//! describing one player turn, the room resolves the turn through its
//! `process_command` entry point, and reports what happened through a
//! [`CueEvents`] bus. Editing tools use the same coordinate, tile and handle
//! types defined here to mutate squares and entities directly.

mod config;
mod cue;
mod error;
mod layout;
mod tiles;
mod view;

pub use config::EngineConfig;
pub use cue::{CueData, CueEventKind, CueEvents, CuePayload, EntityRef};
pub use error::{CorruptionError, EditError, GridError, LoadError, PlacementRejected};
pub use layout::{ExitRecord, MonsterRecord, OrbRecord, PlayerRecord, RoomLayout, ScrollRecord};
pub use tiles::{
    MovementType, OpaqueTile, OverlayTile, SerpentPiece, Substance, Tile, TileCodeError,
};
pub use view::{Intent, MonsterSnapshot, PlayerSnapshot, TurnView};

use serde::{Deserialize, Serialize};

slotmap::new_key_type! {
    /// Generation-checked handle to a monster stored in a room.
    pub struct MonsterId;

    /// Generation-checked handle to an orb stored in a room.
    pub struct OrbId;

    /// Generation-checked handle to a scroll stored in a room.
    pub struct ScrollId;
}

/// Commands that express one player turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Moves the player one square in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Rotates the player and its sword one eighth turn clockwise.
    RotateClockwise,
    /// Rotates the player and its sword one eighth turn counter-clockwise.
    RotateCounterClockwise,
    /// Lets the turn pass without moving.
    Wait,
}

/// Identifier of the level a room or an exit belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(u32);

impl LevelId {
    /// Creates a new level identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of a room inside its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single room square expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Square {
    column: u32,
    row: u32,
}

impl Square {
    /// Creates a new square coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the square.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the square.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two squares.
    #[must_use]
    pub fn manhattan_distance(self, other: Square) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Reports whether the squares share an edge.
    #[must_use]
    pub fn is_orthogonally_adjacent(self, other: Square) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Reports whether the squares share an edge or a corner.
    #[must_use]
    pub fn is_adjacent(self, other: Square) -> bool {
        self != other && self.column.abs_diff(other.column) <= 1 && self.row.abs_diff(other.row) <= 1
    }

    /// Square one step away in the provided direction, ignoring the upper room bounds.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Square> {
        let (dx, dy) = direction.delta();
        let column = self.column.checked_add_signed(dx)?;
        let row = self.row.checked_add_signed(dy)?;
        Some(Square::new(column, row))
    }
}

/// Column and row counts of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomDimensions {
    columns: u32,
    rows: u32,
}

impl RoomDimensions {
    /// Creates a new dimension descriptor.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the room.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the room.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of squares in the room.
    #[must_use]
    pub fn square_count(&self) -> usize {
        let count = u64::from(self.columns) * u64::from(self.rows);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the square lies inside the room.
    #[must_use]
    pub const fn contains(&self, square: Square) -> bool {
        square.column < self.columns && square.row < self.rows
    }

    /// Row-major index of the square, if it lies inside the room.
    #[must_use]
    pub fn index(&self, square: Square) -> Option<usize> {
        if !self.contains(square) {
            return None;
        }
        let row = usize::try_from(square.row).ok()?;
        let column = usize::try_from(square.column).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Square stored at the provided row-major index.
    #[must_use]
    pub fn square_at(&self, index: usize) -> Option<Square> {
        if index >= self.square_count() || self.columns == 0 {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(Square::new(column, row))
    }

    /// Square one step away in the provided direction, if it lies inside the room.
    #[must_use]
    pub fn step(&self, square: Square, direction: Direction) -> Option<Square> {
        square.step(direction).filter(|next| self.contains(*next))
    }

    /// Neighbours of the square inside the room, in [`Direction::ALL`] order.
    pub fn neighbors(&self, square: Square) -> impl Iterator<Item = Square> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(square, direction))
    }

    /// Edge-sharing neighbours of the square inside the room.
    pub fn orthogonal_neighbors(&self, square: Square) -> impl Iterator<Item = Square> + '_ {
        Direction::ORTHOGONAL
            .into_iter()
            .filter_map(move |direction| self.step(square, direction))
    }

    /// Iterates every square of the room in row-major order.
    pub fn squares(&self) -> impl Iterator<Item = Square> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| Square::new(column, row)))
    }

    /// Reports whether the square lies on one of the four border rows or columns.
    #[must_use]
    pub const fn is_border(&self, square: Square) -> bool {
        square.column == 0
            || square.row == 0
            || square.column + 1 == self.columns
            || square.row + 1 == self.rows
    }
}

/// Axis-aligned rectangle expressed in square coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SquareRect {
    origin: Square,
    size: RectSize,
}

impl SquareRect {
    /// Constructs a rectangle from an origin square and size.
    #[must_use]
    pub const fn from_origin_and_size(origin: Square, size: RectSize) -> Self {
        Self { origin, size }
    }

    /// Upper-left square that anchors the rectangle.
    #[must_use]
    pub const fn origin(&self) -> Square {
        self.origin
    }

    /// Dimensions of the rectangle measured in whole squares.
    #[must_use]
    pub const fn size(&self) -> RectSize {
        self.size
    }

    /// Reports whether the square lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, square: Square) -> bool {
        square.column() >= self.origin.column()
            && square.row() >= self.origin.row()
            && square.column() - self.origin.column() < self.size.width()
            && square.row() - self.origin.row() < self.size.height()
    }

    /// Reports whether every square of the rectangle lies inside the room.
    #[must_use]
    pub fn fits_within(&self, dimensions: RoomDimensions) -> bool {
        let right = u64::from(self.origin.column()) + u64::from(self.size.width());
        let bottom = u64::from(self.origin.row()) + u64::from(self.size.height());
        self.size.width() > 0
            && self.size.height() > 0
            && right <= u64::from(dimensions.columns())
            && bottom <= u64::from(dimensions.rows())
    }
}

/// Size of a [`SquareRect`] measured in whole squares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectSize {
    width: u32,
    height: u32,
}

impl RectSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width of the rectangle in squares.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rectangle in squares.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }
}

/// The eight orientations available to the player, its sword and monsters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward decreasing rows and increasing columns.
    NorthEast,
    /// Toward increasing column indices.
    East,
    /// Toward increasing rows and columns.
    SouthEast,
    /// Toward increasing row indices.
    South,
    /// Toward increasing rows and decreasing columns.
    SouthWest,
    /// Toward decreasing column indices.
    West,
    /// Toward decreasing rows and columns.
    NorthWest,
}

impl Direction {
    /// Every direction in clockwise order starting at north.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The four edge-sharing directions in clockwise order.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row offsets of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::NorthEast => (1, -1),
            Self::East => (1, 0),
            Self::SouthEast => (1, 1),
            Self::South => (0, 1),
            Self::SouthWest => (-1, 1),
            Self::West => (-1, 0),
            Self::NorthWest => (-1, -1),
        }
    }

    /// Next direction one eighth turn clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::NorthEast,
            Self::NorthEast => Self::East,
            Self::East => Self::SouthEast,
            Self::SouthEast => Self::South,
            Self::South => Self::SouthWest,
            Self::SouthWest => Self::West,
            Self::West => Self::NorthWest,
            Self::NorthWest => Self::North,
        }
    }

    /// Next direction one eighth turn counter-clockwise.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::NorthWest,
            Self::NorthEast => Self::North,
            Self::East => Self::NorthEast,
            Self::SouthEast => Self::East,
            Self::South => Self::SouthEast,
            Self::SouthWest => Self::South,
            Self::West => Self::SouthWest,
            Self::NorthWest => Self::West,
        }
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        self.clockwise().clockwise().clockwise().clockwise()
    }

    /// Reports whether the direction shares an edge rather than a corner.
    #[must_use]
    pub const fn is_orthogonal(self) -> bool {
        matches!(self, Self::North | Self::East | Self::South | Self::West)
    }

    /// Direction of a single step between two adjacent squares.
    #[must_use]
    pub fn between(from: Square, to: Square) -> Option<Direction> {
        if !from.is_adjacent(to) {
            return None;
        }
        Self::toward(from, to)
    }

    /// Direction whose step reduces both axis distances toward the target.
    ///
    /// Returns `None` when the squares coincide.
    #[must_use]
    pub fn toward(from: Square, to: Square) -> Option<Direction> {
        let dx = to.column().cmp(&from.column()) as i32;
        let dy = to.row().cmp(&from.row()) as i32;
        Self::from_delta(dx, dy)
    }

    /// Direction matching a unit offset.
    #[must_use]
    pub const fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Self::North),
            (1, -1) => Some(Self::NorthEast),
            (1, 0) => Some(Self::East),
            (1, 1) => Some(Self::SouthEast),
            (0, 1) => Some(Self::South),
            (-1, 1) => Some(Self::SouthWest),
            (-1, 0) => Some(Self::West),
            (-1, -1) => Some(Self::NorthWest),
            _ => None,
        }
    }
}

/// One of the four borders of a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Top row.
    North,
    /// Rightmost column.
    East,
    /// Bottom row.
    South,
    /// Leftmost column.
    West,
}

impl Side {
    /// Border of the neighbouring room that faces this one.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }
}

/// Compatibility class of a border square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeClass {
    /// Wall, obstacle, pit, orb, tar or serpent body; nothing crosses.
    Closed,
    /// The square can be crossed into the neighbouring room.
    Open,
}

/// Creature kinds simulated by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    /// Seeks the player across the floor.
    Roach,
    /// Flying seeker that crosses pits.
    WraithWing,
    /// Dormant until the player crosses its gaze.
    EvilEye,
    /// Stationary source of tar growth.
    TarMother,
    /// Small seeker born from unstable tar growth.
    TarBaby,
    /// Long monster made of a head and a chain of body segments.
    Serpent,
    /// Mirrors every player command and carries a sword.
    Mimic,
}

impl MonsterKind {
    /// Movement class used for placement and path finding.
    #[must_use]
    pub const fn movement(self) -> MovementType {
        match self {
            Self::WraithWing => MovementType::Air,
            Self::TarMother | Self::TarBaby => MovementType::TarWading,
            Self::Roach | Self::EvilEye | Self::Serpent | Self::Mimic => MovementType::Ground,
        }
    }

    /// Reports whether the monster occupies a chain of squares.
    #[must_use]
    pub const fn is_long(self) -> bool {
        matches!(self, Self::Serpent)
    }
}

/// Effect an orb agent applies to its door when the orb is struck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrbAction {
    /// Opens a closed door and closes an open one.
    Toggle,
    /// Forces the door open.
    Open,
    /// Forces the door closed.
    Close,
    /// Keeps the binding without affecting the door.
    None,
}

/// Binding between an orb and one door square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrbAgent {
    /// Door square the agent targets; stands for the whole physical door.
    pub door: Square,
    /// Effect applied to the door on activation.
    pub action: OrbAction,
}

impl OrbAgent {
    /// Creates a new agent binding.
    #[must_use]
    pub const fn new(door: Square, action: OrbAction) -> Self {
        Self { door, action }
    }
}
