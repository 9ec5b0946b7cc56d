#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative room state for the room simulation engine.
//!
//! A [`Room`] owns the two-layer tile grid, the monster, orb, scroll and exit
//! registries, and the per-movement path maps. Turns resolve through
//! [`process_command`]; editing tools mutate the room through [`edit`] and
//! read it through [`query`].

mod doors;
pub mod edit;
mod exits;
mod grid;
mod monsters;
mod orbs;
mod pathmap;
mod persist;
mod player;
pub mod query;
mod scrolls;
mod serpent;
mod stairs;
mod tar;
mod turn;
mod validate;

pub use pathmap::PathMap;
pub use stairs::StaircaseRepair;
pub use turn::process_command;

use roomsim_core::{
    EngineConfig, GridError, LevelId, MovementType, OpaqueTile, OverlayTile, RoomDimensions,
    RoomId, Square,
};

use crate::{
    exits::Exits, grid::Grid, monsters::Monsters, orbs::Orbs, pathmap::PathMapCache,
    player::Player, scrolls::Scrolls,
};

/// Represents one authoritative room and everything standing in it.
#[derive(Debug)]
pub struct Room {
    level: LevelId,
    id: RoomId,
    config: EngineConfig,
    turn: u32,
    grid: Grid,
    monsters: Monsters,
    orbs: Orbs,
    scrolls: Scrolls,
    exits: Exits,
    player: Option<Player>,
    path_maps: PathMapCache,
}

impl Room {
    /// Creates an empty floor-filled room sized by the configuration.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_identity(config, LevelId::new(0), RoomId::new(0))
    }

    /// Creates an empty floor-filled room tagged with level and room identifiers.
    #[must_use]
    pub fn with_identity(config: EngineConfig, level: LevelId, id: RoomId) -> Self {
        let dimensions = config.dimensions();
        Self {
            level,
            id,
            config,
            turn: 0,
            grid: Grid::new(dimensions),
            monsters: Monsters::default(),
            orbs: Orbs::default(),
            scrolls: Scrolls::default(),
            exits: Exits::default(),
            player: None,
            path_maps: PathMapCache::default(),
        }
    }

    fn dimensions(&self) -> RoomDimensions {
        self.grid.dimensions()
    }

    fn check(&self, square: Square) -> Result<(), GridError> {
        self.grid.check(square).map(|_| ())
    }

    /// Replaces an opaque tile; every terrain change passes through here.
    fn plot_opaque(&mut self, square: Square, tile: OpaqueTile) -> Result<OpaqueTile, GridError> {
        let previous = self.grid.set_opaque(square, tile)?;
        self.path_maps.invalidate_all();
        Ok(previous)
    }

    /// Replaces an overlay tile; every overlay change passes through here.
    fn plot_overlay(
        &mut self,
        square: Square,
        tile: OverlayTile,
    ) -> Result<OverlayTile, GridError> {
        let previous = self.grid.set_overlay(square, tile)?;
        self.path_maps.invalidate_all();
        Ok(previous)
    }

    fn live_player(&self) -> Option<Player> {
        self.player.filter(|player| player.alive)
    }

    fn player_square(&self) -> Option<Square> {
        self.live_player().map(|player| player.square)
    }

    /// Reports whether a live sword covers the square.
    fn is_guarded(&self, square: Square) -> bool {
        let dimensions = self.dimensions();
        let by_player = self
            .live_player()
            .and_then(|player| player.sword(dimensions))
            .is_some_and(|sword| sword == square);
        by_player || self.monsters.mimic_swords(dimensions).any(|sword| sword == square)
    }

    /// Reports whether a monster of the movement class may stand on the square.
    fn monster_can_enter(&self, square: Square, movement: MovementType) -> bool {
        let Some(cell) = self.grid.cell(square) else {
            return false;
        };
        movement.permits(cell.opaque, cell.overlay)
            && cell.occupant.is_none()
            && self.player_square() != Some(square)
            && !self.is_guarded(square)
    }
}
