//! Monster registry and lifecycle.

use roomsim_core::{
    CueEventKind, CueEvents, Direction, EntityRef, MonsterId, MonsterKind, MonsterSnapshot,
    OverlayTile, PlacementRejected, RoomDimensions, Square,
};
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::Room;

/// Lifecycle of a monster between placement and physical removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LifeState {
    Alive,
    /// Still occupies its squares until the next commit.
    MarkedDead,
}

#[derive(Clone, Debug)]
pub(crate) struct Monster {
    pub(crate) kind: MonsterKind,
    pub(crate) square: Square,
    pub(crate) orientation: Direction,
    pub(crate) awake: bool,
    /// Body squares from the head outward.
    pub(crate) segments: Vec<Square>,
    pub(crate) state: LifeState,
}

impl Monster {
    pub(crate) fn is_alive(&self) -> bool {
        self.state == LifeState::Alive
    }

    pub(crate) fn squares(&self) -> impl Iterator<Item = Square> + '_ {
        std::iter::once(self.square).chain(self.segments.iter().copied())
    }

    pub(crate) fn snapshot(&self, id: MonsterId) -> MonsterSnapshot {
        MonsterSnapshot {
            id,
            kind: self.kind,
            square: self.square,
            orientation: self.orientation,
            awake: self.awake,
            segments: self.segments.clone(),
        }
    }
}

/// Arena of monsters plus their processing order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Monsters {
    arena: SlotMap<MonsterId, Monster>,
    order: Vec<MonsterId>,
}

impl Monsters {
    pub(crate) fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.arena.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.arena.get_mut(id)
    }

    /// Processing order snapshot; stays valid while monsters are added or killed.
    pub(crate) fn ids(&self) -> Vec<MonsterId> {
        self.order.clone()
    }

    pub(crate) fn ordered(&self) -> impl Iterator<Item = (MonsterId, &Monster)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.arena.get(*id).map(|monster| (*id, monster)))
    }

    fn insert(&mut self, monster: Monster) -> MonsterId {
        let id = self.arena.insert(monster);
        self.order.push(id);
        id
    }

    fn remove(&mut self, id: MonsterId) -> Option<Monster> {
        self.order.retain(|candidate| *candidate != id);
        self.arena.remove(id)
    }

    fn dead(&self) -> Vec<MonsterId> {
        self.ordered()
            .filter(|(_, monster)| !monster.is_alive())
            .map(|(id, _)| id)
            .collect()
    }

    /// Sword squares of every live mimic.
    pub(crate) fn mimic_swords(
        &self,
        dimensions: RoomDimensions,
    ) -> impl Iterator<Item = Square> + '_ {
        self.ordered()
            .filter(|(_, monster)| monster.kind == MonsterKind::Mimic && monster.is_alive())
            .filter_map(move |(_, monster)| dimensions.step(monster.square, monster.orientation))
    }
}

impl Room {
    /// Places a new single-square monster after checking the square.
    pub(crate) fn add_monster(
        &mut self,
        kind: MonsterKind,
        square: Square,
        orientation: Direction,
        awake: bool,
    ) -> Result<MonsterId, PlacementRejected> {
        self.check(square)?;
        if self.grid.occupant(square).is_some() {
            return Err(PlacementRejected::Occupied(square));
        }
        if self.player_square() == Some(square) {
            return Err(PlacementRejected::PlayerPresent(square));
        }
        let permitted = self
            .grid
            .cell(square)
            .is_some_and(|cell| kind.movement().permits(cell.opaque, cell.overlay));
        if !permitted {
            return Err(PlacementRejected::Obstructed(square));
        }

        let id = self.monsters.insert(Monster {
            kind,
            square,
            orientation,
            awake,
            segments: Vec::new(),
            state: LifeState::Alive,
        });
        let _ = self.grid.set_occupant(square, Some(id))?;
        self.path_maps.invalidate_all();
        debug!(?kind, column = square.column(), row = square.row(), "monster placed");
        Ok(id)
    }

    /// Marks the monster dead; its squares stay occupied until the next commit.
    pub(crate) fn kill_monster(&mut self, id: MonsterId, cue: &mut CueEvents) {
        let Some(monster) = self.monsters.get_mut(id) else {
            return;
        };
        if !monster.is_alive() {
            return;
        }
        monster.state = LifeState::MarkedDead;
        debug!(kind = ?monster.kind, "monster killed");
        cue.add_borrowed(CueEventKind::MonsterDied, EntityRef::Monster(id));
    }

    /// Moves a single-square monster one step.
    pub(crate) fn relocate_monster(&mut self, id: MonsterId, to: Square, facing: Direction) {
        let Some(monster) = self.monsters.get_mut(id) else {
            return;
        };
        let from = std::mem::replace(&mut monster.square, to);
        monster.orientation = facing;
        if self.grid.occupant(from) == Some(id) {
            let _ = self.grid.set_occupant(from, None);
        }
        if let Err(error) = self.grid.set_occupant(to, Some(id)) {
            warn!(%error, "monster moved outside the room");
        }
    }

    /// Unlinks every monster marked dead and clears its squares.
    pub(crate) fn remove_dead_monsters(&mut self) {
        for id in self.monsters.dead() {
            self.remove_monster_now(id);
        }
    }

    /// Removes a monster immediately, clearing occupancy and body tiles.
    pub(crate) fn remove_monster_now(&mut self, id: MonsterId) {
        let Some(monster) = self.monsters.remove(id) else {
            return;
        };
        for square in monster.squares() {
            if self.grid.occupant(square) == Some(id) {
                let _ = self.grid.set_occupant(square, None);
            }
        }
        for square in &monster.segments {
            if self.grid.overlay(*square).is_some_and(OverlayTile::is_serpent) {
                let _ = self.plot_overlay(*square, OverlayTile::Empty);
            }
        }
        self.path_maps.invalidate_all();
    }
}
