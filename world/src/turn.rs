//! Resolution of one player command and the monster responses it triggers.

use roomsim_core::{
    Command, CorruptionError, CueData, CueEventKind, CueEvents, Direction, EngineConfig,
    EntityRef, Intent, MonsterId, MonsterKind, MonsterSnapshot, MovementType, OpaqueTile,
    OverlayTile, PlayerSnapshot, RoomDimensions, Square, TurnView,
};
use roomsim_system_behavior::Behavior;
use tracing::{debug, error};

use crate::{edit, Room};

/// Resolves one player turn and reports what happened through `cue`.
///
/// The bus is cleared first and deferred removals are committed, so payloads
/// from the previous call must not be used afterwards. A dead player turns the
/// call into a no-op. Corruption found by the end-of-turn validator is returned
/// and the room must be reloaded.
pub fn process_command(
    room: &mut Room,
    command: Command,
    cue: &mut CueEvents,
) -> Result<(), CorruptionError> {
    cue.clear();
    edit::commit(room);
    if room.player.is_some_and(|player| !player.alive) {
        return Ok(());
    }
    room.turn = room.turn.saturating_add(1);
    debug!(turn = room.turn, ?command, "processing command");

    room.resolve_player(command, cue)?;
    room.resolve_monsters(command, cue)?;

    let plotted = room.grid.take_plotted();
    if !plotted.is_empty() {
        cue.add_attached(CueEventKind::SquaresPlotted, CueData::Squares(plotted));
    }
    if room.config.validate_each_turn {
        room.validate()
            .inspect_err(|corruption| error!(%corruption, turn = room.turn, "room corrupted"))?;
    }
    Ok(())
}

impl Room {
    fn resolve_player(
        &mut self,
        command: Command,
        cue: &mut CueEvents,
    ) -> Result<(), CorruptionError> {
        let Some(player) = self.live_player() else {
            return Ok(());
        };
        let dimensions = self.dimensions();
        let sword_before = player.sword(dimensions);

        match command {
            Command::Move { direction } => self.step_player(direction, cue),
            Command::RotateClockwise | Command::RotateCounterClockwise => {
                let orientation = if command == Command::RotateClockwise {
                    player.orientation.clockwise()
                } else {
                    player.orientation.counter_clockwise()
                };
                if let Some(player) = self.player.as_mut() {
                    player.orientation = orientation;
                }
                cue.add_attached(CueEventKind::PlayerTurned, CueData::Direction(orientation));
            }
            Command::Wait => {}
        }

        let sword_after = self.live_player().and_then(|player| player.sword(dimensions));
        match sword_after {
            Some(sword) if sword_after != sword_before => self.strike(sword, false, cue),
            _ => Ok(()),
        }
    }

    fn step_player(&mut self, direction: Direction, cue: &mut CueEvents) {
        let Some(player) = self.live_player() else {
            return;
        };
        let Some(target) = self.dimensions().step(player.square, direction) else {
            cue.add_attached(CueEventKind::ExitRoomPending, CueData::Direction(direction));
            return;
        };
        let enterable = self.grid.cell(target).is_some_and(|cell| {
            cell.occupant.is_none() && edit::player_can_stand(cell.opaque, cell.overlay)
        });
        if !enterable {
            cue.add_attached(CueEventKind::BumpedObstacle, CueData::Square(target));
            return;
        }

        if self.grid.opaque(player.square) == Some(OpaqueTile::Trapdoor) {
            let _ = self.plot_opaque(player.square, OpaqueTile::Pit);
            cue.add_attached(CueEventKind::TrapdoorFell, CueData::Square(player.square));
        }
        if let Some(player) = self.player.as_mut() {
            player.square = target;
        }
        cue.add_attached(CueEventKind::PlayerMoved, CueData::Square(target));

        if let Some(scroll) = self.scrolls.id_at(target) {
            cue.add_borrowed(CueEventKind::ReadScroll, EntityRef::Scroll(scroll));
        }
        if self.grid.opaque(target) == Some(OpaqueTile::Stairs) {
            match self.exits.at(target) {
                Some((_, exit)) => cue.add_attached(
                    CueEventKind::ExitLevelPending,
                    CueData::Destination(exit.destination),
                ),
                None => cue.add(CueEventKind::ExitLevelPending, None),
            }
        }
    }

    /// Applies a sword blow to the square.
    fn strike(
        &mut self,
        square: Square,
        by_mimic: bool,
        cue: &mut CueEvents,
    ) -> Result<(), CorruptionError> {
        if let Some(id) = self.grid.occupant(square) {
            let Some((long, head, tail)) = self
                .monsters
                .get(id)
                .filter(|monster| monster.is_alive())
                .map(|monster| {
                    (
                        monster.kind.is_long(),
                        monster.square,
                        monster.segments.last().copied(),
                    )
                })
            else {
                return Ok(());
            };
            if !long || head == square {
                self.kill_monster(id, cue);
            } else if tail == Some(square) {
                self.shrink_serpent(id, cue);
            }
            return Ok(());
        }

        match self.grid.overlay(square) {
            Some(OverlayTile::Orb) => {
                let _ = self.activate_orb(square, cue, by_mimic)?;
                return Ok(());
            }
            Some(OverlayTile::Tar) => {
                let _ = self.cut_tar(square, cue);
                return Ok(());
            }
            _ => {}
        }

        if self.grid.opaque(square) == Some(OpaqueTile::CrumblyWall) {
            let _ = self.plot_opaque(square, OpaqueTile::Floor);
            cue.add_attached(CueEventKind::CrumblyWallDestroyed, CueData::Square(square));
        }
        Ok(())
    }

    fn resolve_monsters(
        &mut self,
        command: Command,
        cue: &mut CueEvents,
    ) -> Result<(), CorruptionError> {
        let behavior = Behavior::new();
        let mut tar_grown = false;
        for id in self.monsters.ids() {
            if self.player.is_some_and(|player| !player.alive) {
                break;
            }
            let Some(snapshot) = self
                .monsters
                .get(id)
                .filter(|monster| monster.is_alive())
                .map(|monster| monster.snapshot(id))
            else {
                continue;
            };

            if let Some(player) = self.player_square() {
                let _ = self
                    .path_maps
                    .ensure(&self.grid, snapshot.kind.movement(), player);
            }
            let intent = behavior.plan(&snapshot, &RoomView { room: self });
            if intent == Intent::GrowTar {
                // One ring per turn however many mothers ask for it.
                if !tar_grown {
                    tar_grown = true;
                    let _ = self.grow_tar(cue);
                }
                continue;
            }
            self.carry_out(id, &snapshot, intent, command, cue)?;
        }
        Ok(())
    }

    fn carry_out(
        &mut self,
        id: MonsterId,
        monster: &MonsterSnapshot,
        intent: Intent,
        command: Command,
        cue: &mut CueEvents,
    ) -> Result<(), CorruptionError> {
        match intent {
            Intent::Stay | Intent::GrowTar => Ok(()),
            Intent::Wake => {
                if let Some(eye) = self.monsters.get_mut(id) {
                    eye.awake = true;
                }
                cue.add_borrowed(CueEventKind::EvilEyeWoke, EntityRef::Monster(id));
                Ok(())
            }
            Intent::Mirror => self.mirror(id, monster, command, cue),
            Intent::Step(direction) => {
                self.step_monster(id, monster, direction, cue);
                Ok(())
            }
        }
    }

    fn step_monster(
        &mut self,
        id: MonsterId,
        monster: &MonsterSnapshot,
        direction: Direction,
        cue: &mut CueEvents,
    ) {
        let Some(target) = self.dimensions().step(monster.square, direction) else {
            return;
        };
        if monster.kind.is_long() && !direction.is_orthogonal() {
            return;
        }
        let attacks_player = self.player_square() == Some(target);
        let permitted = attacks_player || self.monster_can_enter(target, monster.kind.movement());
        if !permitted {
            debug!(kind = ?monster.kind, ?direction, "monster step refused");
            return;
        }

        if attacks_player {
            if let Some(player) = self.player.as_mut() {
                player.alive = false;
            }
            cue.add_attached(CueEventKind::PlayerDied, CueData::Square(target));
        }

        if monster.kind == MonsterKind::Serpent {
            let grow =
                EngineConfig::is_interval_turn(self.config.serpent_growth_interval, self.turn);
            self.advance_serpent(id, target, direction, grow);
            if grow {
                cue.add_borrowed(CueEventKind::SerpentGrew, EntityRef::Monster(id));
            }
        } else {
            self.relocate_monster(id, target, direction);
        }
    }

    fn mirror(
        &mut self,
        id: MonsterId,
        monster: &MonsterSnapshot,
        command: Command,
        cue: &mut CueEvents,
    ) -> Result<(), CorruptionError> {
        let dimensions = self.dimensions();
        let sword_before = dimensions.step(monster.square, monster.orientation);
        match command {
            Command::Move { direction } => {
                if let Some(target) = dimensions.step(monster.square, direction) {
                    if self.monster_can_enter(target, MovementType::Ground) {
                        self.relocate_monster(id, target, monster.orientation);
                    }
                }
            }
            Command::RotateClockwise => self.turn_monster(id, monster.orientation.clockwise()),
            Command::RotateCounterClockwise => {
                self.turn_monster(id, monster.orientation.counter_clockwise())
            }
            Command::Wait => {}
        }

        let sword_after = self
            .monsters
            .get(id)
            .and_then(|mimic| dimensions.step(mimic.square, mimic.orientation));
        match sword_after {
            Some(sword) if sword_after != sword_before && self.player_square() != Some(sword) => {
                self.strike(sword, true, cue)
            }
            _ => Ok(()),
        }
    }

    fn turn_monster(&mut self, id: MonsterId, orientation: Direction) {
        if let Some(monster) = self.monsters.get_mut(id) {
            monster.orientation = orientation;
        }
    }
}

/// Read-only view handed to the behavior system.
struct RoomView<'a> {
    room: &'a Room,
}

impl TurnView for RoomView<'_> {
    fn dimensions(&self) -> RoomDimensions {
        self.room.dimensions()
    }

    fn turn(&self) -> u32 {
        self.room.turn
    }

    fn config(&self) -> &EngineConfig {
        &self.room.config
    }

    fn player(&self) -> Option<PlayerSnapshot> {
        self.room
            .live_player()
            .map(|player| player.snapshot(self.room.dimensions()))
    }

    fn opaque(&self, square: Square) -> Option<OpaqueTile> {
        self.room.grid.opaque(square)
    }

    fn overlay(&self, square: Square) -> Option<OverlayTile> {
        self.room.grid.overlay(square)
    }

    fn occupant(&self, square: Square) -> Option<MonsterId> {
        self.room.grid.occupant(square)
    }

    fn is_guarded(&self, square: Square) -> bool {
        self.room.is_guarded(square)
    }

    fn path_distance(&self, movement: MovementType, square: Square) -> Option<u16> {
        let origin = self.room.player_square()?;
        self.room
            .path_maps
            .get(movement)
            .filter(|map| map.origin() == origin)
            .and_then(|map| map.steps(square))
    }
}
