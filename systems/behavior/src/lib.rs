#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic monster behavior system that turns room snapshots into intents.
//!
//! The system never mutates the room. It reads a [`TurnView`], decides what a
//! single monster wants to do and hands back an [`Intent`]; the room validates
//! and commits the result.

use roomsim_core::{
    Direction, EngineConfig, Intent, MonsterKind, MonsterSnapshot, MovementType, OpaqueTile,
    OverlayTile, PlayerSnapshot, Square, TurnView,
};

/// Pure system that plans one monster action at a time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Behavior;

impl Behavior {
    /// Creates the behavior system.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decides what the monster intends to do this turn.
    #[must_use]
    pub fn plan<V: TurnView>(&self, monster: &MonsterSnapshot, view: &V) -> Intent {
        match monster.kind {
            MonsterKind::Roach | MonsterKind::WraithWing | MonsterKind::TarBaby => {
                seek(monster, view)
            }
            MonsterKind::EvilEye => {
                if monster.awake {
                    return seek(monster, view);
                }
                match view.player() {
                    Some(player) if sees_player(monster, &player, view) => Intent::Wake,
                    _ => Intent::Stay,
                }
            }
            MonsterKind::TarMother => {
                let interval = view.config().tar_growth_interval;
                if EngineConfig::is_interval_turn(interval, view.turn()) {
                    Intent::GrowTar
                } else {
                    Intent::Stay
                }
            }
            MonsterKind::Serpent => slither(monster, view),
            MonsterKind::Mimic => Intent::Mirror,
        }
    }
}

fn seek<V: TurnView>(monster: &MonsterSnapshot, view: &V) -> Intent {
    let Some(player) = view.player() else {
        return Intent::Stay;
    };
    let movement = monster.kind.movement();

    if let Some(direction) = Direction::between(monster.square, player.square) {
        if view.can_enter(player.square, movement) {
            return Intent::Step(direction);
        }
    }

    if let Some(direction) = descend_path_map(monster.square, player.square, movement, view) {
        return Intent::Step(direction);
    }

    approach_directly(monster.square, player.square, movement, view)
        .map_or(Intent::Stay, Intent::Step)
}

fn descend_path_map<V: TurnView>(
    from: Square,
    target: Square,
    movement: MovementType,
    view: &V,
) -> Option<Direction> {
    let current = view.path_distance(movement, from)?;
    let preferred = Direction::toward(from, target);
    let dimensions = view.dimensions();
    let mut best: Option<Candidate> = None;

    for direction in Direction::ALL {
        let Some(next) = dimensions.step(from, direction) else {
            continue;
        };
        if !view.can_enter(next, movement) {
            continue;
        }
        let Some(distance) = view.path_distance(movement, next) else {
            continue;
        };
        if distance >= current {
            continue;
        }

        let candidate = Candidate {
            direction,
            distance,
            preferred: Some(direction) == preferred,
        };
        best = Some(match best {
            Some(existing) if !candidate.is_better_than(existing) => existing,
            _ => candidate,
        });
    }

    best.map(|candidate| candidate.direction)
}

fn approach_directly<V: TurnView>(
    from: Square,
    target: Square,
    movement: MovementType,
    view: &V,
) -> Option<Direction> {
    let direct = Direction::toward(from, target)?;
    let (dx, dy) = direct.delta();
    let fallbacks = [
        Some(direct),
        Direction::from_delta(dx, 0),
        Direction::from_delta(0, dy),
    ];
    fallbacks.into_iter().flatten().find(|direction| {
        view.dimensions()
            .step(from, *direction)
            .is_some_and(|next| view.can_enter(next, movement))
    })
}

fn slither<V: TurnView>(monster: &MonsterSnapshot, view: &V) -> Intent {
    let Some(player) = view.player() else {
        return Intent::Stay;
    };
    let from = monster.square;
    let target = player.square;
    let horizontal = Direction::from_delta(target.column().cmp(&from.column()) as i32, 0);
    let vertical = Direction::from_delta(0, target.row().cmp(&from.row()) as i32);
    let order = if from.column().abs_diff(target.column()) >= from.row().abs_diff(target.row()) {
        [horizontal, vertical]
    } else {
        [vertical, horizontal]
    };

    order
        .into_iter()
        .flatten()
        .find(|direction| {
            view.dimensions()
                .step(from, *direction)
                .is_some_and(|next| view.can_enter(next, MovementType::Ground))
        })
        .map_or(Intent::Stay, Intent::Step)
}

fn sees_player<V: TurnView>(monster: &MonsterSnapshot, player: &PlayerSnapshot, view: &V) -> bool {
    let dimensions = view.dimensions();
    let mut square = monster.square;
    while let Some(next) = dimensions.step(square, monster.orientation) {
        if next == player.square {
            return true;
        }
        if blocks_sight(view.opaque(next), view.overlay(next)) {
            return false;
        }
        square = next;
    }
    false
}

fn blocks_sight(opaque: Option<OpaqueTile>, overlay: Option<OverlayTile>) -> bool {
    matches!(
        opaque,
        None | Some(OpaqueTile::Wall | OpaqueTile::CrumblyWall | OpaqueTile::DoorClosed)
    ) || matches!(overlay, Some(OverlayTile::Obstacle | OverlayTile::Tar))
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    direction: Direction,
    distance: u16,
    preferred: bool,
}

impl Candidate {
    fn is_better_than(&self, other: Candidate) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }
        self.preferred && !other.preferred
    }
}
