use proptest::prelude::*;
use roomsim_core::{
    Command, CueEvents, Direction, EngineConfig, MonsterKind, OpaqueTile, OrbAction, OrbAgent,
    OverlayTile, Square, Substance, Tile,
};
use roomsim_world::{edit, process_command, query, Room};

fn room(size: u32) -> Room {
    Room::new(EngineConfig {
        columns: size,
        rows: size,
        tar_growth_interval: 3,
        serpent_growth_interval: 4,
        ..EngineConfig::new()
    })
}

fn squares(size: u32) -> impl Iterator<Item = Square> {
    (0..size).flat_map(move |column| (0..size).map(move |row| Square::new(column, row)))
}

fn square(size: u32) -> impl Strategy<Value = Square> {
    (0..size, 0..size).prop_map(|(column, row)| Square::new(column, row))
}

#[derive(Clone, Debug)]
enum SubstanceEdit {
    Plot(Square, OverlayTile),
    Fix(Substance),
}

fn substance_edit() -> impl Strategy<Value = SubstanceEdit> {
    let tiles = vec![OverlayTile::Tar, OverlayTile::Obstacle, OverlayTile::Empty];
    prop_oneof![
        4 => (square(6), prop::sample::select(tiles))
            .prop_map(|(square, tile)| SubstanceEdit::Plot(square, tile)),
        1 => prop::sample::select(vec![Substance::Tar, Substance::Obstacle])
            .prop_map(SubstanceEdit::Fix),
    ]
}

#[derive(Clone, Debug)]
enum DoorEdit {
    Plot(Square, OpaqueTile),
    Bind(Square, OrbAction),
    Unbind(Square),
}

fn door_edit() -> impl Strategy<Value = DoorEdit> {
    let tiles = vec![OpaqueTile::DoorClosed, OpaqueTile::DoorOpen, OpaqueTile::Floor];
    let actions = vec![OrbAction::Toggle, OrbAction::Open, OrbAction::Close];
    prop_oneof![
        4 => (square(6), prop::sample::select(tiles))
            .prop_map(|(square, tile)| DoorEdit::Plot(square, tile)),
        2 => (square(6), prop::sample::select(actions))
            .prop_map(|(square, action)| DoorEdit::Bind(square, action)),
        1 => square(6).prop_map(DoorEdit::Unbind),
    ]
}

#[derive(Clone, Debug)]
enum SegmentEdit {
    Append(Direction),
    RemoveTail,
    RemoveHead,
}

fn segment_edit() -> impl Strategy<Value = SegmentEdit> {
    prop_oneof![
        4 => prop::sample::select(Direction::ORTHOGONAL.to_vec()).prop_map(SegmentEdit::Append),
        1 => Just(SegmentEdit::RemoveTail),
        1 => Just(SegmentEdit::RemoveHead),
    ]
}

fn command() -> impl Strategy<Value = Command> {
    prop_oneof![
        4 => prop::sample::select(Direction::ALL.to_vec())
            .prop_map(|direction| Command::Move { direction }),
        1 => Just(Command::RotateClockwise),
        1 => Just(Command::RotateCounterClockwise),
        1 => Just(Command::Wait),
    ]
}

fn assert_agents_unique(room: &Room) -> Result<(), TestCaseError> {
    for orb in query::orbs(room) {
        for (index, agent) in orb.agents.iter().enumerate() {
            let door = query::all_door_squares(room, agent.door).expect("agent inside the room");
            prop_assert!(!door.is_empty(), "agent targets a non-door square");
            for other in &orb.agents[index + 1..] {
                prop_assert!(!door.contains(&other.door), "two agents share a door");
            }
        }
    }
    Ok(())
}

fn furnished_room() -> Room {
    let mut room = room(9);
    for wall in [Square::new(4, 3), Square::new(4, 4), Square::new(4, 5)] {
        edit::plot(&mut room, wall, Tile::Opaque(OpaqueTile::Wall)).expect("inside");
    }
    edit::plot(&mut room, Square::new(7, 1), Tile::Opaque(OpaqueTile::CrumblyWall))
        .expect("inside");
    edit::plot(&mut room, Square::new(6, 7), Tile::Opaque(OpaqueTile::DoorClosed))
        .expect("inside");
    let _ = edit::add_orb_to_square(&mut room, Square::new(2, 6)).expect("orb placed");
    edit::add_orb_agent(
        &mut room,
        Square::new(2, 6),
        OrbAgent::new(Square::new(6, 7), OrbAction::Toggle),
    )
    .expect("door exists");
    for tar in [
        Square::new(6, 3),
        Square::new(7, 3),
        Square::new(6, 4),
        Square::new(7, 4),
    ] {
        edit::plot(&mut room, tar, Tile::Overlay(OverlayTile::Tar)).expect("inside");
    }
    let monsters = [
        (MonsterKind::Roach, Square::new(8, 8)),
        (MonsterKind::WraithWing, Square::new(0, 8)),
        (MonsterKind::TarMother, Square::new(8, 0)),
        (MonsterKind::Mimic, Square::new(2, 2)),
        (MonsterKind::EvilEye, Square::new(0, 4)),
        (MonsterKind::Serpent, Square::new(6, 0)),
    ];
    for (kind, square) in monsters {
        let _ = edit::add_new_monster(&mut room, kind, square, Direction::East).expect("free");
    }
    edit::append_serpent_segment(&mut room, Square::new(6, 0), Square::new(5, 0))
        .expect("adjacent");
    edit::place_player(&mut room, Square::new(1, 1), Direction::South).expect("floor");
    room
}

proptest! {
    #[test]
    fn substances_are_stable_after_fixing(edits in prop::collection::vec(substance_edit(), 0..48)) {
        let mut room = room(6);
        for edit in edits {
            match edit {
                SubstanceEdit::Plot(square, tile) => {
                    edit::plot(&mut room, square, Tile::Overlay(tile)).expect("free square");
                }
                SubstanceEdit::Fix(substance) => {
                    let _ = edit::fix_unstable(&mut room, substance);
                }
            }
        }
        let _ = edit::fix_unstable(&mut room, Substance::Tar);
        let _ = edit::fix_unstable(&mut room, Substance::Obstacle);

        for square in squares(6) {
            for substance in [Substance::Tar, Substance::Obstacle] {
                prop_assert_eq!(query::is_stable(&room, square, substance), Ok(true));
            }
        }
    }

    #[test]
    fn each_orb_holds_one_agent_per_door(edits in prop::collection::vec(door_edit(), 0..48)) {
        let mut room = room(6);
        let orb = Square::new(0, 0);
        let _ = edit::add_orb_to_square(&mut room, orb).expect("orb placed");
        for edit in edits {
            match edit {
                DoorEdit::Plot(square, tile) => {
                    edit::plot(&mut room, square, Tile::Opaque(tile)).expect("inside");
                }
                DoorEdit::Bind(door, action) => {
                    let _ = edit::add_orb_agent(&mut room, orb, OrbAgent::new(door, action));
                }
                DoorEdit::Unbind(door) => {
                    let _ = edit::remove_orb_agent(&mut room, orb, door);
                }
            }
            assert_agents_unique(&room)?;
            prop_assert_eq!(query::validate(&room), Ok(()));
        }
    }

    #[test]
    fn serpent_chains_stay_simple_paths(edits in prop::collection::vec(segment_edit(), 0..40)) {
        let mut room = room(7);
        let _ = edit::add_new_monster(&mut room, MonsterKind::Serpent, Square::new(3, 3), Direction::North)
            .expect("free floor");
        for edit in edits {
            let Some(serpent) = query::monsters(&room).into_iter().next() else {
                break;
            };
            let tail = serpent.segments.last().copied().unwrap_or(serpent.square);
            match edit {
                SegmentEdit::Append(direction) => {
                    if let Some(target) = query::dimensions(&room).step(tail, direction) {
                        let _ = edit::append_serpent_segment(&mut room, serpent.square, target);
                    }
                }
                SegmentEdit::RemoveTail => {
                    edit::remove_serpent_segment(&mut room, tail).expect("tail is an end");
                }
                SegmentEdit::RemoveHead => {
                    edit::remove_serpent_segment(&mut room, serpent.square).expect("head is an end");
                }
            }

            if let Some(serpent) = query::monsters(&room).into_iter().next() {
                let chain: Vec<Square> = std::iter::once(serpent.square)
                    .chain(serpent.segments.iter().copied())
                    .collect();
                for pair in chain.windows(2) {
                    prop_assert!(pair[0].is_orthogonally_adjacent(pair[1]));
                }
                let mut unique = chain.clone();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), chain.len());
            }
            prop_assert_eq!(query::validate(&room), Ok(()));
        }
    }

    #[test]
    fn turns_never_corrupt_the_room(commands in prop::collection::vec(command(), 0..30)) {
        let mut room = furnished_room();
        let mut cue = CueEvents::new();
        for command in commands {
            prop_assert_eq!(process_command(&mut room, command, &mut cue), Ok(()));
        }
        prop_assert_eq!(query::validate(&room), Ok(()));
    }
}
