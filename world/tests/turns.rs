use roomsim_core::{
    Command, CueData, CueEventKind, CueEvents, CuePayload, Direction, EngineConfig, EntityRef,
    LevelId, MonsterKind, OpaqueTile, OrbAction, OrbAgent, OverlayTile, RectSize, Square,
    SquareRect, Tile,
};
use roomsim_world::{edit, process_command, query, Room};

fn room_with(config: EngineConfig) -> Room {
    Room::new(config)
}

fn room(columns: u32, rows: u32) -> Room {
    room_with(EngineConfig {
        columns,
        rows,
        ..EngineConfig::new()
    })
}

fn plot(room: &mut Room, square: Square, tile: Tile) {
    edit::plot(room, square, tile).expect("plot inside the room");
}

fn play(room: &mut Room, cue: &mut CueEvents, command: Command) {
    process_command(room, command, cue).expect("room stays consistent");
}

fn step(direction: Direction) -> Command {
    Command::Move { direction }
}

fn first_square(cue: &CueEvents, kind: CueEventKind) -> Option<Square> {
    cue.first_payload(kind).and_then(CuePayload::square)
}

#[test]
fn walls_stop_the_player_and_floor_does_not() {
    let mut room = room(5, 5);
    plot(&mut room, Square::new(3, 2), Tile::Opaque(OpaqueTile::Wall));
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::East));
    assert_eq!(
        first_square(&cue, CueEventKind::BumpedObstacle),
        Some(Square::new(3, 2))
    );
    assert!(!cue.has_occurred(CueEventKind::PlayerMoved));

    play(&mut room, &mut cue, step(Direction::West));
    assert!(!cue.has_occurred(CueEventKind::BumpedObstacle));
    assert_eq!(
        first_square(&cue, CueEventKind::PlayerMoved),
        Some(Square::new(1, 2))
    );
    let player = query::player(&room).expect("player alive");
    assert_eq!(player.square, Square::new(1, 2));
    assert_eq!(player.sword, Some(Square::new(1, 1)));
    assert_eq!(query::turn(&room), 2);
}

#[test]
fn stepping_off_the_room_edge_requests_a_room_change() {
    let mut room = room(5, 5);
    edit::place_player(&mut room, Square::new(0, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::West));

    assert_eq!(
        cue.first_payload(CueEventKind::ExitRoomPending),
        Some(&CuePayload::Attached(CueData::Direction(Direction::West)))
    );
    assert_eq!(
        query::player(&room).map(|player| player.square),
        Some(Square::new(0, 2))
    );
}

#[test]
fn rotating_the_sword_onto_a_roach_kills_it() {
    let mut room = room(7, 7);
    let roach = edit::add_new_monster(
        &mut room,
        MonsterKind::Roach,
        Square::new(4, 2),
        Direction::South,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(3, 3), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::RotateClockwise);

    assert_eq!(
        cue.first_payload(CueEventKind::PlayerTurned),
        Some(&CuePayload::Attached(CueData::Direction(Direction::NorthEast)))
    );
    assert_eq!(
        cue.first_payload(CueEventKind::MonsterDied),
        Some(&CuePayload::Borrowed(EntityRef::Monster(roach)))
    );
    assert!(!query::is_monster_alive(&room, roach));
    assert!(query::monster_at(&room, Square::new(4, 2))
        .expect("in range")
        .is_some());

    play(&mut room, &mut cue, Command::Wait);
    assert_eq!(query::monster_at(&room, Square::new(4, 2)), Ok(None));
    assert!(query::player(&room).is_some());
}

#[test]
fn a_roach_closes_in_and_kills_the_player() {
    let mut room = room(7, 7);
    let _ = edit::add_new_monster(
        &mut room,
        MonsterKind::Roach,
        Square::new(5, 3),
        Direction::South,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(3, 3), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);
    let roach = query::monster_at(&room, Square::new(4, 3))
        .expect("in range")
        .expect("roach stepped west");
    assert_eq!(roach.orientation, Direction::West);

    play(&mut room, &mut cue, Command::Wait);
    assert_eq!(
        first_square(&cue, CueEventKind::PlayerDied),
        Some(Square::new(3, 3))
    );
    assert!(query::player(&room).is_none());
    assert!(query::is_player_dead(&room));

    play(&mut room, &mut cue, step(Direction::South));
    assert!(cue.is_empty());
    assert_eq!(query::turn(&room), 2);
}

#[test]
fn serpents_slide_along_the_longer_axis() {
    let mut room = room(9, 5);
    let head = Square::new(6, 2);
    let _ = edit::add_new_monster(&mut room, MonsterKind::Serpent, head, Direction::West)
        .expect("free floor");
    edit::append_serpent_segment(&mut room, head, Square::new(7, 2)).expect("adjacent");
    edit::append_serpent_segment(&mut room, head, Square::new(8, 2)).expect("adjacent");
    edit::place_player(&mut room, Square::new(1, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);

    let serpent = query::monster_at(&room, Square::new(5, 2))
        .expect("in range")
        .expect("head moved west");
    assert_eq!(serpent.segments, vec![Square::new(6, 2), Square::new(7, 2)]);
    assert_eq!(
        query::overlay_tile(&room, Square::new(8, 2)),
        Ok(OverlayTile::Empty)
    );
    assert!(query::overlay_tile(&room, Square::new(7, 2))
        .expect("in range")
        .is_serpent());
    assert!(!cue.has_occurred(CueEventKind::SerpentGrew));
    assert!(cue.has_occurred(CueEventKind::SquaresPlotted));
}

#[test]
fn striking_a_serpent_tail_shortens_it() {
    let mut room = room(8, 6);
    let head = Square::new(5, 1);
    let _ = edit::add_new_monster(&mut room, MonsterKind::Serpent, head, Direction::West)
        .expect("free floor");
    edit::append_serpent_segment(&mut room, head, Square::new(4, 1)).expect("adjacent");
    edit::append_serpent_segment(&mut room, head, Square::new(3, 1)).expect("adjacent");
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::RotateClockwise);

    assert_eq!(
        first_square(&cue, CueEventKind::SerpentShrank),
        Some(Square::new(3, 1))
    );
    assert!(!cue.has_occurred(CueEventKind::MonsterDied));
    let serpent = query::monster_at(&room, Square::new(5, 2))
        .expect("in range")
        .expect("head turned south");
    assert_eq!(serpent.segments, vec![Square::new(5, 1)]);
    for cleared in [Square::new(3, 1), Square::new(4, 1)] {
        assert_eq!(query::overlay_tile(&room, cleared), Ok(OverlayTile::Empty));
        assert_eq!(query::monster_at(&room, cleared), Ok(None));
    }
}

#[test]
fn swords_break_crumbly_walls() {
    let mut room = room(5, 5);
    plot(&mut room, Square::new(3, 1), Tile::Opaque(OpaqueTile::CrumblyWall));
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::RotateClockwise);

    assert_eq!(
        first_square(&cue, CueEventKind::CrumblyWallDestroyed),
        Some(Square::new(3, 1))
    );
    assert_eq!(
        query::opaque_tile(&room, Square::new(3, 1)),
        Ok(OpaqueTile::Floor)
    );
    assert_eq!(
        cue.first_payload(CueEventKind::SquaresPlotted),
        Some(&CuePayload::Attached(CueData::Squares(vec![Square::new(3, 1)])))
    );
}

#[test]
fn leaving_a_trapdoor_drops_it_into_a_pit() {
    let mut room = room(5, 5);
    plot(&mut room, Square::new(1, 1), Tile::Opaque(OpaqueTile::Trapdoor));
    edit::place_player(&mut room, Square::new(1, 1), Direction::East).expect("trapdoor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::East));

    assert_eq!(
        first_square(&cue, CueEventKind::TrapdoorFell),
        Some(Square::new(1, 1))
    );
    assert_eq!(
        query::opaque_tile(&room, Square::new(1, 1)),
        Ok(OpaqueTile::Pit)
    );
    assert_eq!(
        first_square(&cue, CueEventKind::PlayerMoved),
        Some(Square::new(2, 1))
    );
}

#[test]
fn stairs_report_the_destination_level() {
    let mut room = room(5, 5);
    plot(&mut room, Square::new(2, 1), Tile::Opaque(OpaqueTile::Stairs));
    let region = SquareRect::from_origin_and_size(Square::new(2, 1), RectSize::new(1, 1));
    edit::set_exit(&mut room, region, LevelId::new(4)).expect("exit fits");
    edit::place_player(&mut room, Square::new(1, 1), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::East));

    assert_eq!(
        cue.first_payload(CueEventKind::ExitLevelPending),
        Some(&CuePayload::Attached(CueData::Destination(LevelId::new(4))))
    );
}

#[test]
fn stepping_on_a_scroll_reads_it() {
    let mut room = room(5, 5);
    let _ = edit::set_scroll_text_at_square(&mut room, Square::new(2, 1), "hello")
        .expect("empty square");
    edit::place_player(&mut room, Square::new(1, 1), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::East));

    let Some(EntityRef::Scroll(scroll)) = cue
        .first_payload(CueEventKind::ReadScroll)
        .and_then(CuePayload::entity)
    else {
        panic!("scroll handle expected");
    };
    assert_eq!(query::scroll_text(&room, scroll), Some("hello"));
}

#[test]
fn striking_an_orb_opens_its_door() {
    let mut room = room(6, 6);
    let orb = Square::new(3, 1);
    let door = Square::new(4, 4);
    plot(&mut room, door, Tile::Opaque(OpaqueTile::DoorClosed));
    let _ = edit::add_orb_to_square(&mut room, orb).expect("orb placed");
    edit::add_orb_agent(&mut room, orb, OrbAgent::new(door, OrbAction::Toggle))
        .expect("door exists");
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::RotateClockwise);

    assert!(cue.has_occurred(CueEventKind::OrbActivated));
    assert_eq!(first_square(&cue, CueEventKind::DoorOpened), Some(door));
    assert_eq!(query::opaque_tile(&room, door), Ok(OpaqueTile::DoorOpen));
}

#[test]
fn cutting_exposed_tar_clears_the_unstable_rest() {
    let mut room = room(5, 5);
    for square in [
        Square::new(3, 1),
        Square::new(4, 1),
        Square::new(3, 2),
        Square::new(4, 2),
    ] {
        plot(&mut room, square, Tile::Overlay(OverlayTile::Tar));
    }
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::RotateClockwise);

    assert_eq!(cue.occurrence_count(CueEventKind::TarDestroyed), 4);
    assert_eq!(
        first_square(&cue, CueEventKind::TarDestroyed),
        Some(Square::new(3, 1))
    );
    for column in 0..5 {
        for row in 0..5 {
            assert_ne!(
                query::overlay_tile(&room, Square::new(column, row)),
                Ok(OverlayTile::Tar)
            );
        }
    }
}

#[test]
fn tar_mothers_grow_tar_on_interval_turns() {
    let mut room = room_with(EngineConfig {
        columns: 8,
        rows: 8,
        tar_growth_interval: 1,
        ..EngineConfig::new()
    });
    for square in [
        Square::new(3, 3),
        Square::new(4, 3),
        Square::new(3, 4),
        Square::new(4, 4),
    ] {
        plot(&mut room, square, Tile::Overlay(OverlayTile::Tar));
    }
    let _ = edit::add_new_monster(
        &mut room,
        MonsterKind::TarMother,
        Square::new(0, 0),
        Direction::South,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(7, 7), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);

    let Some(CuePayload::Attached(CueData::Squares(grown))) =
        cue.first_payload(CueEventKind::TarGrew)
    else {
        panic!("tar growth expected");
    };
    assert_eq!(grown.len(), 8);
    assert!(grown.contains(&Square::new(3, 2)));
    assert!(!cue.has_occurred(CueEventKind::TarBabyFormed));
    assert_eq!(
        query::overlay_tile(&room, Square::new(5, 4)),
        Ok(OverlayTile::Tar)
    );
}

#[test]
fn several_mothers_grow_a_single_ring_per_turn() {
    let mut room = room_with(EngineConfig {
        columns: 8,
        rows: 8,
        tar_growth_interval: 1,
        ..EngineConfig::new()
    });
    for square in [
        Square::new(3, 3),
        Square::new(4, 3),
        Square::new(3, 4),
        Square::new(4, 4),
    ] {
        plot(&mut room, square, Tile::Overlay(OverlayTile::Tar));
    }
    for mother in [Square::new(0, 0), Square::new(7, 0)] {
        let _ = edit::add_new_monster(&mut room, MonsterKind::TarMother, mother, Direction::South)
            .expect("free floor");
    }
    edit::place_player(&mut room, Square::new(7, 7), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);

    assert_eq!(cue.occurrence_count(CueEventKind::TarGrew), 1);
    let tar = (0..8)
        .flat_map(|column| (0..8).map(move |row| Square::new(column, row)))
        .filter(|square| query::overlay_tile(&room, *square) == Ok(OverlayTile::Tar))
        .count();
    assert_eq!(tar, 12, "one ring of eight around the original block");
}

#[test]
fn growth_without_room_to_spread_raises_no_event() {
    let mut room = room_with(EngineConfig {
        columns: 6,
        rows: 6,
        tar_growth_interval: 1,
        ..EngineConfig::new()
    });
    let _ = edit::add_new_monster(
        &mut room,
        MonsterKind::TarMother,
        Square::new(0, 0),
        Direction::South,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(5, 5), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);

    assert!(
        !cue.has_occurred(CueEventKind::TarGrew),
        "no tar in the room means nothing grew"
    );
}

#[test]
fn unstable_growth_hatches_tar_babies() {
    let mut room = room(8, 8);
    for square in [
        Square::new(3, 3),
        Square::new(4, 3),
        Square::new(3, 4),
        Square::new(4, 4),
    ] {
        plot(&mut room, square, Tile::Overlay(OverlayTile::Tar));
    }
    plot(&mut room, Square::new(4, 2), Tile::Overlay(OverlayTile::Obstacle));
    let mut cue = CueEvents::new();

    let grown = edit::grow_tar(&mut room, &mut cue);

    assert_eq!(grown.len(), 6);
    assert!(!grown.contains(&Square::new(3, 2)));
    assert_eq!(cue.occurrence_count(CueEventKind::TarBabyFormed), 1);
    let baby = query::monster_at(&room, Square::new(3, 2))
        .expect("in range")
        .expect("tar baby hatched");
    assert_eq!(baby.kind, MonsterKind::TarBaby);
    assert!(baby.awake);
}

#[test]
fn evil_eyes_wake_when_they_see_the_player() {
    let mut room = room(7, 5);
    let eye = edit::add_new_monster(
        &mut room,
        MonsterKind::EvilEye,
        Square::new(5, 2),
        Direction::West,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(1, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, Command::Wait);
    assert_eq!(
        cue.first_payload(CueEventKind::EvilEyeWoke),
        Some(&CuePayload::Borrowed(EntityRef::Monster(eye)))
    );
    assert_eq!(
        query::monster(&room, eye).map(|snapshot| (snapshot.square, snapshot.awake)),
        Some((Square::new(5, 2), true))
    );

    play(&mut room, &mut cue, Command::Wait);
    assert_eq!(
        query::monster(&room, eye).map(|snapshot| snapshot.square),
        Some(Square::new(4, 2))
    );
}

#[test]
fn mimics_copy_the_move_and_strike_with_their_own_sword() {
    let mut room = room(6, 6);
    let _ = edit::add_orb_to_square(&mut room, Square::new(3, 3)).expect("orb placed");
    let _ = edit::add_new_monster(
        &mut room,
        MonsterKind::Mimic,
        Square::new(2, 4),
        Direction::North,
    )
    .expect("free floor");
    edit::place_player(&mut room, Square::new(2, 2), Direction::North).expect("floor");
    let mut cue = CueEvents::new();

    play(&mut room, &mut cue, step(Direction::East));

    assert!(cue.has_occurred(CueEventKind::OrbActivatedByMimic));
    assert!(!cue.has_occurred(CueEventKind::OrbActivated));
    let mimic = query::monster_at(&room, Square::new(3, 4))
        .expect("in range")
        .expect("mimic moved east");
    assert_eq!(mimic.orientation, Direction::North);
}
