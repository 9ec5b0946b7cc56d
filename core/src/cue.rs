//! Per-turn notification bus reporting what happened while a command resolved.

use strum::{EnumCount, IntoEnumIterator};

use crate::{Direction, LevelId, MonsterId, OrbId, ScrollId, Square};

/// Kinds of notifications a turn may raise.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[strum(serialize_all = "snake_case")]
pub enum CueEventKind {
    /// The player stepped onto a new square.
    PlayerMoved,
    /// The player rotated in place.
    PlayerTurned,
    /// The player tried to step into something solid.
    BumpedObstacle,
    /// The player was killed.
    PlayerDied,
    /// A monster was slain.
    MonsterDied,
    /// The player's sword struck an orb.
    OrbActivated,
    /// A mimic's sword struck an orb.
    OrbActivatedByMimic,
    /// A door opened.
    DoorOpened,
    /// A door closed.
    DoorClosed,
    /// A crumbly wall broke under a sword.
    CrumblyWallDestroyed,
    /// A trapdoor dropped away behind the player.
    TrapdoorFell,
    /// A tar square was cut away.
    TarDestroyed,
    /// Tar expanded by one ring.
    TarGrew,
    /// Unstable tar growth turned into a tar baby.
    TarBabyFormed,
    /// A serpent grew a segment.
    SerpentGrew,
    /// A serpent lost its tail segment.
    SerpentShrank,
    /// An evil eye spotted the player.
    EvilEyeWoke,
    /// The player stepped onto a scroll.
    ReadScroll,
    /// The player reached a staircase.
    ExitLevelPending,
    /// The player walked off the edge of the room.
    ExitRoomPending,
    /// Squares were replotted during the turn.
    SquaresPlotted,
}

/// Payload owned by the bus and dropped when it clears.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CueData {
    /// A single square.
    Square(Square),
    /// An ordered list of squares.
    Squares(Vec<Square>),
    /// An orientation.
    Direction(Direction),
    /// Destination level of a pending exit.
    Destination(LevelId),
    /// Free text.
    Text(String),
}

/// Payload borrowed from the room, valid until the next commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    /// A monster stored in the room.
    Monster(MonsterId),
    /// An orb stored in the room.
    Orb(OrbId),
    /// A scroll stored in the room.
    Scroll(ScrollId),
}

/// Data attached to one occurrence of a cue event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CuePayload {
    /// Owned by the bus.
    Attached(CueData),
    /// Borrowed from the room.
    Borrowed(EntityRef),
}

impl CuePayload {
    /// Square carried by the payload, if any.
    #[must_use]
    pub fn square(&self) -> Option<Square> {
        match self {
            Self::Attached(CueData::Square(square)) => Some(*square),
            _ => None,
        }
    }

    /// Entity handle carried by the payload, if any.
    #[must_use]
    pub fn entity(&self) -> Option<EntityRef> {
        match self {
            Self::Borrowed(entity) => Some(*entity),
            Self::Attached(_) => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
struct Slot {
    count: u32,
    payloads: Vec<CuePayload>,
}

/// Multiset of cue events raised during a single turn.
#[derive(Clone, Debug)]
pub struct CueEvents {
    slots: Vec<Slot>,
}

impl Default for CueEvents {
    fn default() -> Self {
        Self {
            slots: vec![Slot::default(); CueEventKind::COUNT],
        }
    }
}

impl CueEvents {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one occurrence of the kind, optionally with a payload.
    pub fn add(&mut self, kind: CueEventKind, payload: Option<CuePayload>) {
        let slot = &mut self.slots[kind as usize];
        slot.count = slot.count.saturating_add(1);
        if let Some(payload) = payload {
            slot.payloads.push(payload);
        }
    }

    /// Records one occurrence carrying bus-owned data.
    pub fn add_attached(&mut self, kind: CueEventKind, data: CueData) {
        self.add(kind, Some(CuePayload::Attached(data)));
    }

    /// Records one occurrence carrying a room-owned handle.
    pub fn add_borrowed(&mut self, kind: CueEventKind, entity: EntityRef) {
        self.add(kind, Some(CuePayload::Borrowed(entity)));
    }

    /// Reports whether the kind occurred at least once.
    #[must_use]
    pub fn has_occurred(&self, kind: CueEventKind) -> bool {
        self.slots[kind as usize].count > 0
    }

    /// Number of occurrences of the kind.
    #[must_use]
    pub fn occurrence_count(&self, kind: CueEventKind) -> u32 {
        self.slots[kind as usize].count
    }

    /// First payload attached to the kind.
    #[must_use]
    pub fn first_payload(&self, kind: CueEventKind) -> Option<&CuePayload> {
        self.slots[kind as usize].payloads.first()
    }

    /// Every payload attached to the kind, in the order added.
    pub fn payloads(&self, kind: CueEventKind) -> impl Iterator<Item = &CuePayload> + '_ {
        self.slots[kind as usize].payloads.iter()
    }

    /// Kinds that occurred, in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = CueEventKind> + '_ {
        CueEventKind::iter().filter(move |kind| self.has_occurred(*kind))
    }

    /// Reports whether nothing occurred.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.count == 0)
    }

    /// Forgets every occurrence and drops owned payloads.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.count = 0;
            slot.payloads.clear();
        }
    }
}
