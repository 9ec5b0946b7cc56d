//! Conversion between rooms and their persisted layouts.

use roomsim_core::{
    CorruptionError, EditError, EngineConfig, LoadError, MonsterRecord, OpaqueTile, OrbRecord,
    OverlayTile, PlayerRecord, RoomLayout, ScrollRecord,
};
use tracing::debug;

use crate::{edit, Room};

impl Room {
    /// Builds a room from a persisted layout and validates it.
    ///
    /// Serpent pieces stored in the overlay layer are ignored and redrawn from
    /// the monster records. Orb and scroll tiles without a record get an empty
    /// one. The configuration's room size is replaced by the layout's.
    pub fn load(layout: &RoomLayout, config: EngineConfig) -> Result<Self, LoadError> {
        let dimensions = layout.dimensions();
        let expected = dimensions.square_count();
        for (layer, actual) in [("opaque", layout.opaque.len()), ("overlay", layout.overlay.len())] {
            if actual != expected {
                return Err(LoadError::LayerLength {
                    layer,
                    expected,
                    actual,
                });
            }
        }

        let config = EngineConfig {
            columns: layout.columns,
            rows: layout.rows,
            ..config
        };
        let mut room = Room::with_identity(config, layout.level, layout.room);

        let codes = layout.opaque.iter().zip(layout.overlay.iter());
        for (index, (square, (opaque, overlay))) in dimensions.squares().zip(codes).enumerate() {
            let opaque = OpaqueTile::from_code(*opaque)
                .map_err(|source| LoadError::TileCode { index, source })?;
            let overlay = match OverlayTile::from_code(*overlay)
                .map_err(|source| LoadError::TileCode { index, source })?
            {
                OverlayTile::Serpent(_) => OverlayTile::Empty,
                tile => tile,
            };
            let _ = room.grid.set_opaque(square, opaque).map_err(EditError::from)?;
            let _ = room.grid.set_overlay(square, overlay).map_err(EditError::from)?;
        }

        for square in room.grid.squares_with_overlay(OverlayTile::Orb) {
            let _ = room.orbs.insert(square);
        }
        for record in &layout.orbs {
            room.check(record.square).map_err(EditError::from)?;
            if room.orbs.id_at(record.square).is_none() {
                return Err(CorruptionError::OrbRecordMismatch(record.square).into());
            }
            for agent in &record.agents {
                room.add_orb_agent(record.square, *agent)?;
            }
        }

        for square in room.grid.squares_with_overlay(OverlayTile::Scroll) {
            let _ = room.scrolls.set_text(square, String::new());
        }
        for record in &layout.scrolls {
            room.check(record.square).map_err(EditError::from)?;
            if room.scrolls.id_at(record.square).is_none() {
                return Err(CorruptionError::ScrollRecordMismatch(record.square).into());
            }
            let _ = room.scrolls.set_text(record.square, record.text.clone());
        }

        for exit in &layout.exits {
            edit::set_exit(&mut room, exit.region, exit.destination)?;
        }
        if let Some(player) = layout.player {
            edit::place_player(&mut room, player.square, player.orientation)?;
        }
        for record in &layout.monsters {
            let _ = room.add_monster(record.kind, record.square, record.orientation, record.awake)?;
            for segment in &record.segments {
                room.append_serpent_segment(record.square, *segment)?;
            }
        }

        room.validate()?;
        let _ = room.grid.take_plotted();
        room.path_maps.invalidate_all();
        debug!(
            level = layout.level.get(),
            room = layout.room.get(),
            monsters = layout.monsters.len(),
            "room loaded"
        );
        Ok(room)
    }

    /// Captures the room as a persisted layout.
    ///
    /// Monsters awaiting removal are left out.
    #[must_use]
    pub fn to_layout(&self) -> RoomLayout {
        let dimensions = self.dimensions();
        RoomLayout {
            level: self.level,
            room: self.id,
            columns: dimensions.columns(),
            rows: dimensions.rows(),
            opaque: self.grid.opaque_codes(),
            overlay: self.grid.overlay_codes(),
            orbs: self
                .orbs
                .iter()
                .map(|(_, orb)| OrbRecord {
                    square: orb.square,
                    agents: orb.agents.clone(),
                })
                .collect(),
            scrolls: self
                .scrolls
                .iter()
                .map(|(_, scroll)| ScrollRecord {
                    square: scroll.square,
                    text: scroll.text.clone(),
                })
                .collect(),
            exits: self.exits.records().to_vec(),
            monsters: self
                .monsters
                .ordered()
                .filter(|(_, monster)| monster.is_alive())
                .map(|(_, monster)| MonsterRecord {
                    kind: monster.kind,
                    square: monster.square,
                    orientation: monster.orientation,
                    awake: monster.awake,
                    segments: monster.segments.clone(),
                })
                .collect(),
            player: self.live_player().map(|player| PlayerRecord {
                square: player.square,
                orientation: player.orientation,
            }),
        }
    }
}
