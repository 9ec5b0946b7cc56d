//! Orb registry and the orb-to-door signal network.

use std::collections::{BTreeMap, BTreeSet};

use roomsim_core::{
    CorruptionError, CueData, CueEventKind, CueEvents, EditError, EntityRef, OpaqueTile,
    OrbAction, OrbAgent, OrbId, Square,
};
use slotmap::SlotMap;
use tracing::debug;

use crate::{doors::door_squares, Room};

#[derive(Clone, Debug)]
pub(crate) struct Orb {
    pub(crate) square: Square,
    pub(crate) agents: Vec<OrbAgent>,
}

/// Arena of orbs keyed by the square they sit on.
#[derive(Clone, Debug, Default)]
pub(crate) struct Orbs {
    arena: SlotMap<OrbId, Orb>,
    by_square: BTreeMap<Square, OrbId>,
}

impl Orbs {
    /// Registers an orb on the square, reusing the existing one.
    pub(crate) fn insert(&mut self, square: Square) -> OrbId {
        if let Some(id) = self.by_square.get(&square) {
            return *id;
        }
        let id = self.arena.insert(Orb {
            square,
            agents: Vec::new(),
        });
        let _ = self.by_square.insert(square, id);
        id
    }

    pub(crate) fn remove_at(&mut self, square: Square) -> Option<Orb> {
        let id = self.by_square.remove(&square)?;
        self.arena.remove(id)
    }

    pub(crate) fn id_at(&self, square: Square) -> Option<OrbId> {
        self.by_square.get(&square).copied()
    }

    pub(crate) fn get(&self, id: OrbId) -> Option<&Orb> {
        self.arena.get(id)
    }

    /// Orbs in square order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (OrbId, &Orb)> + '_ {
        self.by_square
            .values()
            .filter_map(|id| self.arena.get(*id).map(|orb| (*id, orb)))
    }

    /// Keeps at most one agent per orb among those targeting `door`.
    pub(crate) fn dedupe_agents(&mut self, door: &BTreeSet<Square>) -> usize {
        let mut removed = 0;
        for orb in self.arena.values_mut() {
            let mut seen = false;
            let before = orb.agents.len();
            orb.agents.retain(|agent| {
                if !door.contains(&agent.door) {
                    return true;
                }
                let keep = !seen;
                seen = true;
                keep
            });
            removed += before - orb.agents.len();
        }
        removed
    }

    /// Moves agents targeting `square` to `replacement`, or drops them.
    pub(crate) fn retarget_agents(
        &mut self,
        square: Square,
        replacement: Option<Square>,
    ) -> (usize, usize) {
        let (mut moved, mut dropped) = (0, 0);
        for orb in self.arena.values_mut() {
            match replacement {
                Some(target) => {
                    for agent in orb.agents.iter_mut().filter(|agent| agent.door == square) {
                        agent.door = target;
                        moved += 1;
                    }
                }
                None => {
                    let before = orb.agents.len();
                    orb.agents.retain(|agent| agent.door != square);
                    dropped += before - orb.agents.len();
                }
            }
        }
        (moved, dropped)
    }
}

impl Room {
    /// Binds the orb on `orb_square` to a door, replacing any agent for the same door.
    pub(crate) fn add_orb_agent(
        &mut self,
        orb_square: Square,
        agent: OrbAgent,
    ) -> Result<(), EditError> {
        self.check(orb_square)?;
        self.check(agent.door)?;
        let id = self
            .orbs
            .id_at(orb_square)
            .ok_or(EditError::NoOrb(orb_square))?;
        let door = door_squares(&self.grid, agent.door);
        if door.is_empty() {
            return Err(EditError::NoDoor(agent.door));
        }
        let Some(orb) = self.orbs.arena.get_mut(id) else {
            return Err(EditError::NoOrb(orb_square));
        };
        match orb
            .agents
            .iter_mut()
            .find(|existing| door.contains(&existing.door))
        {
            Some(existing) => *existing = agent,
            None => orb.agents.push(agent),
        }
        Ok(())
    }

    /// Unbinds the orb from the door containing `door_square`.
    pub(crate) fn remove_orb_agent(
        &mut self,
        orb_square: Square,
        door_square: Square,
    ) -> Result<OrbAgent, EditError> {
        self.check(orb_square)?;
        self.check(door_square)?;
        let id = self
            .orbs
            .id_at(orb_square)
            .ok_or(EditError::NoOrb(orb_square))?;
        let mut targets = door_squares(&self.grid, door_square);
        if targets.is_empty() {
            targets.push(door_square);
        }
        let orb = self
            .orbs
            .arena
            .get_mut(id)
            .ok_or(EditError::NoOrb(orb_square))?;
        let position = orb
            .agents
            .iter()
            .position(|agent| targets.contains(&agent.door))
            .ok_or(EditError::NoAgent(orb_square))?;
        Ok(orb.agents.remove(position))
    }

    /// Agents of every orb that target the door containing `door_square`.
    pub(crate) fn find_agents_for(&self, door_square: Square) -> Vec<(OrbId, Square, OrbAgent)> {
        let mut targets = door_squares(&self.grid, door_square);
        if targets.is_empty() {
            targets.push(door_square);
        }
        self.orbs
            .iter()
            .flat_map(|(id, orb)| {
                orb.agents
                    .iter()
                    .filter(|agent| targets.contains(&agent.door))
                    .map(move |agent| (id, orb.square, *agent))
            })
            .collect()
    }

    /// Fires every agent of the orb on `orb_square`.
    ///
    /// Returns `Ok(false)` when no orb sits there. Every agent is resolved
    /// before any door moves, so a dangling agent leaves the doors untouched.
    pub(crate) fn activate_orb(
        &mut self,
        orb_square: Square,
        cue: &mut CueEvents,
        by_mimic: bool,
    ) -> Result<bool, CorruptionError> {
        let Some(id) = self.orbs.id_at(orb_square) else {
            return Ok(false);
        };
        let agents = self
            .orbs
            .get(id)
            .map(|orb| orb.agents.clone())
            .unwrap_or_default();

        let mut plans = Vec::with_capacity(agents.len());
        for agent in agents {
            let door = door_squares(&self.grid, agent.door);
            if door.is_empty() {
                return Err(CorruptionError::DanglingAgent {
                    orb: id,
                    door: agent.door,
                });
            }
            plans.push((agent, door));
        }

        let kind = if by_mimic {
            CueEventKind::OrbActivatedByMimic
        } else {
            CueEventKind::OrbActivated
        };
        cue.add_borrowed(kind, EntityRef::Orb(id));

        for (agent, door) in plans {
            let open = self.grid.opaque(agent.door) == Some(OpaqueTile::DoorOpen);
            let wanted = match agent.action {
                OrbAction::Toggle => !open,
                OrbAction::Open => true,
                OrbAction::Close => false,
                OrbAction::None => continue,
            };
            if wanted == open {
                continue;
            }
            let (tile, event) = if wanted {
                (OpaqueTile::DoorOpen, CueEventKind::DoorOpened)
            } else {
                (OpaqueTile::DoorClosed, CueEventKind::DoorClosed)
            };
            for square in &door {
                let _ = self.plot_opaque(*square, tile);
            }
            let anchor = door[0];
            debug!(
                column = anchor.column(),
                row = anchor.row(),
                open = wanted,
                "door changed state"
            );
            cue.add_attached(event, CueData::Square(anchor));
        }
        Ok(true)
    }
}
