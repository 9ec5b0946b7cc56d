//! Scroll texts keyed by the square they lie on.

use std::collections::BTreeMap;

use roomsim_core::{ScrollId, Square};
use slotmap::SlotMap;

#[derive(Clone, Debug)]
pub(crate) struct Scroll {
    pub(crate) square: Square,
    pub(crate) text: String,
}

/// Scroll texts keyed by square.
///
/// Removed scrolls are retired rather than dropped so handles reported during
/// a turn keep resolving until the next commit.
#[derive(Clone, Debug, Default)]
pub(crate) struct Scrolls {
    arena: SlotMap<ScrollId, Scroll>,
    by_square: BTreeMap<Square, ScrollId>,
    retired: Vec<ScrollId>,
}

impl Scrolls {
    /// Sets the text on the square, creating the scroll if needed.
    pub(crate) fn set_text(&mut self, square: Square, text: String) -> ScrollId {
        if let Some(id) = self.by_square.get(&square).copied() {
            if let Some(scroll) = self.arena.get_mut(id) {
                scroll.text = text;
                return id;
            }
        }
        let id = self.arena.insert(Scroll { square, text });
        let _ = self.by_square.insert(square, id);
        id
    }

    pub(crate) fn retire_at(&mut self, square: Square) -> Option<ScrollId> {
        let id = self.by_square.remove(&square)?;
        self.retired.push(id);
        Some(id)
    }

    pub(crate) fn release_retired(&mut self) {
        for id in self.retired.drain(..) {
            let _ = self.arena.remove(id);
        }
    }

    pub(crate) fn id_at(&self, square: Square) -> Option<ScrollId> {
        self.by_square.get(&square).copied()
    }

    /// Text of a live or retired scroll.
    pub(crate) fn text(&self, id: ScrollId) -> Option<&str> {
        self.arena.get(id).map(|scroll| scroll.text.as_str())
    }

    /// Square of a live or retired scroll.
    pub(crate) fn square(&self, id: ScrollId) -> Option<Square> {
        self.arena.get(id).map(|scroll| scroll.square)
    }

    /// Live scrolls in square order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (ScrollId, &Scroll)> + '_ {
        self.by_square
            .values()
            .filter_map(|id| self.arena.get(*id).map(|scroll| (*id, scroll)))
    }
}
