//! Exit regions leading out of the room.

use roomsim_core::{ExitRecord, Square};

/// Exit regions in lookup order; the first region containing a square wins.
#[derive(Clone, Debug, Default)]
pub(crate) struct Exits {
    records: Vec<ExitRecord>,
}

impl Exits {
    /// Adds the region, or updates the destination of an identical one.
    pub(crate) fn set(&mut self, record: ExitRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.region == record.region)
        {
            Some(existing) => existing.destination = record.destination,
            None => self.records.push(record),
        }
    }

    /// Index and record of the exit covering the square.
    pub(crate) fn at(&self, square: Square) -> Option<(usize, &ExitRecord)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, record)| record.region.contains(square))
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<ExitRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    pub(crate) fn records(&self) -> &[ExitRecord] {
        &self.records
    }
}
