//! Slot store: a fixed ring of one-minute slots forming the rolling window.
//!
//! Slot `m` lives at index `m % capacity`. Advancing to minute `m + 1`
//! clears whatever older slot occupied that index, so at most `capacity`
//! slots are ever live.

use crate::core::extract::Record;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of slots in the rolling window.
pub const WINDOW_SLOTS: usize = 5;

/// Records collected during one minute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Logical minute this slot belongs to
    pub minute: u64,
    /// When the slot became current
    pub opened_at: DateTime<Utc>,
    /// Records appended while the slot was current
    pub records: Vec<Record>,
}

impl Slot {
    fn open(minute: u64, opened_at: DateTime<Utc>) -> Self {
        Self {
            minute,
            opened_at,
            records: Vec::new(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Ring of time slots with one current slot.
#[derive(Debug, Clone)]
pub struct SlotStore {
    slots: Vec<Slot>,
    capacity: usize,
    current_minute: u64,
}

impl SlotStore {
    /// Create a store with the standard window length, opening minute 0 now.
    pub fn new() -> Self {
        Self::with_capacity(WINDOW_SLOTS, Utc::now())
    }

    /// Create a store holding `capacity` slots, opening minute 0 at `opened_at`.
    pub fn with_capacity(capacity: usize, opened_at: DateTime<Utc>) -> Self {
        let capacity = capacity.max(1);
        let mut slots = Vec::with_capacity(capacity);
        slots.push(Slot::open(0, opened_at));

        Self {
            slots,
            capacity,
            current_minute: 0,
        }
    }

    /// Window length in slots.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Minute of the slot currently receiving records.
    pub fn current_minute(&self) -> u64 {
        self.current_minute
    }

    fn index_of(&self, minute: u64) -> usize {
        (minute % self.capacity() as u64) as usize
    }

    /// Append a record to the current slot.
    pub fn append(&mut self, record: Record) {
        let index = self.index_of(self.current_minute);
        self.slots[index].records.push(record);
    }

    /// Seal the current slot and open the next one.
    ///
    /// Once the ring is full, the new slot takes the place of the oldest,
    /// and that slot's records are dropped. Returns how many were dropped.
    pub fn advance(&mut self, now: DateTime<Utc>) -> usize {
        self.current_minute += 1;
        let index = self.index_of(self.current_minute);
        let slot = Slot::open(self.current_minute, now);

        if index < self.slots.len() {
            std::mem::replace(&mut self.slots[index], slot).record_count()
        } else {
            self.slots.push(slot);
            0
        }
    }

    /// First minute still held in the window.
    pub fn first_live_minute(&self) -> u64 {
        (self.current_minute + 1).saturating_sub(self.capacity() as u64)
    }

    /// Live slots from oldest to newest, the current slot last.
    pub fn live_slots(&self) -> impl Iterator<Item = &Slot> + '_ {
        (self.first_live_minute()..=self.current_minute)
            .map(move |m| &self.slots[self.index_of(m)])
    }

    /// Every record in the window, oldest slot first.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.live_slots().flat_map(|slot| slot.records.iter())
    }

    /// Total number of records in the window.
    pub fn record_count(&self) -> usize {
        self.live_slots().map(Slot::record_count).sum()
    }
}

impl Default for SlotStore {
    fn default() -> Self {
        Self::new()
    }
}
