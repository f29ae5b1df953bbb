use heapless::{Deque, Vec};

use crate::{event::EventRecord, TRIM_EDGE};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    /// The log was full; `dropped` middle events were discarded first.
    Trimmed { dropped: usize },
}

/// Bounded, insertion-ordered log of serialized events.
///
/// When full, the next append keeps the oldest and newest [`TRIM_EDGE`]
/// records, drops everything between them and then appends. Capacities too
/// small for two full edges plus the new record shrink the edges to
/// `(CAP - 1) / 2`.
pub struct EventLog<const CAP: usize> {
    events: Deque<EventRecord, CAP>,
}

impl<const CAP: usize> EventLog<CAP> {
    const NON_EMPTY: () = assert!(CAP > 0, "event log capacity must be at least 1");

    const EDGE: usize = if CAP > 2 * TRIM_EDGE {
        TRIM_EDGE
    } else {
        (CAP - 1) / 2
    };

    pub const fn new() -> Self {
        let () = Self::NON_EMPTY;
        Self {
            events: Deque::new(),
        }
    }

    pub const fn capacity(&self) -> usize {
        CAP
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn append(&mut self, record: EventRecord) -> AppendOutcome {
        let outcome = if self.events.len() >= CAP {
            AppendOutcome::Trimmed {
                dropped: self.trim(),
            }
        } else {
            AppendOutcome::Appended
        };
        // Cannot fail: trim leaves at most 2 * EDGE < CAP records.
        let _ = self.events.push_back(record);
        outcome
    }

    /// Ordered read-only view; the log is left untouched.
    pub fn snapshot(&self) -> Snapshot<'_> {
        let (front, back) = self.events.as_slices();
        Snapshot { front, back }
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    fn trim(&mut self) -> usize {
        let edge = Self::EDGE;
        let mut head: Vec<EventRecord, TRIM_EDGE> = Vec::new();
        for _ in 0..edge {
            if let Some(record) = self.events.pop_front() {
                let _ = head.push(record);
            }
        }

        let mut dropped = 0;
        while self.events.len() > edge {
            self.events.pop_front();
            dropped += 1;
        }

        while let Some(record) = head.pop() {
            let _ = self.events.push_front(record);
        }
        dropped
    }
}

impl<const CAP: usize> Default for EventLog<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// Borrowed, ordered view of the log contents at one instant.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    front: &'a [EventRecord],
    back: &'a [EventRecord],
}

impl<'a> Snapshot<'a> {
    pub const fn empty() -> Self {
        Self {
            front: &[],
            back: &[],
        }
    }

    pub fn len(&self) -> usize {
        self.front.len() + self.back.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&'a EventRecord> {
        match index.checked_sub(self.front.len()) {
            None => self.front.get(index),
            Some(back_index) => self.back.get(back_index),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a EventRecord> + 'a {
        self.front.iter().chain(self.back.iter())
    }
}

#[cfg(test)]
mod tests;
