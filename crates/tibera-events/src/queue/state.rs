//! In-memory pending events plus the mutable emission context.

use std::collections::{HashSet, VecDeque};

use serde_json::Value;

use tibera_core::{Attributes, Event};

use crate::backoff::Backoff;

/// Everything guarded by the queue's state lock.
#[derive(Debug)]
pub(crate) struct QueueState {
    pub events: VecDeque<Event>,
    pub base_context: Attributes,
    pub session_id: Option<String>,
    pub backoff: Backoff,
    pub initialized: bool,
}

impl QueueState {
    pub fn new(backoff: Backoff) -> Self {
        Self {
            events: VecDeque::new(),
            base_context: Attributes::new(),
            session_id: None,
            backoff,
            initialized: false,
        }
    }

    /// Append and evict from the front until within `capacity`.
    /// Returns how many events were evicted.
    pub fn push(&mut self, event: Event, capacity: usize) -> usize {
        self.events.push_back(event);
        let mut evicted = 0;
        while self.events.len() > capacity {
            self.events.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Up to `size` events from the front, oldest first.
    pub fn front_batch(&self, size: usize) -> Vec<Event> {
        self.events.iter().take(size).cloned().collect()
    }

    /// Remove exactly the events of a delivered batch.
    ///
    /// Matching is by `event_id`, so events evicted while the batch was in
    /// flight are simply absent and nothing unsent is dropped.
    pub fn remove_delivered(&mut self, batch: &[Event]) -> usize {
        let sent: HashSet<&str> = batch.iter().map(|e| e.event_id.as_str()).collect();
        let before = self.events.len();
        self.events.retain(|e| !sent.contains(e.event_id.as_str()));
        before - self.events.len()
    }

    /// Put restored events ahead of anything already queued, dropping
    /// duplicate ids and clipping to the most recent `capacity`.
    pub fn restore(&mut self, restored: Vec<Event>, capacity: usize) -> usize {
        let mut seen: HashSet<String> = HashSet::new();
        let mut merged: VecDeque<Event> = VecDeque::with_capacity(restored.len() + self.events.len());
        for event in restored.into_iter().chain(self.events.drain(..)) {
            if seen.insert(event.event_id.clone()) {
                merged.push_back(event);
            }
        }
        let mut evicted = 0;
        while merged.len() > capacity {
            merged.pop_front();
            evicted += 1;
        }
        self.events = merged;
        evicted
    }

    /// Serialize the pending events as a JSON array.
    pub fn encode_snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }
}

/// Decode a persisted snapshot.
///
/// Anything that is not a JSON array yields nothing. Array entries that do
/// not decode as events are skipped. Returns the events and the number of
/// entries skipped.
pub(crate) fn decode_snapshot(raw: &str) -> (Vec<Event>, usize) {
    let items = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        _ => return (Vec::new(), 0),
    };

    let mut skipped = 0;
    let mut events = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Event>(item) {
            Ok(event) => events.push(event),
            Err(_) => skipped += 1,
        }
    }
    (events, skipped)
}
