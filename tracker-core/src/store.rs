//! In-memory event storage.
//!
//! Events live for the duration of the session only. Operations referring
//! to an unknown id are silently ignored, since a selection can outlive the
//! event it points at.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::event::{Event, EventId, Slot};
use crate::filter::FilterMode;

#[derive(Debug, Clone, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        EventStore::default()
    }

    /// Append a new event and return it.
    /// Returns None (and stores nothing) if the title is blank.
    pub fn add(&mut self, title: &str, location: &str, slot: Slot) -> Option<&Event> {
        if title.trim().is_empty() {
            return None;
        }

        let event = Event::new(title, location, slot);
        info!(id = %event.id, title = %event.title, "Created event");
        self.events.push(event);
        self.events.last()
    }

    /// Replace title and location of an event, keeping its id and times.
    /// Returns true if the event was found.
    pub fn update(&mut self, id: &EventId, title: &str, location: &str) -> bool {
        let Some(event) = self.events.iter_mut().find(|e| &e.id == id) else {
            return false;
        };

        event.title = title.to_string();
        event.location = location.to_string();
        info!(%id, title, "Updated event");
        true
    }

    /// Returns true if an event was removed.
    pub fn remove(&mut self, id: &EventId) -> bool {
        let before = self.events.len();
        self.events.retain(|e| &e.id != id);

        let removed = self.events.len() < before;
        if removed {
            info!(%id, "Deleted event");
        }
        removed
    }

    /// Events matching `mode` relative to `as_of`, in insertion order.
    pub fn filter(&self, mode: FilterMode, as_of: DateTime<Utc>) -> Vec<&Event> {
        self.events.iter().filter(|e| mode.matches(e, as_of)).collect()
    }

    pub fn get(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|e| &e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
