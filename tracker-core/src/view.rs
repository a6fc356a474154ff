//! Render data handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::controller::Dialog;
use crate::event::{Event, EventId, Slot};
use crate::filter::FilterMode;
use crate::store::EventStore;

#[derive(Debug, Clone, Serialize)]
pub struct View {
    /// Events passing the current filter, in store order
    pub events: Vec<EventView>,
    pub dialog: DialogView,
    /// Active filter, for highlighting its control
    pub filter: FilterMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub id: EventId,
    pub title: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Ended before the instant the view was built at
    pub is_past: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    None,
    Creating,
    Editing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogView {
    pub kind: DialogKind,
    pub title: String,
    pub location: String,
    /// Interval being created or edited
    pub slot: Option<Slot>,
    pub event_id: Option<EventId>,
}

impl View {
    pub(crate) fn build(
        store: &EventStore,
        dialog: &Dialog,
        filter: FilterMode,
        now: DateTime<Utc>,
    ) -> Self {
        let events = store
            .filter(filter, now)
            .into_iter()
            .map(|event| EventView::new(event, now))
            .collect();

        View {
            events,
            dialog: DialogView::new(store, dialog),
            filter,
        }
    }
}

impl EventView {
    pub fn new(event: &Event, now: DateTime<Utc>) -> Self {
        EventView {
            id: event.id,
            title: event.title.clone(),
            location: event.location.clone(),
            start: event.start,
            end: event.end,
            is_past: event.is_past(now),
        }
    }
}

impl DialogView {
    fn new(store: &EventStore, dialog: &Dialog) -> Self {
        match dialog {
            Dialog::Idle => DialogView {
                kind: DialogKind::None,
                title: String::new(),
                location: String::new(),
                slot: None,
                event_id: None,
            },
            Dialog::Creating { slot, draft } => DialogView {
                kind: DialogKind::Creating,
                title: draft.title.clone(),
                location: draft.location.clone(),
                slot: Some(*slot),
                event_id: None,
            },
            Dialog::Editing { id, draft } => DialogView {
                kind: DialogKind::Editing,
                title: draft.title.clone(),
                location: draft.location.clone(),
                slot: store.get(id).map(Event::slot),
                event_id: Some(*id),
            },
        }
    }
}
