//! Gesture handling between the calendar grid and the event store.
//!
//! At most one dialog is open at a time. A dialog only opens from
//! `Dialog::Idle`, so creating and editing can never overlap.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::event::{EventId, Slot};
use crate::filter::FilterMode;
use crate::store::EventStore;
use crate::view::View;

/// In-progress form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Idle,
    /// A free slot was selected; saving adds a new event over it.
    Creating { slot: Slot, draft: Draft },
    /// An existing event was selected.
    Editing { id: EventId, draft: Draft },
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Idle)
    }

    fn draft_mut(&mut self) -> Option<&mut Draft> {
        match self {
            Dialog::Idle => None,
            Dialog::Creating { draft, .. } | Dialog::Editing { draft, .. } => Some(draft),
        }
    }
}

/// Owns the event store and the transient dialog state.
///
/// Every `on_*` gesture returns true when it changed something and false
/// when it was ignored. Ignored gestures are never errors.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    store: EventStore,
    dialog: Dialog,
    filter: FilterMode,
}

impl Controller {
    pub fn new(store: EventStore, filter: FilterMode) -> Self {
        Controller {
            store,
            dialog: Dialog::Idle,
            filter,
        }
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    // GESTURES:

    pub fn on_slot_selected(&mut self, slot: Slot) -> bool {
        if self.dialog.is_open() {
            debug!("Ignoring slot selection while a dialog is open");
            return false;
        }

        debug!(start = %slot.start, end = %slot.end, "Opening create dialog");
        self.dialog = Dialog::Creating {
            slot,
            draft: Draft::default(),
        };
        true
    }

    pub fn on_event_selected(&mut self, id: &EventId) -> bool {
        if self.dialog.is_open() {
            debug!("Ignoring event selection while a dialog is open");
            return false;
        }

        let Some(event) = self.store.get(id) else {
            debug!(%id, "Ignoring selection of unknown event");
            return false;
        };

        debug!(%id, "Opening edit dialog");
        self.dialog = Dialog::Editing {
            id: *id,
            draft: Draft {
                title: event.title.clone(),
                location: event.location.clone(),
            },
        };
        true
    }

    pub fn on_draft_title_changed(&mut self, text: &str) -> bool {
        match self.dialog.draft_mut() {
            Some(draft) => {
                draft.title = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn on_draft_location_changed(&mut self, text: &str) -> bool {
        match self.dialog.draft_mut() {
            Some(draft) => {
                draft.location = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Commit the open dialog. Returns true if the dialog closed.
    ///
    /// A create dialog with a blank title stays open with its draft intact.
    pub fn on_save_requested(&mut self) -> bool {
        match std::mem::take(&mut self.dialog) {
            Dialog::Idle => false,
            Dialog::Creating { slot, draft } => {
                if self.store.add(&draft.title, &draft.location, slot).is_some() {
                    true
                } else {
                    debug!("Blank title, keeping create dialog open");
                    self.dialog = Dialog::Creating { slot, draft };
                    false
                }
            }
            Dialog::Editing { id, draft } => {
                // The event may have been removed since it was selected
                if !self.store.update(&id, &draft.title, &draft.location) {
                    debug!(%id, "Edited event no longer exists");
                }
                true
            }
        }
    }

    /// Only the edit dialog can delete.
    pub fn on_delete_requested(&mut self) -> bool {
        let Dialog::Editing { id, .. } = &self.dialog else {
            return false;
        };

        let id = *id;
        self.store.remove(&id);
        self.dialog = Dialog::Idle;
        true
    }

    pub fn on_cancel_requested(&mut self) -> bool {
        if !self.dialog.is_open() {
            return false;
        }

        debug!("Dialog dismissed");
        self.dialog = Dialog::Idle;
        true
    }

    pub fn on_filter_mode_changed(&mut self, mode: FilterMode) {
        debug!(%mode, "Filter changed");
        self.filter = mode;
    }

    /// What to draw right now. Recomputed on every call.
    pub fn view(&self, now: DateTime<Utc>) -> View {
        View::build(&self.store, &self.dialog, self.filter, now)
    }
}
