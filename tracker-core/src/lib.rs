//! Core types for the event tracker.
//!
//! This crate holds everything the calendar needs apart from drawing it:
//! - `store` keeps the events of the current session in memory
//! - `controller` turns user gestures into store operations and owns the
//!   create/edit dialog state
//! - `view` is what a presentation layer renders after every gesture

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod filter;
pub mod store;
pub mod view;

pub use controller::{Controller, Dialog, Draft};
pub use event::{Event, EventId, Slot};
pub use filter::FilterMode;
pub use store::EventStore;
pub use view::{DialogKind, DialogView, EventView, View};
