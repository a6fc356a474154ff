//! Past/upcoming filtering of events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;
use crate::event::Event;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    /// Ended before the reference instant
    Past,
    /// Starts at or after the reference instant
    Upcoming,
}

impl FilterMode {
    /// Button order in the filter bar.
    pub const ALL: [FilterMode; 3] = [FilterMode::All, FilterMode::Past, FilterMode::Upcoming];

    /// An event running across `as_of` is neither past nor upcoming.
    pub fn matches(&self, event: &Event, as_of: DateTime<Utc>) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Past => event.is_past(as_of),
            FilterMode::Upcoming => event.is_upcoming(as_of),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilterMode::All => "All",
            FilterMode::Past => "Past",
            FilterMode::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            FilterMode::All => "all",
            FilterMode::Past => "past",
            FilterMode::Upcoming => "upcoming",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for FilterMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "past" => Ok(FilterMode::Past),
            "upcoming" => Ok(FilterMode::Upcoming),
            _ => Err(TrackerError::UnknownFilter(s.to_string())),
        }
    }
}
