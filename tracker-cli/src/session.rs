//! An interactive calendar session.
//!
//! Maps typed commands onto controller gestures and renders the result.
//! Events exist only for as long as the session does.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use tracker_core::config::TrackerConfig;
use tracker_core::{Controller, EventId, EventStore, EventView, FilterMode};

use crate::render::{covers, render_screen};
use crate::repl::ReplCommand;
use crate::when::{self, When};

pub enum Flow {
    /// Print this and wait for the next command
    Continue(String),
    Quit,
}

pub struct Session {
    controller: Controller,
    config: TrackerConfig,
    /// First day of the displayed month
    month: NaiveDate,
    json: bool,
}

impl Session {
    /// `filter` overrides the configured default filter.
    pub fn new(config: TrackerConfig, filter: Option<FilterMode>, month: NaiveDate, json: bool) -> Self {
        let filter = filter.unwrap_or(config.default_filter);

        Session {
            controller: Controller::new(EventStore::new(), filter),
            config,
            month: when::first_of_month(month),
            json,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn month(&self) -> NaiveDate {
        self.month
    }

    pub fn execute(&mut self, command: ReplCommand, now: DateTime<Utc>) -> Result<Flow> {
        let hint = match command {
            ReplCommand::New {
                when: words,
                duration,
                until,
            } => {
                let start = when::parse_when(&words.join(" "))?;
                let until = until.map(|words| when::parse_when(&words.join(" "))).transpose()?;
                let duration = duration.as_deref().map(when::parse_duration).transpose()?;
                let slot = when::slot_for(start, until, duration, self.config.default_event_duration())?;

                let opened = self.controller.on_slot_selected(slot);
                if opened {
                    let day = match start {
                        When::Day(day) => day,
                        When::At(at) => at.date(),
                    };
                    self.month = when::first_of_month(day);
                }

                (!opened).then_some(DIALOG_OPEN)
            }
            ReplCommand::Open { event } => {
                let id = self.resolve_event(&event, now)?;
                (!self.controller.on_event_selected(&id)).then_some(DIALOG_OPEN)
            }
            ReplCommand::Title { text } => {
                (!self.controller.on_draft_title_changed(&text)).then_some(NO_DIALOG)
            }
            ReplCommand::Location { text } => {
                (!self.controller.on_draft_location_changed(&text)).then_some(NO_DIALOG)
            }
            ReplCommand::Save => {
                let was_open = self.controller.dialog().is_open();
                match (self.controller.on_save_requested(), was_open) {
                    (true, _) => None,
                    (false, true) => Some("Title is required"),
                    (false, false) => Some(NO_DIALOG),
                }
            }
            ReplCommand::Delete => {
                (!self.controller.on_delete_requested()).then_some("Only an opened event can be deleted")
            }
            ReplCommand::Cancel => (!self.controller.on_cancel_requested()).then_some(NO_DIALOG),
            ReplCommand::Filter { mode } => {
                self.controller.on_filter_mode_changed(mode);
                None
            }
            ReplCommand::Month { target } => {
                self.month = self.resolve_month(target.as_deref(), now)?;
                None
            }
            ReplCommand::Show => None,
            ReplCommand::Quit => return Ok(Flow::Quit),
        };

        let screen = self.render(now)?;
        Ok(Flow::Continue(match hint {
            Some(hint) => format!("  {}\n\n{}", hint, screen),
            None => screen,
        }))
    }

    pub fn render(&self, now: DateTime<Utc>) -> Result<String> {
        let view = self.controller.view(now);

        if self.json {
            return serde_json::to_string_pretty(&view).context("Failed to serialize view");
        }

        let today = now.with_timezone(&Local).date_naive();
        Ok(render_screen(
            &view,
            self.month,
            &self.listed_events(now),
            self.config.week_start.weekday(),
            today,
        ))
    }

    /// Events of the displayed month passing the filter, ordered by start.
    /// `open <n>` refers to this list.
    fn listed_events(&self, now: DateTime<Utc>) -> Vec<EventView> {
        let next_month = when::shift_month(self.month, 1);

        let mut listed: Vec<EventView> = self
            .controller
            .view(now)
            .events
            .into_iter()
            .filter(|e| {
                self.month
                    .iter_days()
                    .take_while(|d| *d < next_month)
                    .any(|d| covers(e, d))
            })
            .collect();

        listed.sort_by_key(|e| e.start);
        listed
    }

    fn resolve_event(&self, reference: &str, now: DateTime<Utc>) -> Result<EventId> {
        if let Ok(number) = reference.parse::<usize>() {
            let listed = self.listed_events(now);
            return number
                .checked_sub(1)
                .and_then(|i| listed.get(i))
                .map(|e| e.id)
                .ok_or_else(|| anyhow::anyhow!("No event #{} in this month", number));
        }

        reference
            .parse::<EventId>()
            .with_context(|| format!("'{}' is neither a list number nor an event id", reference))
    }

    fn resolve_month(&self, target: Option<&str>, now: DateTime<Utc>) -> Result<NaiveDate> {
        Ok(match target {
            None | Some("today") => when::month_of(now),
            Some("next") => when::shift_month(self.month, 1),
            Some("prev") => when::shift_month(self.month, -1),
            Some(month) => when::parse_month(month)?,
        })
    }
}

const DIALOG_OPEN: &str = "A dialog is already open (save, delete or cancel it first)";
const NO_DIALOG: &str = "No dialog is open";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repl::parse_line;
    use crate::when::to_utc;
    use tracker_core::{Dialog, DialogKind};

    fn jan(d: u32, h: u32) -> DateTime<Utc> {
        to_utc(NaiveDate::from_ymd_opt(2025, 1, d).unwrap().and_hms_opt(h, 0, 0).unwrap()).unwrap()
    }

    fn session() -> Session {
        Session::new(
            TrackerConfig::default(),
            None,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            false,
        )
    }

    /// Run a line and return what it prints.
    fn run(session: &mut Session, line: &str, now: DateTime<Utc>) -> String {
        let command = parse_line(line).unwrap().unwrap();
        match session.execute(command, now).unwrap() {
            Flow::Continue(output) => output,
            Flow::Quit => panic!("unexpected quit"),
        }
    }

    fn titles(session: &Session, now: DateTime<Utc>) -> Vec<String> {
        session.controller().view(now).events.into_iter().map(|e| e.title).collect()
    }

    #[test]
    fn create_edit_delete_round() {
        let mut s = session();
        let now = jan(15, 0);

        run(&mut s, "new 2025-01-10 10:00 --for 1h", now);
        run(&mut s, "title Standup", now);
        run(&mut s, "location Room 1", now);
        run(&mut s, "save", now);
        assert_eq!(titles(&s, now), ["Standup"]);

        run(&mut s, "open 1", now);
        run(&mut s, "title Renamed", now);
        run(&mut s, "location New Room", now);
        run(&mut s, "save", now);

        let view = s.controller().view(now);
        assert_eq!(view.events.len(), 1);
        assert_eq!(view.events[0].title, "Renamed");
        assert_eq!(view.events[0].location, "New Room");
        assert_eq!(view.events[0].start, jan(10, 10));
        assert_eq!(view.events[0].end, jan(10, 11));

        run(&mut s, "open 1", now);
        run(&mut s, "delete", now);
        assert!(titles(&s, now).is_empty());
    }

    #[test]
    fn blank_title_keeps_dialog_open_with_hint() {
        let mut s = session();
        let now = jan(15, 0);

        run(&mut s, "new 2025-01-10", now);
        run(&mut s, "location Room 1", now);
        let output = run(&mut s, "save", now);

        assert!(output.contains("Title is required"));
        assert!(s.controller().store().is_empty());
        assert!(matches!(s.controller().dialog(), Dialog::Creating { .. }));
    }

    #[test]
    fn second_dialog_is_refused() {
        let mut s = session();
        let now = jan(15, 0);

        run(&mut s, "new 2025-01-10", now);
        let output = run(&mut s, "new 2025-01-11", now);

        assert!(output.contains("already open"));
        let view = s.controller().view(now);
        assert_eq!(view.dialog.kind, DialogKind::Creating);
        assert_eq!(view.dialog.slot.unwrap().start, jan(10, 0));
    }

    #[test]
    fn filter_command_changes_listing() {
        let mut s = session();
        let now = jan(15, 0);

        for (day, title) in [("2025-01-05", "Old"), ("2025-01-25", "New")] {
            run(&mut s, &format!("new {day}"), now);
            run(&mut s, &format!("title {title}"), now);
            run(&mut s, "save", now);
        }

        run(&mut s, "filter past", now);
        assert_eq!(titles(&s, now), ["Old"]);

        let output = run(&mut s, "filter upcoming", now);
        assert_eq!(titles(&s, now), ["New"]);
        assert!(output.contains("[Upcoming]"));
    }

    #[test]
    fn list_numbers_follow_start_order() {
        let mut s = session();
        let now = jan(1, 0);

        for (day, title) in [("2025-01-20", "Later"), ("2025-01-03", "Sooner")] {
            run(&mut s, &format!("new {day}"), now);
            run(&mut s, &format!("title {title}"), now);
            run(&mut s, "save", now);
        }

        run(&mut s, "open 1", now);
        assert_eq!(s.controller().view(now).dialog.title, "Sooner");
    }

    #[test]
    fn open_unknown_number_is_an_error() {
        let mut s = session();
        let command = parse_line("open 3").unwrap().unwrap();
        assert!(s.execute(command, jan(1, 0)).is_err());
        assert_eq!(s.controller().dialog(), &Dialog::Idle);
    }

    #[test]
    fn new_jumps_to_selected_month() {
        let mut s = session();
        run(&mut s, "new 2025-03-04", jan(1, 0));
        assert_eq!(s.month(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn month_navigation() {
        let mut s = session();
        let now = jan(15, 0);

        run(&mut s, "month next", now);
        assert_eq!(s.month(), NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        run(&mut s, "month 2024-11", now);
        assert_eq!(s.month(), NaiveDate::from_ymd_opt(2024, 11, 1).unwrap());
        run(&mut s, "month prev", now);
        assert_eq!(s.month(), NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
        run(&mut s, "month", now);
        assert_eq!(s.month(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn filter_flag_overrides_config() {
        let config = TrackerConfig {
            default_filter: FilterMode::Past,
            ..TrackerConfig::default()
        };
        let month = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let from_config = Session::new(config.clone(), None, month, false);
        let overridden = Session::new(config, Some(FilterMode::Upcoming), month, false);

        assert_eq!(from_config.controller().filter_mode(), FilterMode::Past);
        assert_eq!(overridden.controller().filter_mode(), FilterMode::Upcoming);
    }

    #[test]
    fn json_mode_prints_view() {
        let mut s = Session::new(
            TrackerConfig::default(),
            None,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            true,
        );
        let output = run(&mut s, "new 2025-01-10", jan(1, 0));

        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["dialog"]["kind"], "creating");
        assert_eq!(json["filter"], "all");
    }

    #[test]
    fn title_spacing_is_kept() {
        let mut s = session();
        let now = jan(15, 0);

        run(&mut s, "new 2025-01-10", now);
        run(&mut s, "title Team  standup", now);
        run(&mut s, "location Room\t1", now);
        run(&mut s, "save", now);

        let view = s.controller().view(now);
        assert_eq!(view.events[0].title, "Team  standup");
        assert_eq!(view.events[0].location, "Room\t1");
    }

    #[test]
    fn end_out_of_range_is_an_error() {
        let mut s = session();
        let command = parse_line("new 2025-01-10 10:00 --for 300000years").unwrap().unwrap();

        assert!(s.execute(command, jan(1, 0)).is_err());
        assert_eq!(s.controller().dialog(), &Dialog::Idle);
    }

    #[test]
    fn quit_ends_session() {
        let mut s = session();
        let command = parse_line("quit").unwrap().unwrap();
        assert!(matches!(s.execute(command, jan(1, 0)).unwrap(), Flow::Quit));
    }
}
