//! Terminal rendering of the calendar.
//!
//! Past events are drawn in red and upcoming ones in green, the same
//! colours the month grid uses for its day markers.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use owo_colors::OwoColorize;
use tracker_core::{DialogKind, DialogView, EventView, FilterMode, Slot, View};

const PAST_RGB: (u8, u8, u8) = (222, 105, 135);
const UPCOMING_RGB: (u8, u8, u8) = (140, 189, 76);

/// Width of one day cell in the grid
const CELL_WIDTH: usize = 4;

/// Extension trait for coloured terminal rendering.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for FilterMode {
    fn render(&self) -> String {
        self.label().to_string()
    }
}

/// One line of the event list, without its number.
impl Render for EventView {
    fn render(&self) -> String {
        let title = if self.title.is_empty() {
            "(untitled)".dimmed().to_string()
        } else {
            paint(&self.title, self.is_past)
        };

        let when = format_interval(self.start.with_timezone(&Local), self.end.with_timezone(&Local));
        let location = if self.location.is_empty() {
            String::new()
        } else {
            format!(" @ {}", self.location).dimmed().to_string()
        };

        format!("{} {}{}", when.dimmed(), title, location)
    }
}

impl Render for DialogView {
    fn render(&self) -> String {
        let (heading, actions) = match self.kind {
            DialogKind::None => return String::new(),
            DialogKind::Creating => ("Create Event", "[save] [cancel]"),
            DialogKind::Editing => ("Edit Event", "[save] [delete] [cancel]"),
        };

        let when = self
            .slot
            .map(|slot| format!(" ({})", format_slot(&slot)))
            .unwrap_or_default();

        [
            format!("  {}{}", heading.bold(), when.dimmed()),
            format!("    Title:    {}", self.title),
            format!("    Location: {}", self.location),
            format!("    {}", actions.dimmed()),
        ]
        .join("\n")
    }
}

/// The filter controls, with the active one highlighted.
pub fn render_filter_bar(active: FilterMode) -> String {
    FilterMode::ALL
        .iter()
        .map(|mode| {
            if *mode == active {
                format!("[{}]", mode.render()).bold().to_string()
            } else {
                format!(" {} ", mode.render()).dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A month grid. Days carrying events get a marker: red if all their
/// events are past, green otherwise. Today is underlined.
pub fn render_month(month: NaiveDate, events: &[EventView], week_start: Weekday, today: NaiveDate) -> String {
    let mut lines = Vec::new();

    let title = month.format("%B %Y").to_string();
    lines.push(format!("{:^width$}", title, width = CELL_WIDTH * 7).bold().to_string());

    let mut weekday = week_start;
    let mut header = String::new();
    for _ in 0..7 {
        let name: String = weekday.to_string().chars().take(2).collect();
        header.push_str(&format!("{:>3} ", name));
        weekday = weekday.succ();
    }
    lines.push(header.trim_end().dimmed().to_string());

    let offset = (7 + month.weekday().num_days_from_monday() - week_start.num_days_from_monday()) % 7;
    let mut row = " ".repeat(CELL_WIDTH * offset as usize);
    let mut column = offset;

    for day in month.iter_days().take_while(|d| d.month() == month.month()) {
        row.push_str(&render_day(day, events, today));
        column += 1;
        if column == 7 {
            lines.push(row.trim_end().to_string());
            row = String::new();
            column = 0;
        }
    }
    if !row.is_empty() {
        lines.push(row.trim_end().to_string());
    }

    lines.join("\n")
}

fn render_day(day: NaiveDate, events: &[EventView], today: NaiveDate) -> String {
    let on_day: Vec<&EventView> = events.iter().filter(|e| covers(e, day)).collect();

    let number = format!("{:>3}", day.day());
    let number = if day == today {
        number.underline().to_string()
    } else {
        number
    };

    if on_day.is_empty() {
        return format!("{} ", number);
    }

    let all_past = on_day.iter().all(|e| e.is_past);
    format!("{}{}", number, paint("•", all_past))
}

/// Numbered list of events, in the order given.
pub fn render_event_list(events: &[EventView]) -> String {
    if events.is_empty() {
        return "  No events".dimmed().to_string();
    }

    events
        .iter()
        .enumerate()
        .map(|(i, event)| format!("{:>3}. {}", i + 1, event.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Everything shown after a command: filters, grid, list and open dialog.
pub fn render_screen(
    view: &View,
    month: NaiveDate,
    listed: &[EventView],
    week_start: Weekday,
    today: NaiveDate,
) -> String {
    let mut sections = vec![
        render_filter_bar(view.filter),
        render_month(month, &view.events, week_start, today),
        render_event_list(listed),
    ];

    if view.dialog.kind != DialogKind::None {
        sections.push(view.dialog.render());
    }

    sections.join("\n\n")
}

/// Whether an event touches a local calendar day.
/// An event ending exactly at midnight does not touch the following day.
pub fn covers(event: &EventView, day: NaiveDate) -> bool {
    let first = event.start.with_timezone(&Local).date_naive();
    let last = if event.end > event.start {
        (event.end - Duration::nanoseconds(1)).with_timezone(&Local).date_naive()
    } else {
        first
    };

    first <= day && day <= last
}

fn paint(text: &str, is_past: bool) -> String {
    let (r, g, b) = if is_past { PAST_RGB } else { UPCOMING_RGB };
    text.truecolor(r, g, b).to_string()
}

fn format_slot(slot: &Slot) -> String {
    format_interval(slot.start.with_timezone(&Local), slot.end.with_timezone(&Local))
}

/// e.g. "Fri Jan 10 10:00-11:00", "Fri Jan 10 all-day", "Fri Jan 10 - Sun Jan 12"
fn format_interval(start: DateTime<Local>, end: DateTime<Local>) -> String {
    let day_fmt = "%a %b %-d";
    let whole_days = start.time() == NaiveTime::MIN && end.time() == NaiveTime::MIN && end > start;

    if whole_days {
        let last = end.date_naive() - Duration::days(1);
        if last == start.date_naive() {
            return format!("{} all-day", start.format(day_fmt));
        }
        return format!("{} - {}", start.format(day_fmt), last.format(day_fmt));
    }

    if start.date_naive() == end.date_naive() {
        format!("{} {}-{}", start.format(day_fmt), start.format("%H:%M"), end.format("%H:%M"))
    } else {
        format!(
            "{} {} - {} {}",
            start.format(day_fmt),
            start.format("%H:%M"),
            end.format(day_fmt),
            end.format("%H:%M")
        )
    }
}
