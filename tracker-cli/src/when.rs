//! Parsing typed dates, times and durations into calendar slots.

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use tracker_core::Slot;

/// A point typed by the user: a whole day, or a day and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Day(NaiveDate),
    At(NaiveDateTime),
}

const STRICT_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parse a date or date-time.
///
/// ISO forms (`2025-01-10`, `2025-01-10 10:00`) are tried first, then
/// natural language such as "tomorrow 3pm" or "fri".
pub fn parse_when(input: &str) -> Result<When> {
    let input = input.trim();

    if let Some(when) = parse_strict(input) {
        return Ok(when);
    }

    let expanded = expand_abbreviations(input);
    let dt = fuzzydate::parse(&expanded)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if has_time_component(input) {
        Ok(When::At(dt))
    } else {
        Ok(When::Day(dt.date()))
    }
}

fn parse_strict(input: &str) -> Option<When> {
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(When::Day(date));
    }

    STRICT_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(When::At)
}

/// Expand day and month abbreviations that fuzzydate doesn't handle.
fn expand_abbreviations(input: &str) -> String {
    let abbrevs = [
        ("mon", "monday"),
        ("tue", "tuesday"),
        ("tues", "tuesday"),
        ("wed", "wednesday"),
        ("thu", "thursday"),
        ("thur", "thursday"),
        ("thurs", "thursday"),
        ("fri", "friday"),
        ("sat", "saturday"),
        ("sun", "sunday"),
        ("jan", "january"),
        ("feb", "february"),
        ("mar", "march"),
        ("apr", "april"),
        ("jun", "june"),
        ("jul", "july"),
        ("aug", "august"),
        ("sep", "september"),
        ("sept", "september"),
        ("oct", "october"),
        ("nov", "november"),
        ("dec", "december"),
    ];

    input
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            abbrevs
                .iter()
                .find(|(abbr, _)| *abbr == word)
                .map(|(_, full)| *full)
                .unwrap_or(word)
                .to_string()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check if the input mentions a time of day (3pm, 15:00, noon, "at 9").
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        // am/pm right after a digit, optionally with one space between
        if (b == b'a' || b == b'p') && bytes.get(i + 1) == Some(&b'm') {
            let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let digit_space_before = i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit();
            if digit_before || digit_space_before {
                return true;
            }
        }

        if b == b':' {
            let has_digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let has_digit_after = bytes.get(i + 1).is_some_and(u8::is_ascii_digit);
            if has_digit_before && has_digit_after {
                return true;
            }
        }
    }

    let at_digit = |rest: &str| rest.starts_with(|c: char| c.is_ascii_digit());
    if let Some(pos) = lower.find(" at ") {
        if at_digit(&lower[pos + 4..]) {
            return true;
        }
    }
    lower.strip_prefix("at ").is_some_and(at_digit)
}

/// Parse a duration such as "30m", "1h 30m" or "2days".
pub fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input.trim())
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

/// Build the slot a `new` command selects.
///
/// A day selects it whole (midnight to the next midnight, local time), the
/// way a month grid reports a clicked cell. `until` a day includes that day.
pub fn slot_for(
    start: When,
    until: Option<When>,
    duration: Option<Duration>,
    default_duration: Duration,
) -> Result<Slot> {
    let start_local = match start {
        When::Day(day) => day.and_time(NaiveTime::MIN),
        When::At(at) => at,
    };

    let end_local = match (until, duration) {
        (Some(When::Day(day)), _) => next_midnight(day),
        (Some(When::At(at)), _) => Some(at),
        (None, Some(dur)) => start_local.checked_add_signed(dur),
        (None, None) => match start {
            When::Day(day) => next_midnight(day),
            When::At(at) => at.checked_add_signed(default_duration),
        },
    }
    .ok_or_else(|| anyhow::anyhow!("Event end is out of range"))?;

    Ok(Slot::new(to_utc(start_local)?, to_utc(end_local)?))
}

fn next_midnight(day: NaiveDate) -> Option<NaiveDateTime> {
    day.succ_opt().map(|next| next.and_time(NaiveTime::MIN))
}

/// Interpret a wall-clock time in the local time zone.
pub fn to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| anyhow::anyhow!("{} does not exist in the local time zone", naive))
}

/// Parse `YYYY-MM` into the first day of that month.
pub fn parse_month(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", input.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}'. Expected YYYY-MM", input))
}

/// First day of the local month containing `now`.
pub fn month_of(now: DateTime<Utc>) -> NaiveDate {
    first_of_month(now.with_timezone(&Local).date_naive())
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `delta` months away from `month`.
pub fn shift_month(month: NaiveDate, delta: i32) -> NaiveDate {
    let index = month.year() * 12 + month.month0() as i32 + delta;
    NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1).unwrap_or(month)
}
