//! Commands typed at the session prompt.

use clap::{Parser, Subcommand};
use tracker_core::FilterMode;

#[derive(Parser, Debug)]
#[command(multicall = true)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum ReplCommand {
    /// Select a slot and open the create dialog
    New {
        /// Day or start time (e.g. "2025-03-20", "2025-03-20 15:00", "fri 3pm")
        #[arg(required = true, num_args = 1..)]
        when: Vec<String>,

        /// Length of the event (e.g. "30m", "2h")
        #[arg(long = "for", conflicts_with = "until")]
        duration: Option<String>,

        /// End day or time
        #[arg(long, num_args = 1..)]
        until: Option<Vec<String>>,
    },
    /// Open an event for editing, by list number or id
    Open { event: String },
    /// Set the title in the open dialog
    Title {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Set the location in the open dialog
    Location {
        #[arg(default_value = "", allow_hyphen_values = true)]
        text: String,
    },
    /// Save the open dialog
    Save,
    /// Delete the event being edited
    Delete,
    /// Close the open dialog without saving
    Cancel,
    /// Show all, past or upcoming events
    Filter { mode: FilterMode },
    /// Display another month: YYYY-MM, next, prev or today
    Month { target: Option<String> },
    /// Redraw the calendar
    Show,
    /// Leave the session (events are not kept)
    #[command(alias = "exit")]
    Quit,
}

/// Parse one input line. Blank lines yield None.
///
/// `title` and `location` take the rest of the line verbatim, so inner
/// spacing survives.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, clap::Error> {
    let line = line.trim_start();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match name {
        "title" => return Ok(Some(ReplCommand::Title { text: rest.to_string() })),
        "location" => return Ok(Some(ReplCommand::Location { text: rest.to_string() })),
        _ => {}
    }

    ReplLine::try_parse_from(line.split_whitespace()).map(|parsed| Some(parsed.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> ReplCommand {
        parse_line(line).unwrap().unwrap()
    }

    #[test]
    fn blank_line_is_nothing() {
        assert!(parse_line("   ").unwrap().is_none());
    }

    #[test]
    fn new_collects_words_and_options() {
        assert_eq!(
            parse("new fri 3pm --for 45m"),
            ReplCommand::New {
                when: vec!["fri".into(), "3pm".into()],
                duration: Some("45m".into()),
                until: None,
            }
        );
        assert_eq!(
            parse("new 2025-01-10 --until 2025-01-12"),
            ReplCommand::New {
                when: vec!["2025-01-10".into()],
                duration: None,
                until: Some(vec!["2025-01-12".into()]),
            }
        );
    }

    #[test]
    fn new_rejects_both_for_and_until() {
        assert!(parse_line("new 2025-01-10 --for 1h --until 2025-01-11").is_err());
    }

    #[test]
    fn new_requires_a_start() {
        assert!(parse_line("new").is_err());
    }

    #[test]
    fn title_keeps_rest_of_line() {
        assert_eq!(
            parse("title Team standup - weekly"),
            ReplCommand::Title {
                text: "Team standup - weekly".into()
            }
        );
        assert_eq!(
            parse("  title  Team  standup "),
            ReplCommand::Title {
                text: " Team  standup ".into()
            }
        );
        assert_eq!(parse("location --remote"), ReplCommand::Location { text: "--remote".into() });
        assert_eq!(parse("location"), ReplCommand::Location { text: String::new() });
    }

    #[test]
    fn filter_parses_mode() {
        assert_eq!(
            parse("filter upcoming"),
            ReplCommand::Filter {
                mode: FilterMode::Upcoming
            }
        );
        assert!(parse_line("filter later").is_err());
    }

    #[test]
    fn simple_commands_and_aliases() {
        assert_eq!(parse("save"), ReplCommand::Save);
        assert_eq!(parse("open 2"), ReplCommand::Open { event: "2".into() });
        assert_eq!(parse("month"), ReplCommand::Month { target: None });
        assert_eq!(parse("exit"), ReplCommand::Quit);
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_line("frobnicate").is_err());
    }
}
