mod render;
mod repl;
mod session;
mod when;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use owo_colors::OwoColorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracker_core::FilterMode;
use tracker_core::config::TrackerConfig;

use crate::session::{Flow, Session};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Track personal events on a month calendar (events last for the session only)")]
struct Cli {
    /// Use this config file instead of ~/.config/event-tracker/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial filter: all, past or upcoming
    #[arg(short, long)]
    filter: Option<FilterMode>,

    /// Month to display first (YYYY-MM)
    #[arg(short, long)]
    month: Option<String>,

    /// Print the render view as JSON instead of drawing the calendar
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => TrackerConfig::load_from(path),
        None => TrackerConfig::load(),
    }
    .context("Failed to load configuration")?;
    debug!(?config, "Loaded configuration");

    let now = Utc::now();
    let month = match cli.month.as_deref() {
        Some(month) => when::parse_month(month)?,
        None => when::month_of(now),
    };

    let mut session = Session::new(config, cli.filter, month, cli.json);
    println!("{}", session.render(now)?);

    run(&mut session)
}

/// `RUST_LOG` wins unless --verbose is given; warnings only by default.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Read commands from stdin until EOF or `quit`.
fn run(session: &mut Session) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    let mut lines = stdin.lock().lines();

    loop {
        if interactive {
            print!("{} ", ">".dimmed());
            io::stdout().flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        let command = match repl::parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                // Also covers `help`, which clap reports as an error
                e.print()?;
                continue;
            }
        };

        match session.execute(command, Utc::now()) {
            Ok(Flow::Continue(output)) => println!("{}", output),
            Ok(Flow::Quit) => break,
            Err(e) => eprintln!("  {}", format!("{:#}", e).red()),
        }
    }

    debug!(
        events = session.controller().store().len(),
        month = %session.month(),
        "Session ended, discarding events"
    );
    Ok(())
}
