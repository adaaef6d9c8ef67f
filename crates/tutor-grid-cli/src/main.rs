//! `tutor-grid` CLI: lay out a lesson calendar and check slots from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Lay out the week containing 2024-06-15 (lessons JSON on stdin)
//! cat lessons.json | tutor-grid layout --date 2024-06-15
//!
//! # Same, with preferences from a TOML file, one day only
//! tutor-grid layout -i lessons.json --date 2024-06-15 --view day --config prefs.toml
//!
//! # Is 09:45 free for a one-hour lesson, ignoring lesson 42 (the one being moved)?
//! tutor-grid check -i lessons.json --at 2024-06-15T09:45 --exclude 42
//!
//! # Free/occupied map of the week, or just the first free slot
//! tutor-grid slots -i lessons.json --date 2024-06-15 --duration 90
//! tutor-grid slots -i lessons.json --date 2024-06-15 --first
//!
//! # Double-booked lessons
//! tutor-grid conflicts -i lessons.json
//!
//! # What time is it for the client?
//! tutor-grid client-time --at 2024-06-15T09:00:00Z --tz Europe/Moscow
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use tutor_grid::availability::{first_free_slot, is_slot_occupied, slot_occupancy};
use tutor_grid::calendar::{group_by_day, visible_days, ViewMode};
use tutor_grid::layout::layout_days;
use tutor_grid::model::{parse_lessons_json, Lesson};
use tutor_grid::timezone::{parse_timezone, project_time, project_time_or};
use tutor_grid::{find_conflicts, CalendarPreferences, TimeSlot, ZoomTable};

#[derive(Parser)]
#[command(
    name = "tutor-grid",
    version,
    about = "Lesson calendar layout and slot availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Day,
    Week,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Day => ViewMode::Day,
            ViewArg::Week => ViewMode::Week,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the grid layout of every visible day
    Layout {
        /// Lessons JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Any date inside the view (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Day or week view (defaults to the preferences)
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
        /// Preferences TOML file
        #[arg(long)]
        config: Option<String>,
    },
    /// Check whether a slot is free
    Check {
        /// Lessons JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Slot start in tutor-local time (YYYY-MM-DDTHH:MM, quarter-hour aligned)
        #[arg(long, value_parser = parse_local)]
        at: NaiveDateTime,
        /// Lesson length in minutes
        #[arg(long)]
        duration: Option<i64>,
        /// Lesson id to ignore (the lesson being moved)
        #[arg(long)]
        exclude: Option<i64>,
        /// Preferences TOML file
        #[arg(long)]
        config: Option<String>,
    },
    /// Mark every slot of the view free or occupied
    Slots {
        /// Lessons JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Any date inside the view (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Day or week view (defaults to the preferences)
        #[arg(long, value_enum)]
        view: Option<ViewArg>,
        /// Lesson length in minutes
        #[arg(long)]
        duration: Option<i64>,
        /// Lesson id to ignore (the lesson being moved)
        #[arg(long)]
        exclude: Option<i64>,
        /// Print only the first free slot
        #[arg(long)]
        first: bool,
        /// Preferences TOML file
        #[arg(long)]
        config: Option<String>,
    },
    /// List double-booked lesson pairs
    Conflicts {
        /// Lessons JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Show an instant as clock time in another timezone
    ClientTime {
        /// Instant in RFC 3339 (e.g. 2024-06-15T09:00:00Z)
        #[arg(long)]
        at: String,
        /// Target IANA timezone
        #[arg(long)]
        tz: String,
        /// Timezone to fall back to when --tz is unknown
        #[arg(long)]
        fallback: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::Layout {
            input,
            output,
            date,
            view,
            config,
        } => {
            let prefs = load_preferences(config.as_deref())?;
            let lessons = read_lessons(input.as_deref())?;
            let tz = prefs.tutor_timezone()?;
            let grid = prefs.time_grid(&ZoomTable::default())?;

            let mode = view.map(ViewMode::from).unwrap_or(prefs.view);
            let days = visible_days(date, mode);
            let buckets = group_by_day(&lessons, &days, tz);
            let layout = layout_days(&buckets, tz, &grid, prefs.overlap);

            let json = serde_json::to_string_pretty(&layout)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check {
            input,
            at,
            duration,
            exclude,
            config,
        } => {
            let prefs = load_preferences(config.as_deref())?;
            let lessons = read_lessons(input.as_deref())?;
            let slot = TimeSlot::new(at.date(), at.hour(), at.minute())?;

            let occupied =
                is_slot_occupied(&slot, duration, prefs.tutor_timezone()?, &lessons, exclude);
            println!("{}", if occupied { "occupied" } else { "free" });
        }
        Commands::Slots {
            input,
            output,
            date,
            view,
            duration,
            exclude,
            first,
            config,
        } => {
            let prefs = load_preferences(config.as_deref())?;
            let lessons = read_lessons(input.as_deref())?;
            let tz = prefs.tutor_timezone()?;

            let mode = view.map(ViewMode::from).unwrap_or(prefs.view);
            let slots = TimeSlot::grid(&visible_days(date, mode), prefs.working_hours);

            let content = if first {
                match first_free_slot(&slots, duration, tz, &lessons, exclude) {
                    Some(slot) => format!("{}\n", slot.local().format("%Y-%m-%d %H:%M")),
                    None => "none\n".to_string(),
                }
            } else {
                let statuses = slot_occupancy(&slots, duration, tz, &lessons, exclude);
                serde_json::to_string_pretty(&statuses)?
            };
            write_output(output.as_deref(), &content)?;
        }
        Commands::Conflicts { input } => {
            let lessons = read_lessons(input.as_deref())?;
            let conflicts = find_conflicts(&lessons);
            println!("{}", serde_json::to_string_pretty(&conflicts)?);
        }
        Commands::ClientTime { at, tz, fallback } => {
            let instant: DateTime<Utc> = DateTime::parse_from_rfc3339(&at)
                .with_context(|| format!("Invalid instant: {}", at))?
                .with_timezone(&Utc);

            match fallback {
                Some(name) => {
                    let fallback_tz = parse_timezone(&name)?;
                    let projected = project_time_or(instant, &tz, fallback_tz);
                    if projected.approximate {
                        println!("{} ~", projected.text);
                    } else {
                        println!("{}", projected.text);
                    }
                }
                None => println!("{}", project_time(instant, &tz)?),
            }
        }
    }

    Ok(())
}

/// Parse a tutor-local slot start, with or without seconds.
fn parse_local(s: &str) -> std::result::Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {}", e))
}

fn load_preferences(path: Option<&str>) -> Result<CalendarPreferences> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            CalendarPreferences::from_toml_str(&text)
                .with_context(|| format!("Invalid preferences in {}", path))
        }
        None => Ok(CalendarPreferences::default()),
    }
}

fn read_lessons(path: Option<&str>) -> Result<Vec<Lesson>> {
    let json = read_input(path)?;
    let lessons = parse_lessons_json(&json).context("Failed to parse lessons JSON")?;
    log::debug!("loaded {} lessons", lessons.len());
    Ok(lessons)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
