use anyhow::Result;
use chrono::Days;
use clap::Subcommand;
use daybook_core::Daybook;
use daybook_core::date_range::{DateRange, today};
use daybook_core::event::{Calendar, EventDraft, EventPatch};
use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::commands::{clearable, confirm};
use crate::dates::{When, apply_duration, default_end, parse_day, parse_end, parse_when};
use crate::render::{Render, date_label, short_id};

#[derive(Subcommand)]
pub enum EventCommand {
    /// Create an event (prompts for anything missing)
    New {
        title: Option<String>,

        /// Start, e.g. "tomorrow 3pm", "fri", "2025-03-20T15:00"
        #[arg(short, long)]
        start: Option<String>,

        /// Book the 09:00-10:00 slot on this day instead of giving a start
        #[arg(long, conflicts_with_all = ["start", "end", "duration"])]
        on: Option<String>,

        /// End date/time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration, e.g. "30m", "2h", "3days"
        #[arg(short, long)]
        duration: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Free-form category (default: personal)
        #[arg(long)]
        category: Option<String>,

        /// Hex color, e.g. "#f5576c"
        #[arg(long)]
        color: Option<String>,
    },
    /// List events between two dates
    List {
        /// First day (default: today)
        #[arg(long)]
        from: Option<String>,

        /// Last day, inclusive (default: a week after --from)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show one event
    Show { id: String },
    /// Change fields of an event
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        start: Option<String>,

        /// End date/time, or a duration from the start
        #[arg(short, long)]
        end: Option<String>,

        /// Pass "" to clear
        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an event
    Delete {
        id: String,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

pub fn run(daybook: &Daybook, command: EventCommand) -> Result<()> {
    let mut calendar = Calendar::load(&daybook.store()?)?;

    match command {
        EventCommand::New {
            title,
            start,
            on,
            end,
            duration,
            description,
            category,
            color,
        } => {
            let interactive = title.is_none() || (start.is_none() && on.is_none());

            let title = match title {
                Some(t) => t,
                None => Input::<String>::new()
                    .with_prompt("  Title")
                    .interact_text()?,
            };

            let draft = match on {
                Some(day) => EventDraft::for_date(title, parse_day(&day)?),
                None => {
                    let start = match start {
                        Some(s) => parse_when(&s)?,
                        None => prompt_with_retry("  When?", parse_when)?,
                    };

                    let end = if let Some(end) = end {
                        parse_end(&end, start)?
                    } else if let Some(duration) = duration {
                        apply_duration(start, &duration)?
                    } else if interactive {
                        prompt_duration(start)?
                    } else {
                        default_end(start)
                    };

                    EventDraft {
                        all_day: start.is_all_day(),
                        ..EventDraft::new(title, start.to_datetime(), end.to_datetime())
                    }
                }
            };

            let draft = EventDraft {
                description,
                category,
                color,
                ..draft
            };
            let event = calendar.create(draft)?;

            if interactive {
                println!();
            }
            println!("{}", format!("  Created: {}", event.title).green());
        }
        EventCommand::List { from, to } => {
            let from = match from {
                Some(input) => parse_day(&input)?,
                None => today(),
            };
            let to = match to {
                Some(input) => parse_day(&input)?,
                None => from.checked_add_days(Days::new(6)).unwrap_or(from),
            };
            if to < from {
                anyhow::bail!("--to is before --from");
            }

            let span = (to - from).num_days() as u64 + 1;
            let events = calendar.in_range(&DateRange::days(from, span));

            if events.is_empty() {
                println!("{}", "No events found".dimmed());
                return Ok(());
            }

            let today = today();
            let mut current = None;
            for event in events {
                let date = event.start_date();
                if current != Some(date) {
                    if current.is_some() {
                        println!();
                    }
                    println!("{}", date_label(date, today).bold());
                    current = Some(date);
                }
                println!("  {}", event.render());
            }
        }
        EventCommand::Show { id } => {
            let id = calendar.resolve(&id)?;
            if let Some(event) = calendar.get(id) {
                println!("{}", event.title.bold());
                println!("  {:<12}{}", "Starts".dimmed(), event.start.format("%a %b %-d %Y %H:%M"));
                println!("  {:<12}{}", "Ends".dimmed(), event.end.format("%a %b %-d %Y %H:%M"));
                if event.is_all_day() {
                    println!("  {:<12}yes", "All day".dimmed());
                }
                println!("  {:<12}{}", "Category".dimmed(), event.category);
                println!("  {:<12}{}", "Color".dimmed(), event.color);
                if let Some(description) = &event.description {
                    println!();
                    println!("{}", description);
                }
                println!("  {:<12}{}", "Id".dimmed(), event.id.dimmed());
            }
        }
        EventCommand::Edit {
            id,
            title,
            start,
            end,
            description,
            category,
            color,
        } => {
            let id = calendar.resolve(&id)?;
            let start = start.as_deref().map(parse_when).transpose()?;

            let end = match end {
                Some(input) => {
                    let base = match (start, calendar.get(id)) {
                        (Some(start), _) => start,
                        (None, Some(existing)) if existing.is_all_day() => When::Date(existing.start.date()),
                        (None, Some(existing)) => When::DateTime(existing.start),
                        (None, None) => anyhow::bail!("Event disappeared while editing"),
                    };
                    Some(parse_end(&input, base)?)
                }
                // A start that switches between timed and whole-day takes its default end.
                None => start.filter(|s| {
                    calendar
                        .get(id)
                        .is_some_and(|existing| existing.is_all_day() != s.is_all_day())
                })
                .map(default_end),
            };

            let patch = EventPatch {
                title,
                start: start.map(|s| s.to_datetime()),
                end: end.map(|e| e.to_datetime()),
                description: clearable(description),
                color,
                category,
                all_day: start.map(|s| s.is_all_day()),
            };
            let event = calendar.update(id, patch)?;
            println!("{}", format!("  Updated: {}", event.title).green());
        }
        EventCommand::Delete { id, force } => {
            let id = calendar.resolve(&id)?;
            let title = calendar.get(id).map(|e| e.title.clone()).unwrap_or_default();

            if !confirm(&format!("Delete event \"{}\" ({})?", title, short_id(id)), force)? {
                return Ok(());
            }

            let removed = calendar.delete(id)?;
            println!("  Deleted: {}", removed.title);
        }
    }

    Ok(())
}

/// Prompt the user with retry on parse errors.
fn prompt_with_retry<F>(prompt: &str, parse: F) -> Result<When>
where
    F: Fn(&str) -> Result<When>,
{
    loop {
        let input: String = Input::new().with_prompt(prompt).interact_text()?;
        match parse(&input) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}

/// Prompt for duration/end with retry; empty input takes the default end.
fn prompt_duration(start: When) -> Result<When> {
    let hint = if start.is_all_day() { "1 day" } else { "1 hour" };
    loop {
        let input: String = Input::new()
            .with_prompt(format!("  How long? ({})", hint))
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        if input.is_empty() {
            return Ok(default_end(start));
        }
        match parse_end(&input, start) {
            Ok(result) => return Ok(result),
            Err(e) => eprintln!("  {}", e.to_string().red()),
        }
    }
}
