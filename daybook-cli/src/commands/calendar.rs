use anyhow::Result;
use daybook_core::Daybook;
use daybook_core::date_range::{now, today};
use daybook_core::event::Calendar;
use daybook_core::layout::{LayoutOptions, ViewMode, ViewState, agenda};
use owo_colors::OwoColorize;

use crate::dates::parse_day;
use crate::render::Render;

pub fn run(
    daybook: &Daybook,
    view: ViewMode,
    date: Option<String>,
    offset: i32,
    days: Option<i64>,
) -> Result<()> {
    let config = daybook.config();
    let calendar = Calendar::load(&daybook.store()?)?;

    let anchor = match date {
        Some(input) => parse_day(&input)?,
        None => today(),
    };
    let mut state = ViewState::new(anchor, view, days.unwrap_or(config.agenda_days));

    for _ in 0..offset.unsigned_abs() {
        if offset < 0 {
            state.previous();
        } else {
            state.next();
        }
    }

    let options = LayoutOptions {
        now: now(),
        month_cell_limit: config.month_cell_limit,
    };
    let layout = state.layout(calendar.events(), &options);

    println!("{}", state.period_label().bold());
    println!();
    println!("{}", layout.render());

    if view == ViewMode::Month && config.upcoming_limit > 0 {
        let upcoming = agenda(calendar.events(), options.now, config.agenda_days);
        if !upcoming.is_empty() {
            println!();
            println!("{}", "Upcoming".bold());
            for event in upcoming.upcoming(config.upcoming_limit) {
                println!(
                    "  {} {}",
                    event.start.format("%a %b %-d").dimmed(),
                    event.render()
                );
            }
        }
    }

    Ok(())
}
