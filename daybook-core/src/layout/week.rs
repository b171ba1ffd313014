//! Hour-grid timelines for the week and day views.
//!
//! Events are positioned by minutes since midnight and sized by duration.
//! Overlapping events are not packed into lanes; they share the same column.

use chrono::{Days, NaiveDate, Timelike};

use crate::date_range::DateRange;
use crate::event::Event;
use crate::layout::{week_start, weekday_index};

pub const HOURS_PER_DAY: u32 = 24;

/// A timed event positioned on the hour grid.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub event: &'a Event,
    /// Day column, Monday = 0.
    pub column: u32,
    /// Minutes from midnight to the event start.
    pub offset_minutes: u32,
    /// Event duration in minutes; not clipped at midnight.
    pub height_minutes: i64,
}

impl<'a> Placement<'a> {
    fn new(event: &'a Event) -> Self {
        let start = event.start;
        Placement {
            event,
            column: weekday_index(start.date()),
            offset_minutes: start.hour() * 60 + start.minute(),
            height_minutes: event.duration_minutes(),
        }
    }

    pub fn start_hour(&self) -> u32 {
        self.offset_minutes / 60
    }
}

/// An all-day event shown in the banner above a day column.
#[derive(Debug, Clone, Copy)]
pub struct AllDayPlacement<'a> {
    pub event: &'a Event,
    pub column: u32,
}

#[derive(Debug)]
pub struct WeekLayout<'a> {
    pub week_start: NaiveDate,
    pub days: [NaiveDate; 7],
    pub timed: Vec<Placement<'a>>,
    pub all_day: Vec<AllDayPlacement<'a>>,
}

impl<'a> WeekLayout<'a> {
    pub fn column(&self, column: u32) -> impl Iterator<Item = &Placement<'a>> {
        self.timed.iter().filter(move |p| p.column == column)
    }
}

/// Lay out the Monday-first week containing `anchor`.
pub fn week_layout(events: &[Event], anchor: NaiveDate) -> WeekLayout<'_> {
    let start = week_start(anchor);
    let range = DateRange::days(start, 7);

    let mut days = [start; 7];
    for (offset, day) in days.iter_mut().enumerate() {
        *day = start.checked_add_days(Days::new(offset as u64)).unwrap_or(start);
    }

    let mut in_week: Vec<&Event> = events.iter().filter(|e| e.starts_within(&range)).collect();
    in_week.sort_by_key(|e| e.start);

    let (all_day, timed): (Vec<&Event>, Vec<&Event>) = in_week.into_iter().partition(|e| e.is_all_day());

    WeekLayout {
        week_start: start,
        days,
        timed: timed.into_iter().map(Placement::new).collect(),
        all_day: all_day
            .into_iter()
            .map(|event| AllDayPlacement {
                event,
                column: weekday_index(event.start.date()),
            })
            .collect(),
    }
}

/// One hour of the day timeline with the events that start in it.
#[derive(Debug)]
pub struct HourRow<'a> {
    pub hour: u32,
    pub placements: Vec<Placement<'a>>,
}

#[derive(Debug)]
pub struct DayLayout<'a> {
    pub date: NaiveDate,
    pub rows: Vec<HourRow<'a>>,
    pub all_day: Vec<&'a Event>,
}

impl DayLayout<'_> {
    pub fn is_empty(&self) -> bool {
        self.all_day.is_empty() && self.rows.iter().all(|r| r.placements.is_empty())
    }
}

/// Lay out a single day: 24 hour rows, each event under the row of its start hour.
pub fn day_layout(events: &[Event], date: NaiveDate) -> DayLayout<'_> {
    let range = DateRange::day(date);

    let mut on_day: Vec<&Event> = events.iter().filter(|e| e.starts_within(&range)).collect();
    on_day.sort_by_key(|e| e.start);

    let mut rows: Vec<HourRow> = (0..HOURS_PER_DAY)
        .map(|hour| HourRow {
            hour,
            placements: Vec::new(),
        })
        .collect();
    let mut all_day = Vec::new();

    for event in on_day {
        if event.is_all_day() {
            all_day.push(event);
            continue;
        }
        let placement = Placement::new(event);
        rows[placement.start_hour() as usize].placements.push(placement);
    }

    DayLayout {
        date,
        rows,
        all_day,
    }
}
