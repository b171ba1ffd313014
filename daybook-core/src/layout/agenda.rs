//! Upcoming events in a rolling window.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::event::Event;

/// Events starting within `[from, to]`, ordered by start.
#[derive(Debug)]
pub struct Agenda<'a> {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
    entries: Vec<&'a Event>,
}

impl<'a> Agenda<'a> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.entries.iter().copied()
    }

    /// The first `limit` entries, for compact "upcoming" summaries.
    pub fn upcoming(&self, limit: usize) -> impl Iterator<Item = &'a Event> + '_ {
        self.iter().take(limit)
    }

    /// Entries grouped by start date, days in order.
    pub fn by_day(&self) -> Vec<(NaiveDate, Vec<&'a Event>)> {
        let mut days: Vec<(NaiveDate, Vec<&'a Event>)> = Vec::new();

        for &event in &self.entries {
            let date = event.start_date();
            match days.last_mut() {
                Some((day, events)) if *day == date => events.push(event),
                _ => days.push((date, vec![event])),
            }
        }

        days
    }
}

impl<'s, 'a> IntoIterator for &'s Agenda<'a> {
    type Item = &'a Event;
    type IntoIter = std::iter::Copied<std::slice::Iter<'s, &'a Event>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter().copied()
    }
}

/// Events starting between `now` and `now + window_days`, both inclusive.
/// Windows past the representable range run to the end of time.
pub fn agenda(events: &[Event], now: NaiveDateTime, window_days: i64) -> Agenda<'_> {
    let to = TimeDelta::try_days(window_days.max(0))
        .and_then(|window| now.checked_add_signed(window))
        .unwrap_or(NaiveDateTime::MAX);

    let mut entries: Vec<&Event> = events
        .iter()
        .filter(|e| e.start >= now && e.start <= to)
        .collect();
    entries.sort_by_key(|e| e.start);

    Agenda {
        from: now,
        to,
        entries,
    }
}
