//! Calendar layout: turns events plus an anchor date into view-models for the
//! month grid, the week and day timelines, and the agenda list.
//!
//! Every builder is a pure function of its inputs; `today`/`now` are passed in.

pub mod agenda;
pub mod month;
pub mod week;

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime};

use crate::error::DaybookError;
use crate::event::Event;

pub use agenda::{Agenda, agenda};
pub use month::{CellPosition, MonthCell, MonthGrid, month_grid};
pub use week::{AllDayPlacement, DayLayout, HourRow, Placement, WeekLayout, day_layout, week_layout};

/// Column of `date` in a Monday-first week (Monday = 0 .. Sunday = 6).
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date.checked_sub_days(Days::new(weekday_index(date) as u64))
        .unwrap_or(date)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
    Agenda,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
            ViewMode::Agenda => "agenda",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = DaybookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "month" => Ok(ViewMode::Month),
            "week" => Ok(ViewMode::Week),
            "day" => Ok(ViewMode::Day),
            "agenda" => Ok(ViewMode::Agenda),
            other => Err(DaybookError::validation(format!(
                "Unknown view '{}'. Expected month, week, day or agenda",
                other
            ))),
        }
    }
}

/// Which period is on screen. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub anchor: NaiveDate,
    pub mode: ViewMode,
    pub agenda_days: i64,
}

impl ViewState {
    pub fn new(anchor: NaiveDate, mode: ViewMode, agenda_days: i64) -> Self {
        ViewState {
            anchor,
            mode,
            agenda_days,
        }
    }

    /// Step back one period. The agenda always starts at "now", so it does not move.
    pub fn previous(&mut self) {
        self.anchor = match self.mode {
            ViewMode::Month => self.anchor.checked_sub_months(Months::new(1)),
            ViewMode::Week => self.anchor.checked_sub_days(Days::new(7)),
            ViewMode::Day => self.anchor.checked_sub_days(Days::new(1)),
            ViewMode::Agenda => None,
        }
        .unwrap_or(self.anchor);
    }

    pub fn next(&mut self) {
        self.anchor = match self.mode {
            ViewMode::Month => self.anchor.checked_add_months(Months::new(1)),
            ViewMode::Week => self.anchor.checked_add_days(Days::new(7)),
            ViewMode::Day => self.anchor.checked_add_days(Days::new(1)),
            ViewMode::Agenda => None,
        }
        .unwrap_or(self.anchor);
    }

    pub fn today(&mut self, today: NaiveDate) {
        self.anchor = today;
    }

    /// Heading for the visible period, e.g. "March 2024" or "4 Mar – 10 Mar 2024".
    pub fn period_label(&self) -> String {
        match self.mode {
            ViewMode::Month => self.anchor.format("%B %Y").to_string(),
            ViewMode::Week => {
                let start = week_start(self.anchor);
                let end = start.checked_add_days(Days::new(6)).unwrap_or(start);
                format!(
                    "{} – {}",
                    start.format("%-d %b"),
                    end.format("%-d %b %Y")
                )
            }
            ViewMode::Day => self.anchor.format("%A, %-d %B %Y").to_string(),
            ViewMode::Agenda => format!("Next {} days", self.agenda_days),
        }
    }

    /// Build the layout for the current mode.
    pub fn layout<'a>(&self, events: &'a [Event], options: &LayoutOptions) -> Layout<'a> {
        match self.mode {
            ViewMode::Month => Layout::Month(month_grid(
                events,
                self.anchor,
                options.now.date(),
                options.month_cell_limit,
            )),
            ViewMode::Week => Layout::Week(week_layout(events, self.anchor)),
            ViewMode::Day => Layout::Day(day_layout(events, self.anchor)),
            ViewMode::Agenda => Layout::Agenda(agenda(events, options.now, self.agenda_days)),
        }
    }
}

/// Inputs every layout shares besides the events themselves.
#[derive(Debug, Clone, Copy)]
pub struct LayoutOptions {
    pub now: NaiveDateTime,
    pub month_cell_limit: usize,
}

#[derive(Debug)]
pub enum Layout<'a> {
    Month(MonthGrid<'a>),
    Week(WeekLayout<'a>),
    Day(DayLayout<'a>),
    Agenda(Agenda<'a>),
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn week_start_is_monday() {
        // 2024-03-10 is a Sunday.
        assert_eq!(week_start(date(2024, 3, 10)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(week_start(date(2024, 3, 1)), date(2024, 2, 26));
        assert_eq!(weekday_index(date(2024, 3, 10)), 6);
        assert_eq!(weekday_index(date(2024, 3, 4)), 0);
    }

    #[test]
    fn navigation_steps_by_mode() {
        let mut view = ViewState::new(date(2024, 1, 31), ViewMode::Month, 7);
        view.next();
        assert_eq!(view.anchor, date(2024, 2, 29));
        view.previous();
        assert_eq!(view.anchor, date(2024, 1, 29));

        view.mode = ViewMode::Week;
        view.next();
        assert_eq!(view.anchor, date(2024, 2, 5));

        view.mode = ViewMode::Day;
        view.previous();
        assert_eq!(view.anchor, date(2024, 2, 4));

        view.mode = ViewMode::Agenda;
        view.next();
        assert_eq!(view.anchor, date(2024, 2, 4));

        view.today(date(2024, 3, 10));
        assert_eq!(view.anchor, date(2024, 3, 10));
    }

    #[test]
    fn period_labels() {
        let mut view = ViewState::new(date(2024, 3, 10), ViewMode::Month, 30);
        assert_eq!(view.period_label(), "March 2024");

        view.mode = ViewMode::Week;
        assert_eq!(view.period_label(), "4 Mar – 10 Mar 2024");

        view.mode = ViewMode::Day;
        assert_eq!(view.period_label(), "Sunday, 10 March 2024");

        view.mode = ViewMode::Agenda;
        assert_eq!(view.period_label(), "Next 30 days");
    }

    #[test]
    fn view_mode_parses_case_insensitively() {
        assert_eq!("Week".parse::<ViewMode>().unwrap(), ViewMode::Week);
        assert!("year".parse::<ViewMode>().is_err());
    }

    #[test]
    fn layout_dispatches_on_mode() {
        let events = vec![event("x", at(2024, 3, 10, 9, 0), at(2024, 3, 10, 10, 30))];
        let options = LayoutOptions {
            now: at(2024, 3, 1, 8, 0),
            month_cell_limit: 3,
        };

        let view = ViewState::new(date(2024, 3, 10), ViewMode::Month, 7);
        assert!(matches!(view.layout(&events, &options), Layout::Month(g) if g.cells.len() == 42));

        let view = ViewState::new(date(2024, 3, 10), ViewMode::Week, 7);
        assert!(matches!(view.layout(&events, &options), Layout::Week(w) if w.timed.len() == 1));

        let view = ViewState::new(date(2024, 3, 10), ViewMode::Agenda, 7);
        assert!(matches!(view.layout(&events, &options), Layout::Agenda(a) if a.is_empty()));
    }
}
