//! Six-week month grid.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::date_range::DateRange;
use crate::event::Event;
use crate::layout::weekday_index;

/// Cells in a month grid: 6 weeks of 7 days, whatever the month.
pub const GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellPosition {
    PreviousMonth,
    CurrentMonth,
    NextMonth,
}

#[derive(Debug)]
pub struct MonthCell<'a> {
    pub date: NaiveDate,
    pub position: CellPosition,
    pub is_today: bool,
    /// Events starting on this day, by start time, capped at the cell limit.
    pub events: Vec<&'a Event>,
    /// Events starting on this day that did not fit.
    pub hidden: usize,
}

impl MonthCell<'_> {
    pub fn in_month(&self) -> bool {
        self.position == CellPosition::CurrentMonth
    }
}

#[derive(Debug)]
pub struct MonthGrid<'a> {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub cells: Vec<MonthCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Rows of seven cells, Monday first.
    pub fn weeks(&self) -> std::slice::Chunks<'_, MonthCell<'a>> {
        self.cells.chunks(7)
    }
}

/// Lay out the month containing `anchor`.
pub fn month_grid<'a>(
    events: &'a [Event],
    anchor: NaiveDate,
    today: NaiveDate,
    cell_limit: usize,
) -> MonthGrid<'a> {
    let first_day = anchor
        .checked_sub_days(Days::new(anchor.day0() as u64))
        .unwrap_or(anchor);
    let last_day = first_day
        .checked_add_months(Months::new(1))
        .and_then(|d| d.pred_opt())
        .unwrap_or(first_day);

    let grid_start = first_day
        .checked_sub_days(Days::new(weekday_index(first_day) as u64))
        .unwrap_or(first_day);

    let cells = grid_start
        .iter_days()
        .take(GRID_CELLS)
        .map(|date| {
            let position = if date < first_day {
                CellPosition::PreviousMonth
            } else if date > last_day {
                CellPosition::NextMonth
            } else {
                CellPosition::CurrentMonth
            };

            let day = DateRange::day(date);
            let mut day_events: Vec<&Event> =
                events.iter().filter(|e| e.starts_within(&day)).collect();
            day_events.sort_by_key(|e| e.start);

            let hidden = day_events.len().saturating_sub(cell_limit);
            day_events.truncate(cell_limit);

            MonthCell {
                date,
                position,
                is_today: date == today,
                events: day_events,
                hidden,
            }
        })
        .collect();

    MonthGrid {
        first_day,
        last_day,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::test_support::*;

    #[test]
    fn always_42_cells() {
        // Feb 2021 starts on a Monday and fills exactly four rows;
        // Aug 2021 starts on a Sunday and needs six.
        for (y, m) in [(2021, 2), (2021, 8), (2024, 2), (2024, 12), (2023, 1)] {
            let grid = month_grid(&[], date(y, m, 15), date(y, m, 15), 3);
            assert_eq!(grid.cells.len(), GRID_CELLS, "{y}-{m}");
            assert_eq!(grid.weeks().count(), 6);
        }
    }

    #[test]
    fn grid_starts_on_monday_and_covers_the_month() {
        // March 2024: the 1st is a Friday.
        let grid = month_grid(&[], date(2024, 3, 10), date(2024, 3, 10), 3);

        assert_eq!(grid.first_day, date(2024, 3, 1));
        assert_eq!(grid.last_day, date(2024, 3, 31));
        assert_eq!(grid.cells[0].date, date(2024, 2, 26));
        assert_eq!(grid.cells[0].position, CellPosition::PreviousMonth);
        assert_eq!(grid.cells[4].date, date(2024, 3, 1));
        assert!(grid.cells[4].in_month());
        assert_eq!(grid.cells[41].date, date(2024, 4, 7));
        assert_eq!(grid.cells[41].position, CellPosition::NextMonth);

        let in_month = grid.cells.iter().filter(|c| c.in_month()).count();
        assert_eq!(in_month, 31);
    }

    #[test]
    fn leap_february_has_29_days() {
        let grid = month_grid(&[], date(2024, 2, 1), date(2024, 2, 1), 3);
        assert_eq!(grid.last_day, date(2024, 2, 29));
        assert_eq!(grid.cells.iter().filter(|c| c.in_month()).count(), 29);
    }

    #[test]
    fn events_land_on_their_start_day() {
        let events = vec![
            event("late", at(2024, 3, 10, 23, 30), at(2024, 3, 11, 0, 30)),
            event("midnight", at(2024, 3, 11, 0, 0), at(2024, 3, 11, 1, 0)),
            event("prev month", at(2024, 2, 27, 10, 0), at(2024, 2, 27, 11, 0)),
        ];
        let grid = month_grid(&events, date(2024, 3, 1), date(2024, 3, 1), 3);

        for cell in &grid.cells {
            for event in &cell.events {
                assert_eq!(event.start_date(), cell.date);
            }
        }

        assert_eq!(titles_on(&grid, date(2024, 3, 10)), ["late"]);
        assert_eq!(titles_on(&grid, date(2024, 3, 11)), ["midnight"]);
        assert_eq!(titles_on(&grid, date(2024, 2, 27)), ["prev month"]);
    }

    fn titles_on(grid: &MonthGrid<'_>, d: NaiveDate) -> Vec<String> {
        grid.cells
            .iter()
            .find(|c| c.date == d)
            .map(|c| c.events.iter().map(|e| e.title.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn cells_truncate_to_limit_and_sort_by_start() {
        let events: Vec<Event> = [14, 9, 11, 16, 8]
            .iter()
            .map(|h| event(&format!("{h}h"), at(2024, 3, 5, *h, 0), at(2024, 3, 5, *h, 30)))
            .collect();
        let grid = month_grid(&events, date(2024, 3, 5), date(2024, 3, 5), 3);

        let cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 5)).unwrap();
        let titles: Vec<_> = cell.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["8h", "9h", "11h"]);
        assert_eq!(cell.hidden, 2);
        assert!(cell.is_today);
    }
}
