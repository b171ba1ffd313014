//! Date ranges for placing events on days and weeks.

use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DaybookError, DaybookResult};

/// Half-open range `[start, end)` of local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        DateRange { start, end }
    }

    /// Midnight to midnight of `date`.
    pub fn day(date: NaiveDate) -> Self {
        Self::days(date, 1)
    }

    /// `count` whole days starting at midnight of `from`.
    pub fn days(from: NaiveDate, count: u64) -> Self {
        let start = from.and_time(NaiveTime::MIN);
        let end = from
            .checked_add_days(Days::new(count))
            .map(|d| d.and_time(NaiveTime::MIN))
            .unwrap_or(NaiveDateTime::MAX);
        DateRange { start, end }
    }

    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t < self.end
    }
}

/// Current local wall-clock time.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Today's local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> DaybookResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        DaybookError::validation(format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn day_range_is_half_open() {
        let range = DateRange::day(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());

        assert!(range.contains(at(2024, 3, 10, 0, 0)));
        assert!(range.contains(at(2024, 3, 10, 23, 59)));
        assert!(!range.contains(at(2024, 3, 11, 0, 0)));
        assert!(!range.contains(at(2024, 3, 9, 23, 59)));
    }

    #[test]
    fn multi_day_range_crosses_month_end() {
        let range = DateRange::days(NaiveDate::from_ymd_opt(2024, 2, 26).unwrap(), 7);
        assert_eq!(range.end, at(2024, 3, 4, 0, 0));
        assert!(range.contains(at(2024, 2, 29, 12, 0)));
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert_eq!(
            parse_date("2024-03-10").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
        );
        assert!(parse_date("10/03/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }
}
