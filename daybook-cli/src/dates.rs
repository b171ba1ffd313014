//! Natural-language date input ("tomorrow 3pm", "fri", "march 20").

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use daybook_core::date_range::parse_date;

/// A parsed start or end: with a time of day, or a whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl When {
    pub fn is_all_day(&self) -> bool {
        matches!(self, When::Date(_))
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            When::Date(d) => *d,
            When::DateTime(dt) => dt.date(),
        }
    }

    /// Midnight for whole days.
    pub fn to_datetime(&self) -> NaiveDateTime {
        match self {
            When::Date(d) => d.and_time(NaiveTime::MIN),
            When::DateTime(dt) => *dt,
        }
    }

    fn plus(&self, duration: Duration) -> Option<When> {
        match self {
            When::Date(d) => d.checked_add_signed(duration).map(When::Date),
            When::DateTime(dt) => dt.checked_add_signed(duration).map(When::DateTime),
        }
    }
}

const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Free-form date input, lowercased and split into words.
struct Phrase {
    words: Vec<String>,
}

impl Phrase {
    fn new(input: &str) -> Self {
        Phrase {
            words: input.split_whitespace().map(str::to_lowercase).collect(),
        }
    }

    /// fuzzydate only knows full weekday and month names, so "thurs" and
    /// "sept" are spelled out first.
    fn spelled_out(&self) -> String {
        self.words
            .iter()
            .map(|word| full_name(word).unwrap_or(word.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// "6pm", "6 pm", "15:00", "noon", "at 3". Without one the input names a whole day.
    fn has_time(&self) -> bool {
        self.words.iter().enumerate().any(|(i, word)| {
            let previous = i.checked_sub(1).map(|p| self.words[p].as_str());

            is_clock(word)
                || (matches!(word.as_str(), "am" | "pm") && previous.is_some_and(starts_with_digit))
                || (previous == Some("at") && starts_with_digit(word))
        })
    }
}

/// Weekday or month name that `word` abbreviates (at least three letters).
fn full_name(word: &str) -> Option<&'static str> {
    if word.len() < 3 {
        return None;
    }
    WEEKDAYS
        .iter()
        .chain(MONTHS.iter())
        .copied()
        .find(|name| name.starts_with(word))
}

fn is_clock(word: &str) -> bool {
    if word == "noon" || word == "midnight" {
        return true;
    }

    let hour = word.strip_suffix("am").or_else(|| word.strip_suffix("pm"));
    if hour.is_some_and(|h| h.ends_with(|c: char| c.is_ascii_digit())) {
        return true;
    }

    word.as_bytes()
        .windows(3)
        .any(|w| w[0].is_ascii_digit() && w[1] == b':' && w[2].is_ascii_digit())
}

fn starts_with_digit(word: &str) -> bool {
    word.starts_with(|c: char| c.is_ascii_digit())
}

/// Parse a start or end. ISO dates (`2024-03-10`, `2024-03-10T09:00`) are
/// accepted as-is; anything else goes through fuzzydate. Input without a
/// time of day yields a whole day.
pub fn parse_when(input: &str) -> Result<When> {
    let trimmed = input.trim();

    if let Ok(date) = parse_date(trimmed) {
        return Ok(When::Date(date));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(When::DateTime(dt));
        }
    }

    let phrase = Phrase::new(trimmed);
    let spelled = phrase.spelled_out();
    let dt = fuzzydate::parse(&spelled)
        .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?;

    if phrase.has_time() {
        Ok(When::DateTime(dt))
    } else {
        Ok(When::Date(dt.date()))
    }
}

/// Parse a calendar day, discarding any time of day.
pub fn parse_day(input: &str) -> Result<NaiveDate> {
    Ok(parse_when(input)?.date())
}

/// Parse an end: a duration first (humantime), then a date/time.
pub fn parse_end(input: &str, start: When) -> Result<When> {
    if let Ok(end) = try_apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    parse_when(cleaned)
}

pub fn apply_duration(start: When, input: &str) -> Result<When> {
    try_apply_duration(start, input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))
}

fn try_apply_duration(start: When, input: &str) -> Result<When> {
    let std_dur = humantime::parse_duration(input).map_err(|e| anyhow::anyhow!("{}", e))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;

    start.plus(chrono_dur).context("Duration too large")
}

/// Default end: +1 hour for timed events, +1 day for whole days.
pub fn default_end(start: When) -> When {
    let step = if start.is_all_day() {
        Duration::days(1)
    } else {
        Duration::hours(1)
    };
    start.plus(step).unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn at(h: u32, m: u32) -> When {
        When::DateTime(
            NaiveDate::from_ymd_opt(2026, 3, 20)
                .unwrap()
                .and_hms_opt(h, m, 0)
                .unwrap(),
        )
    }

    fn timed(input: &str) -> bool {
        Phrase::new(input).has_time()
    }

    #[test]
    fn clock_times_are_detected() {
        assert!(timed("tomorrow 6pm"));
        assert!(timed("friday 11am"));
        assert!(timed("sat 3 pm"));
        assert!(timed("9AM"));
        assert!(timed("tomorrow 15:00"));
        assert!(timed("mon 10:30am"));
    }

    #[test]
    fn keywords_and_at_are_detected() {
        assert!(timed("tomorrow noon"));
        assert!(timed("Midnight"));
        assert!(timed("friday at 15"));
        assert!(timed("at 9"));
    }

    #[test]
    fn whole_days_have_no_time() {
        assert!(!timed("tomorrow"));
        assert!(!timed("march 20"));
        assert!(!timed("december"));
        assert!(!timed("camp"));
        assert!(!timed("afternoon"));
        assert!(!timed("look at that"));
    }

    #[test]
    fn abbreviations_are_spelled_out() {
        assert_eq!(Phrase::new("sat 3pm").spelled_out(), "saturday 3pm");
        assert_eq!(Phrase::new("Sept 5").spelled_out(), "september 5");
        assert_eq!(Phrase::new("thurs  at 9").spelled_out(), "thursday at 9");
        assert_eq!(Phrase::new("next friday").spelled_out(), "next friday");
        assert_eq!(Phrase::new("in 2 months").spelled_out(), "in 2 months");
    }

    #[test]
    fn iso_input_is_exact() {
        assert_eq!(
            parse_when("2024-03-10").unwrap(),
            When::Date(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
        );
        let when = parse_when("2024-03-10T09:30").unwrap();
        assert_eq!(when.to_datetime().format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn fuzzy_input() {
        assert!(matches!(parse_when("tomorrow 3pm").unwrap(), When::DateTime(_)));
        assert!(parse_when("tomorrow").unwrap().is_all_day());

        let day = parse_day("march 20").unwrap();
        assert_eq!((day.month(), day.day()), (3, 20));

        assert!(parse_when("not a date at all xyz").is_err());
    }

    #[test]
    fn default_end_steps() {
        assert_eq!(default_end(at(15, 0)), at(16, 0));

        let day = When::Date(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap());
        assert_eq!(
            default_end(day),
            When::Date(NaiveDate::from_ymd_opt(2026, 3, 21).unwrap())
        );
    }

    #[test]
    fn durations_and_end_input() {
        assert_eq!(apply_duration(at(15, 0), "30m").unwrap(), at(15, 30));
        assert_eq!(parse_end("2hours", at(14, 0)).unwrap(), at(16, 0));
        assert!(apply_duration(at(15, 0), "soon").is_err());
    }
}
