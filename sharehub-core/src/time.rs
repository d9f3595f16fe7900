//! Time utilities: local "today", calendar-date parsing and the Monday–Sunday week.

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse an IANA tz like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Calendar date of `now_utc` as seen on a wall clock in `tz`.
pub fn local_today(now_utc: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now_utc.with_timezone(&tz).date_naive()
}

/// Parse a stored date string into a calendar date.
///
/// Accepts `YYYY-MM-DD` and anything that starts with it (RFC3339 timestamps
/// written by the web client). Returns `None` for anything else.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// Monday through Sunday (inclusive) of the week containing a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Weeks start on Monday regardless of locale; Sunday is the last day.
    pub fn containing(day: NaiveDate) -> Self {
        let back = day.weekday().num_days_from_monday() as i64;
        let start = day - Duration::days(back);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// "Friday, October 16"
pub fn format_full_date(day: NaiveDate) -> String {
    day.format("%A, %B %-d").to_string()
}

/// "Oct 16"
pub fn format_short_date(day: NaiveDate) -> String {
    day.format("%b %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn week_starts_monday_for_midweek_day() {
        // 2026-10-16 is a Friday
        let w = WeekWindow::containing(d(2026, 10, 16));
        assert_eq!(w.start, d(2026, 10, 12));
        assert_eq!(w.end, d(2026, 10, 18));
    }

    #[test]
    fn sunday_is_last_day_of_its_week() {
        let w = WeekWindow::containing(d(2026, 10, 18));
        assert_eq!(w.start, d(2026, 10, 12));
        assert!(w.contains(d(2026, 10, 18)));
        assert!(!w.contains(d(2026, 10, 19)));
    }

    #[test]
    fn monday_starts_its_own_week() {
        let w = WeekWindow::containing(d(2026, 10, 19));
        assert_eq!(w.start, d(2026, 10, 19));
        assert_eq!(w.end, d(2026, 10, 25));
    }

    #[test]
    fn parses_plain_and_timestamp_dates() {
        assert_eq!(parse_calendar_date("2026-10-14"), Some(d(2026, 10, 14)));
        assert_eq!(
            parse_calendar_date("2026-10-14T09:30:00.000Z"),
            Some(d(2026, 10, 14))
        );
    }

    #[test]
    fn malformed_dates_are_none() {
        assert_eq!(parse_calendar_date(""), None);
        assert_eq!(parse_calendar_date("next tuesday"), None);
        assert_eq!(parse_calendar_date("2026-13-40"), None);
        assert_eq!(parse_calendar_date("2026-10"), None);
    }

    #[test]
    fn local_today_respects_timezone() {
        // 03:00 UTC on the 17th is still the 16th in Chicago (CDT, UTC-5)
        let now = chrono::TimeZone::with_ymd_and_hms(&Utc, 2026, 10, 17, 3, 0, 0).unwrap();
        let tz = parse_timezone("America/Chicago").unwrap();
        assert_eq!(local_today(now, tz), d(2026, 10, 16));
    }

    #[test]
    fn formats_dates_in_english() {
        assert_eq!(format_full_date(d(2026, 10, 16)), "Friday, October 16");
        assert_eq!(format_short_date(d(2026, 10, 4)), "Oct 4");
    }
}
