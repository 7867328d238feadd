//! Inclusive date windows for weekly and ranged summaries.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use crate::record::{DATE_FORMAT, parse_date};

/// Errors building a date window from user input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A bound did not parse as `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidRange { value: String },

    /// The start bound falls after the end bound.
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// The week around a date runs past the calendar bounds.
    #[error("no full week around {date}")]
    OutOfBounds { date: NaiveDate },
}

/// A closed `[start, end]` date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvertedRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds, reporting the first one that fails.
    pub fn parse(start: &str, end: &str) -> Result<Self, RangeError> {
        let parse_bound = |s: &str| {
            parse_date(s).ok_or_else(|| RangeError::InvalidRange {
                value: s.to_string(),
            })
        };
        Self::new(parse_bound(start)?, parse_bound(end)?)
    }

    /// Monday through Sunday of the week containing `today`.
    pub fn week_containing(today: NaiveDate) -> Result<Self, RangeError> {
        let days_since_monday = today.weekday().num_days_from_monday();
        let out_of_bounds = || RangeError::OutOfBounds { date: today };
        let monday = today
            .checked_sub_signed(Duration::days(i64::from(days_since_monday)))
            .ok_or_else(out_of_bounds)?;
        let sunday = monday
            .checked_add_signed(Duration::days(6))
            .ok_or_else(out_of_bounds)?;
        Ok(Self {
            start: monday,
            end: sunday,
        })
    }

    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_containing_midweek_date() {
        // Jan 29, 2025 is a Wednesday
        let week = DateWindow::week_containing(date(2025, 1, 29)).unwrap();
        assert_eq!(week.start(), date(2025, 1, 27));
        assert_eq!(week.end(), date(2025, 2, 2));
        assert_eq!(week.days(), 7);
    }

    #[test]
    fn week_containing_monday_and_sunday() {
        let monday = DateWindow::week_containing(date(2025, 1, 27)).unwrap();
        let sunday = DateWindow::week_containing(date(2025, 2, 2)).unwrap();
        assert_eq!(monday, sunday);
        assert_eq!(monday.start(), date(2025, 1, 27));
    }

    #[test]
    fn week_at_calendar_edge_is_an_error() {
        let err = DateWindow::week_containing(NaiveDate::MAX).unwrap_err();
        assert_eq!(err, RangeError::OutOfBounds { date: NaiveDate::MAX });
        assert!(DateWindow::week_containing(NaiveDate::MIN).is_err());
    }

    #[test]
    fn contains_is_inclusive() {
        let window = DateWindow::new(date(2025, 1, 6), date(2025, 1, 8)).unwrap();
        assert!(window.contains(date(2025, 1, 6)));
        assert!(window.contains(date(2025, 1, 8)));
        assert!(!window.contains(date(2025, 1, 5)));
        assert!(!window.contains(date(2025, 1, 9)));
    }

    #[test]
    fn single_day_window() {
        let window = DateWindow::parse("2025-01-06", "2025-01-06").unwrap();
        assert_eq!(window.days(), 1);
        assert!(window.contains(date(2025, 1, 6)));
    }

    #[test]
    fn parse_reports_invalid_bound() {
        assert_eq!(
            DateWindow::parse("2025-01-06", "next week"),
            Err(RangeError::InvalidRange {
                value: "next week".to_string()
            })
        );
    }

    #[test]
    fn parse_reports_inverted_range() {
        let err = DateWindow::parse("2025-01-08", "2025-01-06").unwrap_err();
        assert_eq!(
            err,
            RangeError::InvertedRange {
                start: date(2025, 1, 8),
                end: date(2025, 1, 6)
            }
        );
        assert_eq!(err.to_string(), "start date 2025-01-08 is after end date 2025-01-06");
    }

    #[test]
    fn display_uses_arrow() {
        let window = DateWindow::new(date(2025, 1, 6), date(2025, 1, 12)).unwrap();
        assert_eq!(window.to_string(), "2025-01-06 → 2025-01-12");
    }
}
