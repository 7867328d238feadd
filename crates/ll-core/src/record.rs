//! Activity records.
//!
//! Two paths lead into this module:
//! - [`parse`] is the strict write path. It either yields a fully valid
//!   [`ActivityRecord`] or a [`ValidationError`], never a partial record.
//! - [`screen`] is the permissive read path over rows already in the backing
//!   table. Short rows are dropped with a [`SkipReason`]; rows with a bad date
//!   or duration are kept and carry their [`Exclusion`]s instead.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Date format used by the backing table and all date arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column names of the backing table, in stored order.
pub const HEADER: [&str; 6] = ["date", "activity", "duration", "mood", "tags", "notes"];

/// Mood recorded when none was given.
pub const UNKNOWN_MOOD: &str = "Unknown";

/// Rows with fewer fields than this are noise, not records.
pub const MIN_FIELDS: usize = 4;

/// Validation errors for new records.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The date does not match `YYYY-MM-DD`.
    #[error("invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// The duration is not a non-negative number of hours.
    #[error("invalid duration '{value}': expected a non-negative number of hours")]
    InvalidDuration { value: String },

    /// The activity was blank after trimming.
    #[error("activity cannot be empty")]
    EmptyActivity,
}

/// Raw strings for one new record, as collected from the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordInput {
    pub date: String,
    pub activity: String,
    pub duration: String,
    pub mood: String,
    pub tags: String,
    pub notes: String,
}

impl RecordInput {
    /// Builds input from a field sequence in column order. Missing trailing
    /// fields are treated as empty.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut it = fields.into_iter().map(Into::into);
        let mut next = || it.next().unwrap_or_default();
        Self {
            date: next(),
            activity: next(),
            duration: next(),
            mood: next(),
            tags: next(),
            notes: next(),
        }
    }
}

/// A validated, normalized record ready to be appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityRecord {
    pub date: NaiveDate,
    pub activity: String,
    pub duration: f64,
    pub mood: String,
    pub tags: String,
    pub notes: String,
}

impl ActivityRecord {
    /// The six stored fields in column order.
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.activity.clone(),
            format_hours(self.duration),
            self.mood.clone(),
            self.tags.clone(),
            self.notes.clone(),
        ]
    }
}

/// Validates and normalizes raw input into a record.
pub fn parse(input: &RecordInput) -> Result<ActivityRecord, ValidationError> {
    let date = parse_date(&input.date).ok_or_else(|| ValidationError::InvalidDate {
        value: input.date.clone(),
    })?;

    let duration = parse_hours(&input.duration)
        .filter(|h| *h >= 0.0)
        .ok_or_else(|| ValidationError::InvalidDuration {
            value: input.duration.clone(),
        })?;

    let activity = title_case(input.activity.trim());
    if activity.is_empty() {
        return Err(ValidationError::EmptyActivity);
    }

    Ok(ActivityRecord {
        date,
        activity,
        duration,
        mood: normalize_mood(&input.mood),
        tags: input.tags.trim().to_string(),
        notes: input.notes.trim().to_string(),
    })
}

/// One row of the backing table as stored, header excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    /// 1-based line in the table, counting the header as line 1.
    pub line: usize,
    pub fields: Vec<String>,
}

impl StoredRow {
    pub fn new<I, S>(line: usize, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            line,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    fn field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }
}

/// A stored row that passed screening, normalized for grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggedEntry {
    pub line: usize,
    pub raw_date: String,
    pub date: Option<NaiveDate>,
    pub activity: String,
    pub raw_duration: String,
    pub hours: Option<f64>,
    pub mood: String,
    pub tags: Vec<String>,
    pub notes: String,
}

impl LoggedEntry {
    /// Reasons this entry is left out of date-aware or hour-based aggregates.
    pub fn exclusions(&self) -> Vec<Exclusion> {
        let mut out = Vec::new();
        if self.date.is_none() {
            out.push(Exclusion::UnparseableDate {
                value: self.raw_date.clone(),
            });
        }
        if self.hours.is_none() {
            out.push(Exclusion::NonNumericDuration {
                value: self.raw_duration.clone(),
            });
        }
        out
    }
}

/// Why a kept entry is excluded from some aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exclusion {
    UnparseableDate { value: String },
    NonNumericDuration { value: String },
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnparseableDate { value } => write!(f, "unparseable date '{value}'"),
            Self::NonNumericDuration { value } => write!(f, "non-numeric duration '{value}'"),
        }
    }
}

/// Why a stored row was dropped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    TooFewFields { found: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewFields { found } => {
                write!(f, "only {found} fields, need at least {MIN_FIELDS}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: SkipReason,
}

/// Result of screening stored rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Screening {
    pub kept: Vec<LoggedEntry>,
    pub skipped: Vec<SkippedRow>,
}

impl Screening {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Classifies stored rows into kept entries and skipped rows, preserving order.
pub fn screen<'a, I>(rows: I) -> Screening
where
    I: IntoIterator<Item = &'a StoredRow>,
{
    let mut screening = Screening::default();
    for row in rows {
        match screen_row(row) {
            Ok(entry) => screening.kept.push(entry),
            Err(reason) => {
                tracing::warn!(line = row.line, %reason, "skipping row");
                screening.skipped.push(SkippedRow {
                    line: row.line,
                    reason,
                });
            }
        }
    }
    screening
}

fn screen_row(row: &StoredRow) -> Result<LoggedEntry, SkipReason> {
    if row.fields.len() < MIN_FIELDS {
        return Err(SkipReason::TooFewFields {
            found: row.fields.len(),
        });
    }

    let raw_date = row.field(0).to_string();
    let raw_duration = row.field(2).to_string();
    Ok(LoggedEntry {
        line: row.line,
        date: parse_date(&raw_date),
        activity: title_case(row.field(1).trim()),
        hours: parse_hours(&raw_duration),
        mood: normalize_mood(row.field(3)),
        tags: split_tags(row.field(4)),
        notes: row.field(5).trim().to_string(),
        raw_date,
        raw_duration,
    })
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Coerces text to a finite number of hours.
pub fn parse_hours(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|h| h.is_finite())
}

/// Shortest text that parses back to the same value ("1.5", "2").
pub fn format_hours(hours: f64) -> String {
    format!("{hours}")
}

/// Upper-cases the first letter of every word and lower-cases the rest.
/// Any non-letter starts a new word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}

/// Trims and capitalizes a mood; blank moods become [`UNKNOWN_MOOD`].
pub fn normalize_mood(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        UNKNOWN_MOOD.to_string()
    } else {
        capitalize(trimmed)
    }
}

/// Splits a comma-delimited tag field into trimmed, lower-cased, distinct tags
/// in first-seen order.
pub fn split_tags(field: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    field
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty() && seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(date: &str, activity: &str, duration: &str, mood: &str) -> RecordInput {
        RecordInput {
            date: date.to_string(),
            activity: activity.to_string(),
            duration: duration.to_string(),
            mood: mood.to_string(),
            tags: " health, cardio ".to_string(),
            notes: "  felt good ".to_string(),
        }
    }

    #[test]
    fn parse_normalizes_fields() {
        let record = parse(&input("2025-01-06", "  morning RUN ", "1.50", "hAPPY")).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
        assert_eq!(record.activity, "Morning Run");
        assert!((record.duration - 1.5).abs() < f64::EPSILON);
        assert_eq!(record.mood, "Happy");
        assert_eq!(record.tags, "health, cardio");
        assert_eq!(record.notes, "felt good");
        assert_eq!(
            record.to_fields(),
            ["2025-01-06", "Morning Run", "1.5", "Happy", "health, cardio", "felt good"]
        );
    }

    #[test]
    fn parse_rejects_bad_date() {
        let err = parse(&input("06/01/2025", "Run", "1", "Happy")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDate {
                value: "06/01/2025".to_string()
            }
        );
        assert_eq!(err.to_string(), "invalid date '06/01/2025': expected YYYY-MM-DD");

        assert!(matches!(
            parse(&input("2025-02-30", "Run", "1", "Happy")),
            Err(ValidationError::InvalidDate { .. })
        ));
    }

    #[test]
    fn parse_rejects_bad_duration() {
        for bad in ["", "an hour", "-1", "inf", "NaN"] {
            assert_eq!(
                parse(&input("2025-01-06", "Run", bad, "Happy")),
                Err(ValidationError::InvalidDuration {
                    value: bad.to_string()
                }),
                "duration {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn parse_accepts_zero_duration() {
        let record = parse(&input("2025-01-06", "Nap", "0", "")).unwrap();
        assert!(record.duration.abs() < f64::EPSILON);
        assert_eq!(record.mood, UNKNOWN_MOOD);
    }

    #[test]
    fn parse_rejects_blank_activity() {
        assert_eq!(
            parse(&input("2025-01-06", "   ", "1", "Happy")),
            Err(ValidationError::EmptyActivity)
        );
    }

    #[test]
    fn record_input_from_short_field_list() {
        let input = RecordInput::from_fields(["2025-01-06", "Run", "1"]);
        assert_eq!(input.duration, "1");
        assert_eq!(input.mood, "");
        assert_eq!(input.notes, "");
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("running"), "Running");
        assert_eq!(title_case("deep WORK session"), "Deep Work Session");
        assert_eq!(title_case("pair-programming"), "Pair-Programming");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn capitalize_lowercases_tail() {
        assert_eq!(capitalize("tIRED"), "Tired");
        assert_eq!(capitalize("very happy"), "Very happy");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn split_tags_trims_lowercases_and_dedups() {
        assert_eq!(split_tags("Health, Workout"), vec!["health", "workout"]);
        assert_eq!(split_tags("a,,A, b ,"), vec!["a", "b"]);
        assert!(split_tags("  ").is_empty());
    }

    #[test]
    fn screen_skips_short_rows_with_reason() {
        let rows = vec![
            StoredRow::new(2, ["2025-01-06", "Run", "1.5", "Happy", "health", ""]),
            StoredRow::new(3, ["2025-01-06", "Run", "1.0"]),
            StoredRow::new(4, ["2025-01-07", "read", "1", "calm"]),
        ];

        let screening = screen(&rows);

        assert_eq!(screening.kept.len(), 2);
        assert_eq!(screening.kept[0].line, 2);
        assert_eq!(screening.kept[1].activity, "Read");
        assert!(screening.kept[1].tags.is_empty());
        assert_eq!(
            screening.skipped,
            vec![SkippedRow {
                line: 3,
                reason: SkipReason::TooFewFields { found: 3 }
            }]
        );
        assert_eq!(
            screening.skipped[0].reason.to_string(),
            "only 3 fields, need at least 4"
        );
    }

    #[test]
    fn screen_keeps_rows_with_bad_values_and_names_exclusions() {
        let rows = vec![StoredRow::new(2, ["someday", "running ", "lots", ""])];

        let screening = screen(&rows);
        let entry = &screening.kept[0];

        assert_eq!(entry.activity, "Running");
        assert_eq!(entry.mood, UNKNOWN_MOOD);
        assert_eq!(entry.date, None);
        assert_eq!(entry.hours, None);
        assert_eq!(
            entry.exclusions(),
            vec![
                Exclusion::UnparseableDate {
                    value: "someday".to_string()
                },
                Exclusion::NonNumericDuration {
                    value: "lots".to_string()
                },
            ]
        );
    }

    #[test]
    fn format_hours_round_trips() {
        for h in [0.0, 1.0, 1.5, 0.25, 12.75] {
            assert_eq!(parse_hours(&format_hours(h)), Some(h));
        }
        assert_eq!(format_hours(2.0), "2");
    }
}
