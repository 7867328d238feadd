//! Core domain logic for lifelog.
//!
//! This crate contains the fundamental types and logic for:
//! - Records: validating new entries and screening stored rows
//! - Aggregation: overall, weekly, date-range and tag summaries
//! - Export: the cleaned table, aggregate tables and the text report
//!
//! Nothing here touches the filesystem or the clock; callers pass rows and
//! "today" in explicitly.

pub mod export;
pub mod record;
mod summary;
mod tags;
mod tally;
mod window;

pub use export::{ActivityAverage, ChartSeries, CleanRecord, ExportBundle, TextReport, WeekdayHours};
pub use record::{
    ActivityRecord, DATE_FORMAT, Exclusion, HEADER, LoggedEntry, RecordInput, Screening,
    SkipReason, SkippedRow, StoredRow, ValidationError, parse, screen,
};
pub use summary::{
    DayTotal, DurationStats, Ranked, RangeSummary, Summary, WEEKDAY_NAMES, WeeklySummary,
    range_summary, summarize, weekly_summary,
};
pub use tags::{TagBreakdown, TagStats, search_notes, top_note_words};
pub use tally::Tally;
pub use window::{DateWindow, RangeError};
