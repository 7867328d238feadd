//! Export artifacts derived from screened entries.
//!
//! [`ExportBundle::build`] computes everything the export step writes: the
//! cleaned table, mean hours per activity, hours per weekday and the short
//! text report. Writing them out is the storage layer's job.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::record::{DATE_FORMAT, LoggedEntry, format_hours};
use crate::summary::WEEKDAY_NAMES;
use crate::tally::Tally;

/// A row of the cleaned table: dated, normalized and unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanRecord {
    pub date: NaiveDate,
    pub activity: String,
    /// `None` when the stored duration was not numeric.
    pub duration: Option<f64>,
    pub mood: String,
    pub tags: Vec<String>,
    pub notes: String,
}

impl CleanRecord {
    fn from_entry(entry: &LoggedEntry) -> Option<Self> {
        Some(Self {
            date: entry.date?,
            activity: entry.activity.clone(),
            duration: entry.hours,
            mood: entry.mood.clone(),
            tags: entry.tags.clone(),
            notes: entry.notes.clone(),
        })
    }

    /// The six stored fields in column order.
    pub fn to_fields(&self) -> [String; 6] {
        [
            self.date.format(DATE_FORMAT).to_string(),
            self.activity.clone(),
            self.duration.map(format_hours).unwrap_or_default(),
            self.mood.clone(),
            self.tags.join(","),
            self.notes.clone(),
        ]
    }
}

/// Drops undated entries and exact duplicates, keeping the first occurrence
/// and insertion order.
pub fn clean<'a, I>(entries: I) -> Vec<CleanRecord>
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let mut seen = HashSet::new();
    let mut dropped_undated = 0usize;
    let mut dropped_duplicates = 0usize;
    let mut out = Vec::new();

    for entry in entries {
        let Some(record) = CleanRecord::from_entry(entry) else {
            dropped_undated += 1;
            continue;
        };
        if seen.insert(record.to_fields()) {
            out.push(record);
        } else {
            dropped_duplicates += 1;
        }
    }

    tracing::debug!(
        kept = out.len(),
        dropped_undated,
        dropped_duplicates,
        "cleaned entries"
    );
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityAverage {
    pub activity: String,
    pub mean_hours: f64,
}

/// Mean hours per activity, sorted by activity name. Activities with no
/// numeric duration are left out.
#[allow(clippy::cast_precision_loss)]
pub fn average_hours_per_activity(records: &[CleanRecord]) -> Vec<ActivityAverage> {
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        if let Some(hours) = record.duration {
            let slot = sums.entry(record.activity.as_str()).or_default();
            slot.0 += hours;
            slot.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(activity, (sum, n))| ActivityAverage {
            activity: activity.to_string(),
            mean_hours: sum / n as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayHours {
    pub weekday: &'static str,
    pub hours: f64,
}

/// Total hours per calendar weekday, Monday through Sunday. All seven days
/// are present.
pub fn hours_per_weekday(records: &[CleanRecord]) -> Vec<WeekdayHours> {
    let mut totals = [0.0; 7];
    for record in records {
        if let Some(hours) = record.duration {
            totals[record.date.weekday().num_days_from_monday() as usize] += hours;
        }
    }
    WEEKDAY_NAMES
        .into_iter()
        .zip(totals)
        .map(|(weekday, hours)| WeekdayHours { weekday, hours })
        .collect()
}

/// Three-line plain-text report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextReport {
    pub top_activity: Option<String>,
    pub top_mood: Option<String>,
    pub total_hours: f64,
}

impl TextReport {
    pub fn from_records(records: &[CleanRecord]) -> Self {
        let activities: Tally<&str> = records.iter().map(|r| r.activity.as_str()).collect();
        let moods: Tally<&str> = records.iter().map(|r| r.mood.as_str()).collect();
        Self {
            top_activity: activities.most_common().map(|(a, _)| (*a).to_string()),
            top_mood: moods.most_common().map(|(m, _)| (*m).to_string()),
            total_hours: records.iter().filter_map(|r| r.duration).sum(),
        }
    }
}

impl fmt::Display for TextReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Most common activity: {}",
            self.top_activity.as_deref().unwrap_or("n/a")
        )?;
        writeln!(
            f,
            "Most common mood: {}",
            self.top_mood.as_deref().unwrap_or("n/a")
        )?;
        writeln!(f, "Total hours logged: {}", format_hours(self.total_hours))
    }
}

/// A labelled series handed to a chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub unit: &'static str,
    pub points: Vec<(String, f64)>,
}

/// Everything the export step produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportBundle {
    pub cleaned: Vec<CleanRecord>,
    pub averages: Vec<ActivityAverage>,
    pub weekdays: Vec<WeekdayHours>,
    pub report: TextReport,
}

impl ExportBundle {
    pub fn build<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LoggedEntry>,
    {
        let cleaned = clean(entries);
        Self {
            averages: average_hours_per_activity(&cleaned),
            weekdays: hours_per_weekday(&cleaned),
            report: TextReport::from_records(&cleaned),
            cleaned,
        }
    }

    /// Bar-chart series for hours per weekday and mean hours per activity.
    pub fn charts(&self) -> [ChartSeries; 2] {
        [
            ChartSeries {
                title: "Weekly Activity Duration".to_string(),
                unit: "Hours",
                points: self
                    .weekdays
                    .iter()
                    .map(|w| (w.weekday.to_string(), w.hours))
                    .collect(),
            },
            ChartSeries {
                title: "Average Duration per Activity".to_string(),
                unit: "Hours",
                points: self
                    .averages
                    .iter()
                    .map(|a| (a.activity.clone(), a.mean_hours))
                    .collect(),
            },
        ]
    }
}
