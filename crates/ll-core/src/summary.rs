//! Aggregation over screened entries: overall, weekly and date-range summaries.
//!
//! All functions are pure over the entries they are given. Callers re-read the
//! backing table for every query; nothing is cached here.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::record::LoggedEntry;
use crate::tally::Tally;
use crate::window::{DateWindow, RangeError};

/// Weekday names, Monday first, indexed by `num_days_from_monday`.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// A label with its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub label: String,
    pub count: usize,
}

impl Ranked {
    pub(crate) fn from_tally(tally: &Tally<String>) -> Option<Self> {
        tally.most_common().map(|(label, count)| Self {
            label: label.clone(),
            count,
        })
    }

    pub(crate) fn top(tally: &Tally<String>, n: usize) -> Vec<Self> {
        tally
            .top(n)
            .into_iter()
            .map(|(label, count)| Self {
                label: label.clone(),
                count,
            })
            .collect()
    }
}

/// Totals and most-common values over a set of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub entries: usize,
    pub total_hours: f64,
    pub top_activity: Option<Ranked>,
    pub top_mood: Option<Ranked>,
}

impl Summary {
    pub const fn is_empty(&self) -> bool {
        self.entries == 0
    }
}

/// Summarizes entries. Entries without numeric hours still count towards the
/// most-common activity and mood.
pub fn summarize<'a, I>(entries: I) -> Summary
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let mut count = 0;
    let mut total_hours = 0.0;
    let mut activities = Tally::new();
    let mut moods = Tally::new();

    for entry in entries {
        count += 1;
        total_hours += entry.hours.unwrap_or(0.0);
        activities.add(entry.activity.clone());
        moods.add(entry.mood.clone());
    }

    Summary {
        entries: count,
        total_hours,
        top_activity: Ranked::from_tally(&activities),
        top_mood: Ranked::from_tally(&moods),
    }
}

/// Summary of entries dated inside an explicit window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSummary {
    pub window: DateWindow,
    pub summary: Summary,
}

pub fn range_summary<'a, I>(entries: I, window: DateWindow) -> RangeSummary
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let in_window = entries
        .into_iter()
        .filter(|e| e.date.is_some_and(|d| window.contains(d)));
    RangeSummary {
        window,
        summary: summarize(in_window),
    }
}

/// Hours logged on one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayTotal {
    pub weekday: Weekday,
    pub hours: f64,
}

impl DayTotal {
    pub fn name(&self) -> &'static str {
        WEEKDAY_NAMES[self.weekday.num_days_from_monday() as usize]
    }
}

/// Hours per weekday for the week containing a reference date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub window: DateWindow,
    pub total_hours: f64,
    /// Monday = 0 … Sunday = 6.
    pub hours_by_weekday: [f64; 7],
    /// Absent when nothing was logged this week.
    pub busiest_day: Option<DayTotal>,
}

/// Fails only when the week around `today` leaves the supported calendar.
pub fn weekly_summary<'a, I>(entries: I, today: NaiveDate) -> Result<WeeklySummary, RangeError>
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let window = DateWindow::week_containing(today)?;
    let mut hours_by_weekday = [0.0; 7];

    for entry in entries {
        let (Some(date), Some(hours)) = (entry.date, entry.hours) else {
            continue;
        };
        if window.contains(date) {
            hours_by_weekday[date.weekday().num_days_from_monday() as usize] += hours;
        }
    }

    // Summing the buckets keeps the total consistent with the per-day map.
    let total_hours: f64 = hours_by_weekday.iter().sum();

    let busiest_day = (total_hours > 0.0).then(|| {
        let mut best = 0;
        for (i, hours) in hours_by_weekday.iter().enumerate() {
            if *hours > hours_by_weekday[best] {
                best = i;
            }
        }
        DayTotal {
            weekday: weekday_from_index(best),
            hours: hours_by_weekday[best],
        }
    });

    Ok(WeeklySummary {
        window,
        total_hours,
        hours_by_weekday,
        busiest_day,
    })
}

fn weekday_from_index(i: usize) -> Weekday {
    match i {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    }
}

/// Spread of numeric durations, for the data overview.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DurationStats {
    pub count: usize,
    pub min: f64,
    pub mean: f64,
    pub max: f64,
}

impl DurationStats {
    /// `None` when no entry has numeric hours.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_entries<'a, I>(entries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LoggedEntry>,
    {
        let hours: Vec<f64> = entries.into_iter().filter_map(|e| e.hours).collect();
        if hours.is_empty() {
            return None;
        }
        let sum: f64 = hours.iter().sum();
        Some(Self {
            count: hours.len(),
            min: hours.iter().copied().fold(f64::INFINITY, f64::min),
            mean: sum / hours.len() as f64,
            max: hours.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}
