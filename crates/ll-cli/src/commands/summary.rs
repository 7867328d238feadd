//! Summary commands: overall, current week and explicit date range.
//!
//! Each command re-reads the data file, screens it and prints either a
//! human-readable report or JSON.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use ll_core::{
    DateWindow, Ranked, RangeSummary, Screening, Summary, WEEKDAY_NAMES, WeeklySummary,
    range_summary, summarize, weekly_summary,
};
use ll_store::Table;

use super::util::{NO_DATA, fmt_hours, load_entries, progress_bar};

// ========== Formatting ==========

fn write_ranked(output: &mut String, what: &str, ranked: Option<&Ranked>) {
    if let Some(r) = ranked {
        writeln!(output, "Most common {what}: {} ({} times)", r.label, r.count).unwrap();
    }
}

fn write_skipped(output: &mut String, screening: &Screening) {
    if !screening.skipped.is_empty() {
        let lines: Vec<String> = screening.skipped.iter().map(|s| s.line.to_string()).collect();
        writeln!(
            output,
            "Skipped {} malformed row(s) (lines {})",
            screening.skipped.len(),
            lines.join(", ")
        )
        .unwrap();
    }
}

/// Formats the overall summary.
pub fn format_summary(summary: &Summary) -> String {
    let mut output = String::new();
    writeln!(output, "Summary").unwrap();
    writeln!(output, "Total hours logged: {}", fmt_hours(summary.total_hours)).unwrap();
    write_ranked(&mut output, "activity", summary.top_activity.as_ref());
    write_ranked(&mut output, "mood", summary.top_mood.as_ref());
    output
}

/// Formats the weekly summary with a bar per weekday.
pub fn format_weekly(week: &WeeklySummary) -> String {
    let mut output = String::new();
    writeln!(output, "Weekly Summary").unwrap();
    writeln!(output, "Week of {}", week.window).unwrap();
    writeln!(
        output,
        "Total hours logged this week: {}",
        fmt_hours(week.total_hours)
    )
    .unwrap();

    let Some(best) = week.busiest_day else {
        return output;
    };
    writeln!(
        output,
        "Most productive day: {} ({} hours)",
        best.name(),
        fmt_hours(best.hours)
    )
    .unwrap();

    writeln!(output).unwrap();
    for (name, hours) in WEEKDAY_NAMES.iter().zip(week.hours_by_weekday) {
        writeln!(
            output,
            "  {name:<9}  {:>6}  {}",
            fmt_hours(hours),
            progress_bar(hours, best.hours)
        )
        .unwrap();
    }
    output
}

/// Formats a date-range summary.
pub fn format_range(range: &RangeSummary) -> String {
    let mut output = String::new();
    writeln!(output, "Summary for {}", range.window).unwrap();
    if range.summary.is_empty() {
        writeln!(output, "No entries in this range.").unwrap();
        return output;
    }
    writeln!(output, "Total hours: {}", fmt_hours(range.summary.total_hours)).unwrap();
    write_ranked(&mut output, "activity", range.summary.top_activity.as_ref());
    write_ranked(&mut output, "mood", range.summary.top_mood.as_ref());
    output
}

// ========== Public Interface ==========

/// Runs the overall summary command.
pub fn run<W: Write>(writer: &mut W, table: &Table, json: bool) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let summary = summarize(&screening.kept);
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        let mut output = format_summary(&summary);
        write_skipped(&mut output, &screening);
        write!(writer, "{output}")?;
    }
    Ok(())
}

/// Runs the weekly summary for the week containing `date`, or today.
pub fn run_week<W: Write>(
    writer: &mut W,
    table: &Table,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let today = date.unwrap_or_else(|| Local::now().date_naive());
    let week = weekly_summary(&screening.kept, today)?;
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&week)?)?;
    } else {
        write!(writer, "{}", format_weekly(&week))?;
    }
    Ok(())
}

/// Runs the date-range summary.
///
/// Bounds are validated before the data file is read; an invalid or inverted
/// range computes nothing.
pub fn run_range<W: Write>(
    writer: &mut W,
    table: &Table,
    start: &str,
    end: &str,
    json: bool,
) -> Result<()> {
    let window = DateWindow::parse(start, end)?;

    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let range = range_summary(&screening.kept, window);
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&range)?)?;
    } else {
        write!(writer, "{}", format_range(&range))?;
    }
    Ok(())
}
