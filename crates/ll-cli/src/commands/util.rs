//! Shared utilities for CLI commands.

use std::fmt::Write;

use anyhow::Context;
use chrono::NaiveDate;
use ll_core::{ChartSeries, DATE_FORMAT, Screening, StoredRow, screen};
use ll_store::{StoreError, Table};

/// Printed whenever the data file is missing.
pub const NO_DATA: &str = "No data yet.";

/// Clap value parser for `YYYY-MM-DD` arguments.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| format!("invalid date '{s}': expected YYYY-MM-DD"))
}

/// Reads all stored rows, or `None` when the data file does not exist.
pub fn load_rows(table: &Table) -> anyhow::Result<Option<Vec<StoredRow>>> {
    match table.read_rows() {
        Ok(rows) => Ok(Some(rows)),
        Err(StoreError::Unavailable { path }) => {
            tracing::debug!(path = %path.display(), "data file missing");
            Ok(None)
        }
        Err(e) => Err(e).context("failed to read data file"),
    }
}

/// Reads and screens all stored rows, or `None` when the data file does not
/// exist.
pub fn load_entries(table: &Table) -> anyhow::Result<Option<Screening>> {
    Ok(load_rows(table)?.map(|rows| {
        let screening = screen(&rows);
        tracing::debug!(
            kept = screening.kept.len(),
            skipped = screening.skipped.len(),
            "screened rows"
        );
        screening
    }))
}

/// Formats hours with at most two decimals and no trailing zeros.
pub fn fmt_hours(hours: f64) -> String {
    let s = format!("{hours:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Generates a 10-character progress bar.
/// Non-zero values below 5% of max get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return "░░░░░░░░░░".to_string();
    }

    let ratio = value / max;
    let filled = if ratio < 0.05 {
        1
    } else {
        (ratio * 10.0).round().min(10.0) as usize
    };

    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Renders a chart series as labelled text bars.
pub fn render_chart(series: &ChartSeries) -> String {
    let mut output = String::new();
    writeln!(output, "{} ({})", series.title, series.unit).unwrap();

    if series.points.is_empty() {
        writeln!(output, "  (no data)").unwrap();
        return output;
    }

    let width = series.points.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let max = series.points.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    for (label, value) in &series.points {
        let bar = progress_bar(*value, max);
        writeln!(output, "  {label:<width$}  {:>6}  {bar}", fmt_hours(*value)).unwrap();
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_hours_trims_zeros() {
        assert_eq!(fmt_hours(2.5), "2.5");
        assert_eq!(fmt_hours(3.0), "3");
        assert_eq!(fmt_hours(0.1 + 0.2), "0.3");
        assert_eq!(fmt_hours(1.256), "1.26");
        assert_eq!(fmt_hours(0.0), "0");
    }

    #[test]
    fn test_progress_bar_full() {
        assert_eq!(progress_bar(4.0, 4.0), "██████████");
    }

    #[test]
    fn test_progress_bar_partial() {
        assert_eq!(progress_bar(1.5, 2.5), "██████░░░░");
    }

    #[test]
    fn test_progress_bar_minimum() {
        assert_eq!(progress_bar(0.1, 10.0), "█░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_zero() {
        assert_eq!(progress_bar(0.0, 10.0), "░░░░░░░░░░");
        assert_eq!(progress_bar(0.0, 0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_parse_date_arg() {
        assert_eq!(
            parse_date_arg("2025-01-06"),
            Ok(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
        );
        assert!(parse_date_arg("yesterday").is_err());
    }

    #[test]
    fn test_render_chart() {
        let series = ChartSeries {
            title: "Average Duration per Activity".to_string(),
            unit: "Hours",
            points: vec![("Read".to_string(), 1.5), ("Run".to_string(), 3.0)],
        };

        insta::assert_snapshot!(render_chart(&series), @r"
        Average Duration per Activity (Hours)
          Read     1.5  █████░░░░░
          Run        3  ██████████
        ");
    }

    #[test]
    fn test_render_empty_chart() {
        let series = ChartSeries {
            title: "Weekly Activity Duration".to_string(),
            unit: "Hours",
            points: vec![],
        };

        assert_eq!(render_chart(&series), "Weekly Activity Duration (Hours)\n  (no data)\n");
    }
}
