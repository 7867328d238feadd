//! Analyze command: data overview, aggregate tables and text charts.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use ll_core::{DurationStats, ExportBundle, Screening};
use ll_store::Table;

use super::util::{NO_DATA, fmt_hours, load_entries, render_chart};

/// Formats the analysis for screened rows.
pub fn format_analysis(screening: &Screening) -> String {
    let mut output = String::new();
    let undated = screening.kept.iter().filter(|e| e.date.is_none()).count();
    let non_numeric = screening.kept.iter().filter(|e| e.hours.is_none()).count();

    writeln!(output, "DATA OVERVIEW").unwrap();
    writeln!(output, "─────────────").unwrap();
    writeln!(
        output,
        "Rows:        {}",
        screening.kept.len() + screening.skipped.len()
    )
    .unwrap();
    writeln!(output, "Usable:      {}", screening.kept.len()).unwrap();
    writeln!(output, "Skipped:     {}", screening.skipped.len()).unwrap();
    writeln!(output, "Undated:     {undated}").unwrap();
    writeln!(output, "No duration: {non_numeric}").unwrap();
    if let Some(stats) = DurationStats::from_entries(&screening.kept) {
        writeln!(
            output,
            "Duration:    min {}h, mean {}h, max {}h",
            fmt_hours(stats.min),
            fmt_hours(stats.mean),
            fmt_hours(stats.max)
        )
        .unwrap();
    }

    let bundle = ExportBundle::build(&screening.kept);
    writeln!(output).unwrap();
    write!(output, "{}", bundle.report).unwrap();

    for chart in bundle.charts() {
        writeln!(output).unwrap();
        write!(output, "{}", render_chart(&chart)).unwrap();
    }
    output
}

/// Runs the analyze command.
pub fn run<W: Write>(writer: &mut W, table: &Table) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };
    if screening.is_empty() {
        writeln!(writer, "No records to analyze.")?;
        return Ok(());
    }

    write!(writer, "{}", format_analysis(&screening))?;
    Ok(())
}
