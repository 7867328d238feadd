//! Add command: validate one entry and append it to the data file.

use std::io::Write;

use anyhow::{Context, Result};
use ll_core::{RecordInput, parse};
use ll_store::Table;

/// Runs the add command.
///
/// Invalid input is rejected before anything is written.
pub fn run<W: Write>(writer: &mut W, table: &Table, input: &RecordInput) -> Result<()> {
    let record = parse(input).context("activity not saved")?;
    table.append(&record).context("failed to save activity")?;

    writeln!(
        writer,
        "Activity saved: {} {} ({}h, {})",
        record.date, record.activity, record.duration, record.mood
    )?;
    Ok(())
}
