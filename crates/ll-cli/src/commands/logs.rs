//! Logs command: raw listing of the data file in stored order.

use std::io::Write;

use anyhow::Result;
use ll_core::HEADER;
use ll_store::Table;

use super::util::{NO_DATA, load_rows};

/// Runs the logs command.
///
/// Every row is shown, including rows too short to be summarized.
pub fn run<W: Write>(writer: &mut W, table: &Table) -> Result<()> {
    let Some(rows) = load_rows(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    writeln!(writer, "Your LifeLog Entries:")?;
    writeln!(writer, "{}", HEADER.join(" | "))?;
    for row in &rows {
        writeln!(writer, "{}", row.fields.join(" | "))?;
    }
    if rows.is_empty() {
        writeln!(writer, "(no entries)")?;
    }

    Ok(())
}
