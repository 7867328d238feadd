//! Init command for creating the data file.

use std::io::Write;

use anyhow::{Context, Result};
use ll_store::Table;

/// Runs the init command.
pub fn run<W: Write>(writer: &mut W, table: &Table) -> Result<()> {
    let created = table.init().context("failed to initialize data file")?;

    if created {
        writeln!(writer, "Created {}", table.path().display())?;
    } else {
        writeln!(writer, "Data file: {}", table.path().display())?;
    }

    Ok(())
}
