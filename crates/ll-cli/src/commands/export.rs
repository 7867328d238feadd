//! Export command: write the cleaned table, aggregate tables and text report.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use ll_core::ExportBundle;
use ll_store::{Table, write_export};

use super::util::{NO_DATA, load_entries};

/// Runs the export command, writing artifacts into `out_dir`.
///
/// The data file itself is only read.
pub fn run<W: Write>(writer: &mut W, table: &Table, out_dir: &Path) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let bundle = ExportBundle::build(&screening.kept);
    let paths = write_export(out_dir, &bundle)
        .with_context(|| format!("failed to export to {}", out_dir.display()))?;

    writeln!(writer, "Exported {} cleaned rows", bundle.cleaned.len())?;
    for path in [&paths.cleaned, &paths.averages, &paths.weekdays, &paths.report] {
        writeln!(writer, "  {}", path.display())?;
    }
    writeln!(writer)?;
    write!(writer, "{}", bundle.report)?;
    Ok(())
}
