//! Tag and notes commands: per-tag breakdown, frequent note words, note search.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use ll_core::{LoggedEntry, TagBreakdown, search_notes, top_note_words};
use ll_store::Table;

use super::util::{NO_DATA, fmt_hours, load_entries, progress_bar};

/// Formats hours, top tags and mood distribution per tag.
pub fn format_tags(tags: &TagBreakdown, top: usize) -> String {
    let mut output = String::new();
    if tags.is_empty() {
        writeln!(output, "No tagged entries.").unwrap();
        return output;
    }

    let width = tags.tags().iter().map(|t| t.tag.chars().count()).max().unwrap_or(0);
    let max = tags.tags().iter().map(|t| t.hours).fold(0.0, f64::max);

    writeln!(output, "HOURS BY TAG").unwrap();
    writeln!(output, "────────────").unwrap();
    for t in tags.tags() {
        writeln!(
            output,
            "{:<width$}  {:>6}h  {}",
            t.tag,
            fmt_hours(t.hours),
            progress_bar(t.hours, max)
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "TOP TAGS").unwrap();
    writeln!(output, "────────").unwrap();
    for (i, r) in tags.top_tags(top).iter().enumerate() {
        writeln!(output, "{}. {} ({} entries)", i + 1, r.label, r.count).unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "MOODS BY TAG").unwrap();
    writeln!(output, "────────────").unwrap();
    for t in tags.tags() {
        let moods: Vec<String> = t.moods.iter().map(|m| format!("{} {}", m.label, m.count)).collect();
        writeln!(output, "{:<width$}  {}", t.tag, moods.join(", ")).unwrap();
    }
    output
}

fn format_entry(entry: &LoggedEntry) -> String {
    let hours = entry
        .hours
        .map_or_else(|| entry.raw_duration.clone(), |h| format!("{}h", fmt_hours(h)));
    format!(
        "[line {}] {} {} ({hours}, {}): {}",
        entry.line, entry.raw_date, entry.activity, entry.mood, entry.notes
    )
}

/// Runs the tags command.
pub fn run<W: Write>(writer: &mut W, table: &Table, top: usize, json: bool) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let tags = TagBreakdown::from_entries(&screening.kept);
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&tags)?)?;
    } else {
        write!(writer, "{}", format_tags(&tags, top))?;
    }
    Ok(())
}

/// Runs the words command.
pub fn run_words<W: Write>(writer: &mut W, table: &Table, top: usize) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let words = top_note_words(&screening.kept, top);
    if words.is_empty() {
        writeln!(writer, "No notes yet.")?;
        return Ok(());
    }
    writeln!(writer, "Most frequent words in notes:")?;
    for (i, w) in words.iter().enumerate() {
        writeln!(writer, "{}. {} ({})", i + 1, w.label, w.count)?;
    }
    Ok(())
}

/// Runs the search command.
pub fn run_search<W: Write>(writer: &mut W, table: &Table, query: &str) -> Result<()> {
    let Some(screening) = load_entries(table)? else {
        writeln!(writer, "{NO_DATA}")?;
        return Ok(());
    };

    let hits = search_notes(&screening.kept, query);
    if hits.is_empty() {
        writeln!(writer, "No notes matching '{query}'.")?;
        return Ok(());
    }
    writeln!(writer, "{} matching entries:", hits.len())?;
    for entry in hits {
        writeln!(writer, "{}", format_entry(entry))?;
    }
    Ok(())
}
