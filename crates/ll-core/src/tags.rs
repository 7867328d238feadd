//! Tag and notes breakdowns.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::record::LoggedEntry;
use crate::summary::Ranked;
use crate::tally::Tally;

/// Words too common to say anything about a note.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "i", "in", "is", "it", "me", "my",
    "of", "on", "or", "so", "that", "the", "this", "to", "was", "with",
];

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"));

/// Aggregates for a single tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagStats {
    pub tag: String,
    /// Entries carrying the tag.
    pub entries: usize,
    /// Full duration of every entry carrying the tag; durations are not split
    /// between an entry's tags.
    pub hours: f64,
    /// Mood counts, most frequent first.
    pub moods: Vec<Ranked>,
}

/// Per-tag hours, occurrence counts and mood distributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TagBreakdown {
    /// In first-seen order.
    tags: Vec<TagStats>,
}

impl TagBreakdown {
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LoggedEntry>,
    {
        let mut order: Vec<String> = Vec::new();
        let mut acc: HashMap<String, (usize, f64, Tally<String>)> = HashMap::new();

        for entry in entries {
            for tag in &entry.tags {
                let slot = acc.entry(tag.clone()).or_insert_with(|| {
                    order.push(tag.clone());
                    (0, 0.0, Tally::new())
                });
                slot.0 += 1;
                slot.1 += entry.hours.unwrap_or(0.0);
                slot.2.add(entry.mood.clone());
            }
        }

        let tags = order
            .into_iter()
            .filter_map(|tag| {
                let (entries, hours, moods) = acc.remove(&tag)?;
                Some(TagStats {
                    moods: Ranked::top(&moods, moods.len()),
                    tag,
                    entries,
                    hours,
                })
            })
            .collect();

        Self { tags }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// All tags in first-seen order.
    pub fn tags(&self) -> &[TagStats] {
        &self.tags
    }

    pub fn get(&self, tag: &str) -> Option<&TagStats> {
        self.tags.iter().find(|t| t.tag == tag)
    }

    /// Total hours for a tag, zero when the tag never appears.
    pub fn hours(&self, tag: &str) -> f64 {
        self.get(tag).map_or(0.0, |t| t.hours)
    }

    /// Up to `n` tags by number of entries carrying them.
    pub fn top_tags(&self, n: usize) -> Vec<Ranked> {
        let tally: Tally<String> = self
            .tags
            .iter()
            .flat_map(|t| std::iter::repeat_n(t.tag.clone(), t.entries))
            .collect();
        Ranked::top(&tally, n)
    }
}

/// Up to `n` most frequent words across all notes, lower-cased, stop words
/// removed.
pub fn top_note_words<'a, I>(entries: I, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let mut tally = Tally::new();
    for entry in entries {
        let lowered = entry.notes.to_lowercase();
        tally.extend(
            WORD_RE
                .find_iter(&lowered)
                .map(|m| m.as_str())
                .filter(|w| !STOP_WORDS.contains(w))
                .map(str::to_string),
        );
    }
    Ranked::top(&tally, n)
}

/// Entries whose notes contain `query`, ignoring case. A blank query matches
/// nothing.
pub fn search_notes<'a, I>(entries: I, query: &str) -> Vec<&'a LoggedEntry>
where
    I: IntoIterator<Item = &'a LoggedEntry>,
{
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    entries
        .into_iter()
        .filter(|e| e.notes.to_lowercase().contains(&needle))
        .collect()
}
