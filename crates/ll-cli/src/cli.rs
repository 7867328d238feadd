//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::commands::util::parse_date_arg;

/// Personal activity log.
///
/// Records what you did, for how long and how it felt, then summarizes it by
/// week, date range or tag.
#[derive(Debug, Parser)]
#[command(name = "lifelog", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the data file with its header if it does not exist.
    Init,

    /// Log a new activity.
    Add {
        /// Date of the activity (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        /// What you did.
        #[arg(long)]
        activity: String,

        /// Duration in hours.
        #[arg(long, allow_hyphen_values = true)]
        duration: String,

        /// How it felt.
        #[arg(long, default_value = "")]
        mood: String,

        /// Comma-separated tags (e.g. health,workout).
        #[arg(long, default_value = "")]
        tags: String,

        /// Free-form notes.
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        notes: String,
    },

    /// Show every stored row, including malformed ones.
    Logs,

    /// Total hours and most common activity and mood.
    Summary {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Hours per weekday for the current week.
    Week {
        /// Report the week containing this date instead of today (YYYY-MM-DD).
        #[arg(long, value_parser = parse_date_arg)]
        date: Option<NaiveDate>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Summary for an inclusive date range.
    Range {
        /// First day (YYYY-MM-DD).
        start: String,

        /// Last day (YYYY-MM-DD).
        end: String,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Hours, counts and moods per tag.
    Tags {
        /// Number of most frequent tags to list.
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Most frequent words in notes.
    Words {
        /// Number of words to list.
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Find entries whose notes contain a phrase (case-insensitive).
    Search {
        /// Text to look for.
        query: String,
    },

    /// Data overview, aggregate tables and charts.
    Analyze,

    /// Write the cleaned table, aggregate tables and text report.
    Export {
        /// Output directory (defaults to the configured export directory).
        #[arg(long)]
        out: Option<PathBuf>,
    },
}
