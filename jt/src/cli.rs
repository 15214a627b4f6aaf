//! CLI argument parsing for journaltemplate

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jt")]
#[command(author, version, about = "Daily journal helpers: word counts and stoic prompts", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count words the way iA Writer does
    Wordcount {
        /// File to count; reads stdin when omitted or "-"
        file: Option<PathBuf>,

        /// Also print the goal (count plus the configured goal)
        #[arg(short, long)]
        goal: bool,
    },

    /// Print today's stoic prompts and advance the cursor
    Stoic {
        /// Date to schedule for (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        date: Option<NaiveDate>,

        /// Show what would be saved without writing the progress file
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the saved stoic cursor
    Progress,
}
