//! JournalTemplate - daily journal helpers
//!
//! Two pieces sit under the `jt` command:
//!
//! - [`wordcount`] - word counts that agree with iA Writer, used for goals
//! - [`stoic`] - a year-long cycle of stoic prompts with catch-up when days are missed
//!
//! # Example
//!
//! ```ignore
//! use journaltemplate::stoic::{JsonProgressStore, PromptTable, StoicScheduler, format_prompts};
//!
//! let table = PromptTable::load("stoics.csv")?;
//! let scheduler = StoicScheduler::new(table, JsonProgressStore::new("stoic_progress.json"), 2);
//! let outcome = scheduler.run(chrono::Local::now().date_naive())?;
//! print!("{}", format_prompts(&outcome.entries));
//! ```

pub mod cli;
pub mod config;
pub mod stoic;
pub mod wordcount;

pub use config::Config;
pub use wordcount::{DEFAULT_WORDCOUNT_GOAL, goal_wordcount, normalize, wordcount};
