//! Spaced advancement through the prompt cycle
//!
//! The cursor moves one prompt per day. When it falls behind the calendar it
//! catches up `catchup_rate` prompts per run, and when it is only slightly
//! ahead it shows just enough prompts to land on today. At most one advance is
//! persisted per calendar day.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info, warn};

use super::error::StoicError;
use super::progress::{Progress, ProgressStore};
use super::table::{DAYS_IN_CYCLE, PromptEntry, PromptTable};

/// Default number of prompts shown per run while catching up
pub const DEFAULT_CATCHUP_RATE: u32 = 2;

/// Map a raw cursor onto 1..=366, keeping its offset in the cycle
pub fn wrap_day(day: u32) -> u32 {
    (day.saturating_sub(1) % DAYS_IN_CYCLE) + 1
}

/// How many prompts to show for a cursor on `today_ordinal`
///
/// The comparison uses the wrapped cursor. The rate is held to 1..=366 since a
/// run never needs more than one full cycle.
pub fn entries_to_load(cursor_day: u32, today_ordinal: u32, catchup_rate: u32) -> u32 {
    let catchup_rate = catchup_rate.clamp(1, DAYS_IN_CYCLE);
    let day = wrap_day(cursor_day);
    if today_ordinal < day && day < today_ordinal.saturating_add(catchup_rate) {
        day - today_ordinal
    } else if today_ordinal == day {
        1
    } else {
        catchup_rate
    }
}

/// Result of advancing the cursor once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advance {
    /// Prompts to show, in cycle order
    pub entries: Vec<PromptEntry>,
    /// Cursor after this run
    pub progress: Progress,
    /// Whether `progress` should be written back
    pub persist: bool,
}

/// Compute the prompts for `today` without touching storage
pub fn advance(progress: &Progress, today: NaiveDate, table: &PromptTable, catchup_rate: u32) -> Advance {
    let same_day = progress.updated_on == today;
    // A repeat run on the same day replays from where the day started
    let start = if same_day {
        progress.started_from.unwrap_or(progress.day)
    } else {
        progress.day
    };

    let n = entries_to_load(start, today.ordinal(), catchup_rate);
    let first = wrap_day(start);
    debug!(start, first, today = today.ordinal(), n, same_day, "advance: computed window");

    let entries = (0..n)
        .map(|x| {
            let day = wrap_day(first + x);
            table
                .get(day)
                .cloned()
                .unwrap_or_else(|| PromptEntry::placeholder(day, today))
        })
        .collect();

    // Near u32::MAX the raw counter restarts from its position in the cycle
    let day = start.checked_add(n).unwrap_or_else(|| first + n);

    Advance {
        entries,
        progress: Progress {
            day,
            updated_on: today,
            started_from: Some(start),
        },
        persist: !same_day,
    }
}

/// What happened to the cursor after a run
#[derive(Debug)]
pub enum Persisted {
    /// New cursor written
    Written,
    /// Already advanced today; nothing written
    Skipped,
    /// The write failed; the prompts are still valid but may repeat next run
    Failed(StoicError),
}

impl Persisted {
    pub fn is_failed(&self) -> bool {
        matches!(self, Persisted::Failed(_))
    }
}

/// Prompts for one run plus the fate of the cursor
#[derive(Debug)]
pub struct ScheduleOutcome {
    pub entries: Vec<PromptEntry>,
    pub progress: Progress,
    pub persisted: Persisted,
}

/// Prompt table, cursor storage and catch-up rate bundled together
pub struct StoicScheduler<S: ProgressStore> {
    table: PromptTable,
    store: S,
    catchup_rate: u32,
}

impl<S: ProgressStore> StoicScheduler<S> {
    pub fn new(table: PromptTable, store: S, catchup_rate: u32) -> Self {
        debug!(entries = table.len(), catchup_rate, "StoicScheduler::new: called");
        Self {
            table,
            store,
            catchup_rate: catchup_rate.clamp(1, DAYS_IN_CYCLE),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Lock, load, advance and save (when the day changed) as one unit
    pub fn run(&self, today: NaiveDate) -> Result<ScheduleOutcome, StoicError> {
        debug!(%today, "StoicScheduler::run: called");
        let _lock = self.store.lock()?;

        let progress = self.store.load();
        let advance = advance(&progress, today, &self.table, self.catchup_rate);

        let persisted = if !advance.persist {
            debug!("StoicScheduler::run: already advanced today, not saving");
            Persisted::Skipped
        } else {
            match self.store.save(&advance.progress) {
                Ok(()) => {
                    info!(
                        from = progress.day,
                        to = advance.progress.day,
                        shown = advance.entries.len(),
                        "Advanced stoic progress"
                    );
                    Persisted::Written
                }
                Err(e) => {
                    warn!(error = %e, "Failed to save stoic progress; prompts may repeat next run");
                    Persisted::Failed(e)
                }
            }
        };

        Ok(ScheduleOutcome {
            entries: advance.entries,
            progress: advance.progress,
            persisted,
        })
    }
}

/// Render prompts as the block inserted into a journal entry
pub fn format_prompts(entries: &[PromptEntry]) -> String {
    let mut out = String::from("\n");
    for entry in entries {
        out.push_str(&format!("- Daily Stoic Prompt, {}:\n{}\n", entry.date, entry.text));
        out.push_str("\t- Morning:\n\t\t- \n\t- Evening:\n\t\t- \n");
    }
    out
}
