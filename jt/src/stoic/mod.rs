//! Daily stoic prompts
//!
//! - [`table`] - prompt rows keyed by day of year
//! - [`progress`] - the persisted cursor and its stores
//! - [`scheduler`] - how many prompts to show and where the cursor goes next

pub mod error;
pub mod progress;
pub mod scheduler;
pub mod table;

pub use error::StoicError;
pub use progress::{JsonProgressStore, MemoryProgressStore, Progress, ProgressLock, ProgressStore};
pub use scheduler::{
    Advance, DEFAULT_CATCHUP_RATE, Persisted, ScheduleOutcome, StoicScheduler, advance, entries_to_load,
    format_prompts, wrap_day,
};
pub use table::{DAYS_IN_CYCLE, MonthDay, PromptEntry, PromptTable};
