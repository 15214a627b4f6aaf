//! Prompt table: one stoic question per day of the year
//!
//! Rows come from a CSV with `Day`, `Date` and `Question` columns. Each row is
//! validated into a [`PromptEntry`] and indexed by day once at load time.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::StoicError;

/// Number of slots in the prompt cycle (leap years included)
pub const DAYS_IN_CYCLE: u32 = 366;

/// Month and day shown next to a prompt, e.g. `1/05`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Build from numbers, rejecting impossible dates (Feb 29 is allowed)
    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 was a leap year, so every calendar day has a date in it
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| Self { month, day })
    }
}

impl From<NaiveDate> for MonthDay {
    fn from(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

impl FromStr for MonthDay {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| format!("date '{}' is not in M/D form", s))?;
        let month: u32 = month.parse().map_err(|_| format!("bad month in date '{}'", s))?;
        let day: u32 = day.parse().map_err(|_| format!("bad day in date '{}'", s))?;
        Self::new(month, day).ok_or_else(|| format!("date '{}' does not exist", s))
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.month, self.day)
    }
}

/// A single prompt for one day of the year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEntry {
    /// Day of year, 1..=366
    pub day: u32,
    /// Display date
    pub date: MonthDay,
    /// Prompt text
    pub text: String,
}

impl PromptEntry {
    /// Stand-in for a day the table has no row for
    pub fn placeholder(day: u32, today: NaiveDate) -> Self {
        Self {
            day,
            date: MonthDay::from(today),
            text: format!("No entry for day {}.", day),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PromptRow {
    #[serde(rename = "Day")]
    day: i64,
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Question", alias = "Text", alias = "text")]
    text: String,
}

fn parse_row(record: &csv::StringRecord, headers: &csv::StringRecord, line: u64) -> Result<PromptEntry, StoicError> {
    let row: PromptRow = record.deserialize(Some(headers)).map_err(|e| StoicError::InvalidRow {
        line,
        reason: e.to_string(),
    })?;

    let day = u32::try_from(row.day)
        .ok()
        .filter(|d| (1..=DAYS_IN_CYCLE).contains(d))
        .ok_or_else(|| StoicError::InvalidRow {
            line,
            reason: format!("day {} is outside 1..={}", row.day, DAYS_IN_CYCLE),
        })?;
    let date = row
        .date
        .parse::<MonthDay>()
        .map_err(|reason| StoicError::InvalidRow { line, reason })?;

    Ok(PromptEntry {
        day,
        date,
        text: row.text,
    })
}

/// Prompts indexed by day of year
#[derive(Debug, Clone, Default)]
pub struct PromptTable {
    entries: BTreeMap<u32, PromptEntry>,
}

impl PromptTable {
    /// Build a table from already typed entries
    pub fn from_entries(entries: impl IntoIterator<Item = PromptEntry>) -> Result<Self, StoicError> {
        let mut table = Self::default();
        for (idx, entry) in entries.into_iter().enumerate() {
            table.insert(entry, idx as u64 + 1)?;
        }
        Ok(table)
    }

    /// Load the table from a CSV file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoicError> {
        let path = path.as_ref();
        debug!(?path, "PromptTable::load: called");
        let file = File::open(path).map_err(|e| StoicError::io(path, e))?;
        let table = Self::from_csv_reader(file)?;
        info!(path = %path.display(), entries = table.len(), "Loaded prompt table");
        Ok(table)
    }

    /// Parse CSV rows; columns other than `Day`, `Date` and `Question` are ignored
    ///
    /// A row that fails validation is skipped with a warning so the rest of the
    /// table stays usable; its day falls back to the placeholder prompt.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, StoicError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let mut table = Self::default();

        for result in rdr.records() {
            let record = result?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            let inserted = parse_row(&record, &headers, line).and_then(|entry| table.insert(entry, line));
            if let Err(e) = inserted {
                warn!(error = %e, "Skipping prompt row");
            }
        }

        Ok(table)
    }

    fn insert(&mut self, entry: PromptEntry, line: u64) -> Result<(), StoicError> {
        if !(1..=DAYS_IN_CYCLE).contains(&entry.day) {
            return Err(StoicError::InvalidRow {
                line,
                reason: format!("day {} is outside 1..={}", entry.day, DAYS_IN_CYCLE),
            });
        }
        if self.entries.contains_key(&entry.day) {
            return Err(StoicError::InvalidRow {
                line,
                reason: format!("day {} appears more than once", entry.day),
            });
        }
        self.entries.insert(entry.day, entry);
        Ok(())
    }

    /// Look up the prompt for a day of year
    pub fn get(&self, day: u32) -> Option<&PromptEntry> {
        self.entries.get(&day)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
