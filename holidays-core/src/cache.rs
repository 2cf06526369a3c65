//! Persistent cache of computed holiday dates.
//!
//! Entries map a rule-instance key (`easter_2025`, `nth_2025_1_0_3`, ...) to an
//! ISO `YYYY-MM-DD` date. A key fully determines its date, so entries are never
//! invalidated. The cache is read once at the start of a run, mutated in memory
//! by the evaluators, and written once at the end.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{HolidayError, HolidayResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct DateCache {
    entries: BTreeMap<String, String>,
    dirty: bool,
}

impl DateCache {
    /// Load the cache from `path`. A missing file is an empty cache.
    ///
    /// Unreadable or corrupt files return `CacheUnreadable`; callers are
    /// expected to log it and continue with `DateCache::default()`.
    pub fn load(path: &Path) -> HolidayResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let unreadable = |reason: String| HolidayError::CacheUnreadable {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))?;

        Ok(DateCache {
            entries,
            dirty: false,
        })
    }

    /// Load the cache, falling back to an empty one on any failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!("{e}. Starting with empty cache.");
                Self::default()
            }
        }
    }

    /// Look up a cached date. Entries that don't parse are treated as misses.
    pub fn get(&self, key: &str) -> Option<NaiveDate> {
        let raw = self.entries.get(key)?;
        match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                tracing::debug!("Ignoring unparseable cache entry {key}={raw}");
                None
            }
        }
    }

    pub fn insert(&mut self, key: String, date: NaiveDate) {
        let value = date.format(DATE_FORMAT).to_string();
        if self.entries.get(&key) != Some(&value) {
            self.entries.insert(key, value);
            self.dirty = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry was added or changed since the cache was loaded.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the cache to `path` as pretty JSON in sorted key order.
    pub fn save(&self, path: &Path) -> HolidayResult<()> {
        let unwritable = |source: std::io::Error| HolidayError::CacheUnwritable {
            path: path.to_path_buf(),
            source,
        };

        let content = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| unwritable(std::io::Error::other(e)))?;

        crate::fs::write_atomic(path, &content).map_err(unwritable)
    }
}
