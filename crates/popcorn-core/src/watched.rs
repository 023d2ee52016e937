//! The user's watched list and its summary statistics.

use std::sync::Arc;

use crate::error::PopcornError;
use crate::models::WatchedEntry;
use crate::persisted::Persisted;
use crate::storage::KeyValueStore;

/// Storage key of the watched list.
pub const WATCHED_KEY: &str = "watched";

/// Result of [`WatchedList::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// An entry with the same IMDb id is already in the list.
    AlreadyWatched,
}

/// Ordered list of watched movies, persisted under [`WATCHED_KEY`].
pub struct WatchedList {
    entries: Persisted<Vec<WatchedEntry>>,
}

impl WatchedList {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, PopcornError> {
        let entries = Persisted::load(store, WATCHED_KEY, Vec::new())?;
        tracing::debug!(count = entries.get().len(), "Loaded watched list");
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        self.entries.get()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries().iter().find(|e| e.imdb_id == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    /// The rating the user gave a movie they already watched.
    pub fn user_rating(&self, imdb_id: &str) -> Option<u8> {
        self.get(imdb_id).map(|e| e.user_rating)
    }

    /// Append an entry unless its id is already present.
    pub fn add(&mut self, entry: WatchedEntry) -> Result<AddOutcome, PopcornError> {
        if self.contains(&entry.imdb_id) {
            tracing::debug!(imdb_id = %entry.imdb_id, "Movie already in watched list");
            return Ok(AddOutcome::AlreadyWatched);
        }
        self.entries.update(|prev| {
            let mut next = prev.clone();
            next.push(entry);
            next
        })?;
        Ok(AddOutcome::Added)
    }

    /// Remove the entry with `imdb_id`. Unknown ids leave the list untouched.
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool, PopcornError> {
        self.entries.update(|prev| {
            prev.iter()
                .filter(|e| e.imdb_id != imdb_id)
                .cloned()
                .collect()
        })
    }

    pub fn summary(&self) -> WatchedSummary {
        WatchedSummary::from_entries(self.entries())
    }
}

/// Aggregate statistics over the watched list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedSummary {
    pub count: usize,
    pub avg_imdb_rating: f64,
    pub avg_user_rating: f64,
    /// Minutes.
    pub avg_runtime: f64,
}

impl WatchedSummary {
    /// Averages skip entries that have no value for the field.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        Self {
            count: entries.len(),
            avg_imdb_rating: average(entries.iter().filter_map(|e| e.imdb_rating)),
            avg_user_rating: average(entries.iter().map(|e| f64::from(e.user_rating))),
            avg_runtime: average(entries.iter().filter_map(|e| e.runtime.map(f64::from))),
        }
    }
}

/// Arithmetic mean; zero for an empty input.
pub fn average(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
