//! In-memory search result cache
//!
//! Maps a search phrase to the video URL it resolved to. Entries live for the
//! lifetime of the cache; there is no eviction or expiry.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Search phrase to video URL cache, shared across concurrent resolutions
///
/// Every read and write takes the same lock. A lookup followed by an insert is
/// not atomic as a whole, so two tasks may both miss and both query upstream;
/// the last insert wins.
#[derive(Debug, Default)]
pub struct SearchCache {
    entries: Mutex<HashMap<String, String>>,
}

impl SearchCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached video URL for a search phrase
    pub fn get(&self, phrase: &str) -> Option<String> {
        self.lock().get(phrase).cloned()
    }

    /// Stores the video URL for a search phrase
    pub fn insert(&self, phrase: String, video_url: String) {
        self.lock().insert(phrase, video_url);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock can't leave the map half-written
    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
