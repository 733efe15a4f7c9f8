//! Cache Store Module
//!
//! In-process cache engine: HashMap storage with TTL expiry, capacity-bounded
//! LRU eviction and glob pattern deletion.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Main cache storage with LRU eviction and TTL support.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Monotonic access counter used for LRU ordering
    tick: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_entries,
            tick: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// Overwriting resets the TTL. When the store is full, expired entries are
    /// swept first and then the least recently used entry is evicted.
    pub fn set(&mut self, key: &str, value: Vec<u8>, ttl: Duration) -> CacheResult<()> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::Rejected(format!(
                "key length must be between 1 and {} bytes",
                MAX_KEY_LENGTH
            )));
        }

        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::Rejected(format!(
                "value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        if self.max_entries == 0 {
            return Err(CacheError::Rejected("cache capacity is zero".to_string()));
        }

        let is_overwrite = self.entries.contains_key(key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            self.cleanup_expired();
            if self.entries.len() >= self.max_entries {
                self.evict_least_recent();
            }
        }

        let tick = self.next_tick();
        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl, tick));
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.record_eviction();
        }
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// Expired entries are removed on access and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<Vec<u8>> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.stats.record_expirations(1);
            self.stats.record_miss();
            self.stats.set_total_entries(self.entries.len());
            return None;
        }

        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        entry.last_access = tick;
        self.stats.record_hit();
        Some(entry.value.clone())
    }

    // == Delete ==
    /// Removes `key`; returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        existed
    }

    // == Delete Matching ==
    /// Removes every key matching the glob `pattern`; returns the count removed.
    pub fn delete_matching(&mut self, pattern: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !glob_matches(pattern, key));
        let removed = before - self.entries.len();

        self.stats.record_invalidations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Inspection ==
    /// True if `key` holds a live entry. Does not touch LRU order or stats.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Live keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let now = current_timestamp_ms();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        keys
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries; returns the number removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Glob Matching ==
/// Redis-style glob match supporting `*`, `?` and `\` escapes.
pub fn glob_matches(pattern: &str, key: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let k: Vec<char> = key.chars().collect();
    let (mut pi, mut ki) = (0usize, 0usize);
    // Position of the last `*` in the pattern and the key index it resumed from
    let mut backtrack: Option<(usize, usize)> = None;

    while ki < k.len() {
        match p.get(pi) {
            Some('*') => {
                backtrack = Some((pi, ki));
                pi += 1;
                continue;
            }
            Some('?') => {
                pi += 1;
                ki += 1;
                continue;
            }
            Some('\\') if p.get(pi + 1) == Some(&k[ki]) => {
                pi += 2;
                ki += 1;
                continue;
            }
            Some(c) if *c != '\\' && *c == k[ki] => {
                pi += 1;
                ki += 1;
                continue;
            }
            _ => {}
        }

        match backtrack {
            Some((star_pi, star_ki)) => {
                pi = star_pi + 1;
                ki = star_ki + 1;
                backtrack = Some((star_pi, star_ki + 1));
            }
            None => return false,
        }
    }

    while p.get(pi) == Some(&'*') {
        pi += 1;
    }
    pi == p.len()
}
