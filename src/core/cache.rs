use std::{
    collections::HashMap,
    fmt::Debug,
    hash::Hash,
    time::{
        Duration,
        Instant,
    },
};

use tracing::debug;

use super::FetchError;

pub const DEFAULT_STALE_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Success,
    Error,
}

/// Cached state of one key.
///
/// `data` always holds the last successful value, even while a revalidation is pending or
/// after it failed; `error` holds the most recent failure and is cleared by the next success.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    status: FetchStatus,
    data: Option<V>,
    error: Option<FetchError>,
    last_fetched_at: Option<Instant>,
    invalidated: bool,
    last_used: u64,
}

impl<V> CacheEntry<V> {
    fn pending(tick: u64) -> Self {
        Self {
            status: FetchStatus::Pending,
            data: None,
            error: None,
            last_fetched_at: None,
            invalidated: false,
            last_used: tick,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    pub fn data(&self) -> Option<&V> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// Time of the last successful fetch.
    pub fn last_fetched_at(&self) -> Option<Instant> {
        self.last_fetched_at
    }

    pub fn is_pending(&self) -> bool {
        self.status == FetchStatus::Pending
    }

    /// Only a successful, non-invalidated entry younger than `stale_after` is fresh.
    pub fn is_stale(&self, now: Instant, stale_after: Duration) -> bool {
        if self.status != FetchStatus::Success || self.invalidated {
            return true;
        }
        match self.last_fetched_at {
            Some(at) => now.saturating_duration_since(at) >= stale_after,
            None => true,
        }
    }
}

/// Maps query keys to cached results with stale-while-revalidate semantics.
///
/// A key is in flight exactly while its entry is `Pending`, which is what makes
/// [`QueryCache::begin_fetch`] de-duplicate concurrent requests. With a capacity set, the least
/// recently used settled entry is evicted on insert; pending entries are never evicted.
#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    stale_after: Duration,
    capacity: Option<usize>,
    clock: u64,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(stale_after: Duration, capacity: Option<usize>) -> Self {
        Self { entries: HashMap::new(), stale_after, capacity, clock: 0 }
    }

    pub fn stale_after(&self) -> Duration {
        self.stale_after
    }

    pub fn get(&self, key: &K) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.entries.values().filter(|e| e.is_pending()).count()
    }

    /// Decides whether `key` needs a network call and, if so, marks it pending.
    ///
    /// Returns `true` only when the caller must issue the fetch: the key is unknown, or its
    /// entry is stale and not already pending. Existing data is kept while revalidating.
    pub fn begin_fetch(&mut self, key: &K, now: Instant) -> bool {
        self.clock += 1;
        let tick = self.clock;
        let stale_after = self.stale_after;

        match self.entries.get_mut(key) {
            Some(entry) if entry.is_pending() => {
                entry.last_used = tick;
                debug!(?key, "fetch already in flight");
                false
            }
            Some(entry) if !entry.is_stale(now, stale_after) => {
                entry.last_used = tick;
                debug!(?key, "cache hit");
                false
            }
            Some(entry) => {
                entry.status = FetchStatus::Pending;
                entry.last_used = tick;
                debug!(?key, has_data = entry.data.is_some(), "revalidating");
                true
            }
            None => {
                debug!(?key, "cache miss");
                self.entries.insert(key.clone(), CacheEntry::pending(tick));
                self.evict_over_capacity(key);
                true
            }
        }
    }

    pub fn complete(&mut self, key: &K, result: Result<V, FetchError>, now: Instant) {
        self.clock += 1;
        let tick = self.clock;
        let entry = self.entries.entry(key.clone()).or_insert_with(|| CacheEntry::pending(tick));
        entry.last_used = tick;

        match result {
            Ok(value) => {
                entry.status = FetchStatus::Success;
                entry.data = Some(value);
                entry.error = None;
                entry.last_fetched_at = Some(now);
                entry.invalidated = false;
            }
            Err(error) => {
                debug!(?key, %error, kept_data = entry.data.is_some(), "fetch failed");
                entry.status = FetchStatus::Error;
                entry.error = Some(error);
            }
        }
    }

    /// Forces the next [`QueryCache::begin_fetch`] for `key` to revalidate.
    pub fn invalidate(&mut self, key: &K) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.invalidated = true;
        }
    }

    fn evict_over_capacity(&mut self, keep: &K) {
        let Some(capacity) = self.capacity else {
            return;
        };

        while self.entries.len() > capacity {
            let victim = self
                .entries
                .iter()
                .filter(|(k, e)| !e.is_pending() && *k != keep)
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone());

            match victim {
                Some(k) => {
                    debug!(key = ?k, "evicting cache entry");
                    self.entries.remove(&k);
                }
                None => break,
            }
        }
    }
}
