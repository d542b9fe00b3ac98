//! Keyed query cache with stale-while-revalidate semantics.
//!
//! Results are cached per key, up to a fixed number of keys (least recently
//! used keys are evicted). When the key changes, whatever was shown for the
//! previous key stays visible until the new key's result arrives. Each
//! issued fetch carries a [`FetchTicket`]; a result is only displayed if its
//! ticket's key is still the current key and no newer fetch for that key
//! has been issued.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;

/// Number of keys whose results are kept.
pub const CACHE_CAPACITY: usize = 32;

/// Handle for one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    /// Key the fetch was issued for.
    pub key: K,
    generation: u64,
}

impl<K> FetchTicket<K> {
    /// Monotonic issue number (later tickets have larger numbers).
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of applying a fetch result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Stored and now displayed for the current key.
    Displayed,
    /// Stored under its own key, which is no longer current.
    Cached,
    /// Dropped because a newer fetch for the same key was issued or stored.
    Superseded,
}

#[derive(Debug)]
struct Entry<V> {
    generation: u64,
    value: V,
}

/// Per-key cache of fetch results.
#[derive(Debug)]
pub struct KeyedQuery<K: Hash + Eq, V> {
    /// Current key; `None` disables fetching.
    key: Option<K>,
    entries: LruCache<K, Entry<V>>,
    /// Key whose data is displayed. Lags `key` while a fetch is in flight.
    shown: Option<K>,
    /// Most recently issued fetch.
    in_flight: Option<FetchTicket<K>>,
    next_generation: u64,
}

impl<K: Clone + Eq + Hash, V> Default for KeyedQuery<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash, V> KeyedQuery<K, V> {
    /// Create an empty, disabled query holding [`CACHE_CAPACITY`] keys.
    pub fn new() -> Self {
        Self::with_capacity(CACHE_CAPACITY)
    }

    /// Create an empty, disabled query holding up to `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            key: None,
            entries: LruCache::new(capacity),
            shown: None,
            in_flight: None,
            next_generation: 1,
        }
    }

    /// The current key.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Whether a fetch is outstanding.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of keys with cached results.
    pub fn cached_len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the displayed data belongs to a previous key.
    pub fn is_placeholder(&self) -> bool {
        self.shown.is_some() && self.shown != self.key
    }

    /// Change the current key.
    ///
    /// Returns a ticket when a fetch should be issued. No fetch is issued for
    /// a `None` key or when the key did not change. Cached data for the new
    /// key is displayed at once and revalidated.
    pub fn set_key(&mut self, key: Option<K>) -> Option<FetchTicket<K>> {
        if self.key == key {
            return None;
        }
        self.key = key;
        let key = self.key.clone()?;

        if self.entries.get(&key).is_some() {
            self.shown = Some(key.clone());
        }
        Some(self.issue(key))
    }

    /// Issue a fresh fetch for the current key.
    pub fn refetch(&mut self) -> Option<FetchTicket<K>> {
        let key = self.key.clone()?;
        Some(self.issue(key))
    }

    fn issue(&mut self, key: K) -> FetchTicket<K> {
        let ticket = FetchTicket {
            key,
            generation: self.next_generation,
        };
        self.next_generation += 1;
        self.in_flight = Some(ticket.clone());
        ticket
    }

    fn settle(&mut self, ticket: &FetchTicket<K>) {
        if self.in_flight.as_ref() == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// Whether a newer fetch for the ticket's key was issued or stored.
    fn is_superseded(&self, ticket: &FetchTicket<K>) -> bool {
        let newer_in_flight = self
            .in_flight
            .as_ref()
            .is_some_and(|t| t.key == ticket.key && t.generation > ticket.generation);
        let newer_stored = self
            .entries
            .peek(&ticket.key)
            .is_some_and(|e| e.generation > ticket.generation);
        newer_in_flight || newer_stored
    }

    /// Store a successful result.
    pub fn resolve(&mut self, ticket: FetchTicket<K>, value: V) -> Applied {
        self.settle(&ticket);
        if self.is_superseded(&ticket) {
            return Applied::Superseded;
        }

        let is_current = self.key.as_ref() == Some(&ticket.key);
        if is_current {
            self.shown = Some(ticket.key.clone());
        }
        self.entries.put(
            ticket.key,
            Entry {
                generation: ticket.generation,
                value,
            },
        );
        // Keep the displayed entry ahead of late results for other keys
        if let Some(shown) = &self.shown {
            self.entries.promote(shown);
        }

        if is_current {
            Applied::Displayed
        } else {
            Applied::Cached
        }
    }

    /// Record a failed fetch. Previously displayed data is kept.
    pub fn fail(&mut self, ticket: &FetchTicket<K>) {
        self.settle(ticket);
    }

    /// Data to display: the current key's result, or the previous key's
    /// result while the current one is outstanding.
    pub fn data(&self) -> Option<&V> {
        self.shown
            .as_ref()
            .and_then(|key| self.entries.peek(key))
            .map(|entry| &entry.value)
    }

    /// Cached data for the current key only.
    pub fn current_data(&self) -> Option<&V> {
        self.key
            .as_ref()
            .and_then(|key| self.entries.peek(key))
            .map(|entry| &entry.value)
    }
}
