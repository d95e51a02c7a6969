//! Byte-budgeted LRU core.
//!
//! Entries live in a `Vec` and are chained into a doubly-linked recency list by
//! index (head = most recently used, tail = least recently used). A `HashMap`
//! maps each key to its slot, so lookup, promotion and eviction are all O(1).
//! Removing an entry `swap_remove`s its slot and re-links the entry that was
//! moved into the hole.
//!
//! This type is not synchronised and never calls back into user code: `add`
//! and `remove_oldest` return what they evicted. See [`super::shared::Cache`]
//! for the locked wrapper that owns the eviction callback.

use std::collections::HashMap;

/// Anything that can be stored in the cache must report its memory cost.
pub trait Value {
    /// Size in bytes charged against the cache budget.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Value for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl Value for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

struct Entry<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

impl<V: Value> Entry<V> {
    fn cost(&self) -> usize {
        self.key.len() + self.value.len()
    }
}

pub struct LruCache<V> {
    max_bytes: usize,
    used_bytes: usize,
    entries: Vec<Entry<V>>,
    index: HashMap<String, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V: Value> LruCache<V> {
    /// Creates an empty cache. `max_bytes == 0` means unbounded.
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            entries: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    /// Looks up `key` and promotes it to most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.entries[idx].value)
    }

    /// Looks up `key` without touching the recency order.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.entries[idx].value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Inserts or replaces `key`, then evicts from the LRU end until the
    /// cache is back within budget.
    ///
    /// A value bigger than the whole budget is still inserted and then
    /// evicted by the same call. The replaced value of an existing key is
    /// dropped and is not reported as an eviction.
    pub fn add(&mut self, key: impl Into<String>, value: V) -> Vec<(String, V)> {
        self.put(key, value);

        let mut evicted = Vec::new();
        while let Some(entry) = self.pop_over_budget() {
            evicted.push(entry);
        }
        evicted
    }

    /// Inserts or replaces `key` as most recently used, without evicting.
    /// The cache may be over budget afterwards.
    pub fn put(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();

        if let Some(&idx) = self.index.get(&key) {
            self.move_to_front(idx);
            let new_len = value.len();
            let old = std::mem::replace(&mut self.entries[idx].value, value);
            self.used_bytes = self.used_bytes - old.len() + new_len;
        } else {
            let idx = self.entries.len();
            let entry = Entry {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            };
            self.used_bytes += entry.cost();
            self.entries.push(entry);
            self.index.insert(key, idx);
            self.push_front(idx);
        }
    }

    /// Evicts the least recently used entry only while the cache is over
    /// budget.
    pub fn pop_over_budget(&mut self) -> Option<(String, V)> {
        if self.max_bytes != 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest()
        } else {
            None
        }
    }

    /// Removes and returns the least recently used entry, if any.
    pub fn remove_oldest(&mut self) -> Option<(String, V)> {
        let idx = self.tail?;
        Some(self.take(idx))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = *self.index.get(key)?;
        Some(self.take(idx).1)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of `key.len() + value.len()` over all entries.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
        self.used_bytes = 0;
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            let entry = &self.entries[idx];
            cursor = entry.next;
            Some(entry.key.as_str())
        })
    }

    fn take(&mut self, idx: usize) -> (String, V) {
        self.detach(idx);

        let last = self.entries.len() - 1;
        let entry = self.entries.swap_remove(idx);
        if idx != last {
            self.relink_moved(idx);
        }

        self.index.remove(&entry.key);
        self.used_bytes -= entry.cost();
        (entry.key, entry.value)
    }

    // The entry now at `idx` used to live at the end of the vector.
    fn relink_moved(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        match prev {
            Some(p) => self.entries[p].next = Some(idx),
            None => self.head = Some(idx),
        }
        match next {
            Some(n) => self.entries[n].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        if let Some(slot) = self.index.get_mut(&self.entries[idx].key) {
            *slot = idx;
        }
    }

    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.entries[idx].prev, self.entries[idx].next);
        match prev {
            Some(p) => self.entries[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entries[n].prev = prev,
            None => self.tail = prev,
        }
        self.entries[idx].prev = None;
        self.entries[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.entries[idx].prev = None;
        self.entries[idx].next = self.head;
        match self.head {
            Some(h) => self.entries[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.detach(idx);
        self.push_front(idx);
    }
}
