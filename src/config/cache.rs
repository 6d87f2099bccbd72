//! Per-kind caches of already converted accessor results.
//!
//! Entries live until [`ResultCache::clear`] is called. Writes to the store do
//! not invalidate anything: a config that is mutated after values were read
//! must be followed by `Config::clear_cache` to observe the new values.

use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;

/// Cache for one result kind, keyed by the key as passed to the accessor.
#[derive(Debug)]
pub(crate) struct KindCache<V> {
    entries: RwLock<HashMap<String, V>>,
}

impl<V> Default for KindCache<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> KindCache<V> {
    pub(crate) fn get(&self, key: &str) -> Option<V> {
        self.entries.read().get(key).cloned()
    }

    pub(crate) fn insert(&self, key: &str, value: V) {
        self.entries.write().insert(key.to_string(), value);
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub(crate) fn clear(&self) {
        self.entries.write().clear();
    }
}

#[derive(Debug, Default)]
pub(crate) struct ResultCache {
    pub(crate) strings: KindCache<String>,
    pub(crate) string_seqs: KindCache<Vec<String>>,
    pub(crate) string_maps: KindCache<BTreeMap<String, String>>,
    pub(crate) int_maps: KindCache<BTreeMap<String, isize>>,
}

impl ResultCache {
    pub(crate) fn len(&self) -> usize {
        self.strings.len() + self.string_seqs.len() + self.string_maps.len() + self.int_maps.len()
    }

    pub(crate) fn clear(&self) {
        self.strings.clear();
        self.string_seqs.clear();
        self.string_maps.clear();
        self.int_maps.clear();
    }
}
