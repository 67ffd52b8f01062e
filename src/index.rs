//! Ordered key -> word index with nearest-match lookup.

use std::collections::BTreeMap;
use std::ops::Bound;

use ordered_float::OrderedFloat;

/// A totally ordered numeric key that can measure its distance to another key.
pub trait IndexKey: Ord + Copy + std::fmt::Debug {
    /// Distance type; only needs a partial order (float distances may be NaN).
    type Distance: PartialOrd;

    /// Absolute distance between `self` and `other`.
    fn distance(&self, other: &Self) -> Self::Distance;
}

impl IndexKey for u64 {
    type Distance = u64;

    fn distance(&self, other: &Self) -> u64 {
        self.abs_diff(*other)
    }
}

impl IndexKey for OrderedFloat<f64> {
    type Distance = f64;

    fn distance(&self, other: &Self) -> f64 {
        (self.0 - other.0).abs()
    }
}

/// Sorted map from key to the most recently stored word for that key.
///
/// Not a multimap: `put` on an existing key replaces the word.
#[derive(Debug, Clone)]
pub struct OrderedIndex<K: IndexKey> {
    entries: BTreeMap<K, String>,
}

impl<K: IndexKey> Default for OrderedIndex<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: IndexKey> OrderedIndex<K> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the word stored at `key`.
    pub fn put(&mut self, key: K, word: impl Into<String>) {
        self.entries.insert(key, word.into());
    }

    /// The word stored at exactly `key`.
    pub fn exact(&self, key: &K) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Smallest entry with a key `>= key`.
    pub fn ceiling(&self, key: &K) -> Option<(&K, &str)> {
        self.entries
            .range(key..)
            .next()
            .map(|(k, w)| (k, w.as_str()))
    }

    /// Largest entry with a key `< key`.
    pub fn lower(&self, key: &K) -> Option<(&K, &str)> {
        self.entries
            .range((Bound::Unbounded, Bound::Excluded(key)))
            .next_back()
            .map(|(k, w)| (k, w.as_str()))
    }

    /// The word whose key is closest to `key`.
    ///
    /// An exact hit wins outright. Otherwise the ceiling entry is returned only
    /// when it is strictly closer than the lower entry; equal distances go to
    /// the lower key.
    pub fn nearest(&self, key: &K) -> Option<&str> {
        let ceiling = self.ceiling(key);
        if let Some((found, word)) = ceiling
            && found == key
        {
            return Some(word);
        }

        match (ceiling, self.lower(key)) {
            (None, None) => None,
            (Some((_, word)), None) | (None, Some((_, word))) => Some(word),
            (Some((ceil_key, ceil_word)), Some((floor_key, floor_word))) => {
                if ceil_key.distance(key) < floor_key.distance(key) {
                    Some(ceil_word)
                } else {
                    Some(floor_word)
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
