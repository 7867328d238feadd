//! Stable frequency counting.

use std::collections::HashMap;
use std::hash::Hash;

/// Counts occurrences while remembering the order keys were first seen.
///
/// Ties are always resolved in favour of the key seen first, so "most common"
/// answers do not depend on hash iteration order.
#[derive(Debug, Clone)]
pub struct Tally<K> {
    counts: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K> Default for Tally<K> {
    fn default() -> Self {
        Self {
            counts: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Tally<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: K) {
        if let Some(&i) = self.index.get(&key) {
            self.counts[i].1 += 1;
        } else {
            self.index.insert(key.clone(), self.counts.len());
            self.counts.push((key, 1));
        }
    }

    pub fn count(&self, key: &K) -> usize {
        self.index.get(key).map_or(0, |&i| self.counts[i].1)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// The key with the highest count; the earliest-seen key wins a tie.
    pub fn most_common(&self) -> Option<(&K, usize)> {
        let mut best: Option<(&K, usize)> = None;
        for (key, count) in &self.counts {
            if best.is_none_or(|(_, c)| *count > c) {
                best = Some((key, *count));
            }
        }
        best
    }

    /// Up to `n` keys by descending count, ties in first-seen order.
    pub fn top(&self, n: usize) -> Vec<(&K, usize)> {
        let mut ranked: Vec<(&K, usize)> = self.counts.iter().map(|(k, c)| (k, *c)).collect();
        // sort_by is stable, so equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Keys and counts in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.counts.iter().map(|(k, c)| (k, *c))
    }
}

impl<K: Eq + Hash + Clone> FromIterator<K> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key);
        }
        tally
    }
}

impl<K: Eq + Hash + Clone> Extend<K> for Tally<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.add(key);
        }
    }
}
