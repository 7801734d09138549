//! Insertion-ordered name -> utilization accumulator
//!
//! Ranking breaks ties by first appearance, so every per-row and global
//! mapping keeps its keys in the order they were first added.

use serde::ser::{Serialize, Serializer};
use std::collections::HashMap;

/// Reserved aggregate of all processes
pub const TOTAL_KEY: &str = "_Total";

/// Reserved idle pseudo-process
pub const IDLE_KEY: &str = "Idle";

/// True for names that never take part in ranking
pub fn is_reserved(name: &str) -> bool {
    name == TOTAL_KEY || name == IDLE_KEY
}

/// Ordered map from instance or group name to accumulated utilization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to `name`, inserting it at the end if not present yet
    pub fn add(&mut self, name: &str, value: f64) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1 += value,
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), value));
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.index.get(name).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries excluding `_Total` and `Idle`
    pub fn unreserved_len(&self) -> usize {
        self.entries.iter().filter(|(k, _)| !is_reserved(k)).count()
    }

    /// Fold every entry of `other` into this accumulator
    pub fn merge(&mut self, other: &Totals) {
        for (name, value) in other.iter() {
            self.add(name, value);
        }
    }
}

impl Serialize for Totals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for Totals {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut totals = Totals::new();
        for (name, value) in iter {
            totals.add(name, value);
        }
        totals
    }
}
