use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Insertion-ordered mapping from entry name to its ordered value sequence.
///
/// Keys iterate in first-insertion order; replacing a key's values keeps its
/// position. A key present in the map always holds at least one value —
/// setting an empty sequence removes the key.
///
/// The serialized form is a sequence of `(name, values)` pairs so that every
/// on-disk format preserves key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "Vec<(String, Vec<String>)>",
    into = "Vec<(String, Vec<String>)>"
)]
pub struct EntryMap {
    order: Vec<String>,
    buckets: HashMap<String, Vec<String>>,
}

impl EntryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.buckets.contains_key(name)
    }

    /// First value of the sequence, the one single-value reads observe.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.buckets
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// The full ordered value sequence.
    pub fn all(&self, name: &str) -> Option<&[String]> {
        self.buckets.get(name).map(Vec::as_slice)
    }

    /// Replaces the key's entire value sequence. An existing key keeps its
    /// iteration position; a new key goes to the end. An empty sequence
    /// removes the key.
    pub fn set_all(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        if values.is_empty() {
            self.remove(&name);
            return;
        }
        if self.buckets.insert(name.clone(), values).is_none() {
            self.order.push(name);
        }
    }

    /// Removes the key and its whole sequence.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let removed = self.buckets.remove(name);
        if removed.is_some() {
            self.order.retain(|key| key != name);
        }
        removed
    }

    /// Mutable access for in-place multivar scans. Callers that empty the
    /// bucket must remove the key afterwards.
    pub(crate) fn bucket_mut(&mut self, name: &str) -> Option<&mut Vec<String>> {
        self.buckets.get_mut(name)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order.iter().filter_map(|name| {
            self.buckets
                .get(name)
                .map(|values| (name.as_str(), values.as_slice()))
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl From<Vec<(String, Vec<String>)>> for EntryMap {
    fn from(pairs: Vec<(String, Vec<String>)>) -> Self {
        let mut map = Self::new();
        for (name, values) in pairs {
            map.set_all(name, values);
        }
        map
    }
}

impl From<EntryMap> for Vec<(String, Vec<String>)> {
    fn from(mut map: EntryMap) -> Self {
        let order = std::mem::take(&mut map.order);
        order
            .into_iter()
            .filter_map(|name| {
                let values = map.buckets.remove(&name)?;
                Some((name, values))
            })
            .collect()
    }
}
