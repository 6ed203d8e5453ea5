use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::utils::validation::{lookup_key, normalize_whitespace};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Whitespace-normalized key, e.g. `Investigator_Name`
    key: String,
    /// Key exactly as first supplied, e.g. `Investigator Name`
    original: String,
    value: String,
}

/// An ordered, case-insensitive key/value section such as `[Header]` or `[Settings]`.
///
/// Keys are stored whitespace-normalized (`Investigator Name` becomes
/// `Investigator_Name`) and looked up ignoring ASCII case, while the original
/// spelling is kept so the section can be written back verbatim. Missing keys
/// read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    entries: Vec<Entry>,
    lookup: HashMap<String, usize>,
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous value if the key was present.
    ///
    /// Re-setting an existing key keeps its position and original spelling.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let original = key.into();
        let value = value.into();
        let lookup = lookup_key(&original);

        if let Some(&i) = self.lookup.get(&lookup) {
            return Some(std::mem::replace(&mut self.entries[i].value, value));
        }

        self.lookup.insert(lookup, self.entries.len());
        self.entries.push(Entry {
            key: normalize_whitespace(&original),
            original,
            value,
        });
        None
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lookup
            .get(&lookup_key(key))
            .map(|&i| self.entries[i].value.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup.contains_key(&lookup_key(key))
    }

    /// The key as originally written, for a key in any spelling.
    #[must_use]
    pub fn original_key(&self, key: &str) -> Option<&str> {
        self.lookup
            .get(&lookup_key(key))
            .map(|&i| self.entries[i].original.as_str())
    }

    /// Whitespace-normalized keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }

    /// `(normalized key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.value.as_str()))
    }

    /// `(original key, value)` pairs in insertion order, as they should be written.
    pub fn iter_original(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|e| (e.original.as_str(), e.value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Section {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut section = Section::new();
        for (key, value) in iter {
            section.insert(key, value);
        }
        section
    }
}

impl Serialize for Section {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter_original() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
