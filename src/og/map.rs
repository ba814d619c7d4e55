//! The resolver output: normalized property name → ordered contents.

use std::convert::Infallible;

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::property::{OG_DESCRIPTION, OG_IMAGE, OG_TITLE, OG_TYPE, OG_URL};

/// Keys emitted first, in this order, when the map is rendered.
const LEADING_KEYS: [&str; 5] = [OG_TITLE, OG_TYPE, OG_URL, OG_IMAGE, OG_DESCRIPTION];

/// OpenGraph properties of one page.
///
/// Invariant: every key maps to at least one value. An absent key means
/// "no tag at all", never an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: FxHashMap<String, Vec<String>>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `content` to the list of `key`, creating the list if needed.
    pub fn append(&mut self, key: impl Into<String>, content: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(content.into());
    }

    /// Fill `key` with the computed values unless it is already present.
    ///
    /// `compute` runs only for absent keys. An empty result leaves the key
    /// absent. Errors from `compute` are passed through.
    pub fn fill_with<E>(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> Result<Vec<String>, E>,
    ) -> Result<(), E> {
        if self.entries.contains_key(key) {
            return Ok(());
        }
        let values = compute()?;
        if !values.is_empty() {
            self.entries.insert(key.to_owned(), values);
        }
        Ok(())
    }

    /// Infallible form of [`fill_with`](Self::fill_with).
    pub fn fill_all(&mut self, key: &str, compute: impl FnOnce() -> Vec<String>) {
        let Ok(()) = self.fill_with::<Infallible>(key, || Ok(compute()));
    }

    /// Single-value form of [`fill_all`](Self::fill_all).
    pub fn fill(&mut self, key: &str, compute: impl FnOnce() -> String) {
        self.fill_all(key, || vec![compute()]);
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in rendering order: well-known keys first, the rest sorted.
    pub fn sorted(&self) -> Vec<(&str, &[String])> {
        let mut out: Vec<(&str, &[String])> = LEADING_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|values| (*key, values)))
            .collect();

        let mut rest: Vec<(&str, &[String])> = self
            .entries
            .iter()
            .filter(|(key, _)| !LEADING_KEYS.contains(&key.as_str()))
            .map(|(key, values)| (key.as_str(), values.as_slice()))
            .collect();
        rest.sort_unstable_by(|a, b| a.0.cmp(b.0));

        out.extend(rest);
        out
    }

    pub fn into_inner(self) -> FxHashMap<String, Vec<String>> {
        self.entries
    }
}

impl Serialize for MetadataMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let sorted = self.sorted();
        let mut map = serializer.serialize_map(Some(sorted.len()))?;
        for (key, values) in sorted {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}
