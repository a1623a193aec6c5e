use crate::url::media_key;
use std::collections::HashSet;
use url::Url;

/// Insertion-ordered set of media URLs keyed by their media key
///
/// The stored value is the key itself, so two references that differ only in
/// query, fragment, credentials or host casing are stored once, at the
/// position where the first was seen.
#[derive(Debug, Clone, Default)]
pub struct MediaSet {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl MediaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `raw` (resolved against `base`); returns true if it was new
    pub fn insert(&mut self, raw: &str, base: &Url) -> bool {
        match media_key(raw, base) {
            Ok(key) => self.insert_key(key),
            Err(e) => {
                tracing::trace!("Skipping media reference {:?}: {}", raw, e);
                false
            }
        }
    }

    fn insert_key(&mut self, key: String) -> bool {
        if self.seen.contains(&key) {
            return false;
        }
        self.seen.insert(key.clone());
        self.ordered.push(key);
        true
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
