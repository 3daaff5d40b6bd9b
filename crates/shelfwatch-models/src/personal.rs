use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reading and watching progress for one book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersonalEntry {
    #[serde(rename = "book", default)]
    pub read: bool,
    /// Adaptation year -> watched
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub movies: IndexMap<u32, bool>,
}

impl PersonalEntry {
    pub fn watched_years(&self) -> impl Iterator<Item = u32> + '_ {
        self.movies
            .iter()
            .filter(|(_, watched)| **watched)
            .map(|(year, _)| *year)
    }

    /// Mark an adaptation as watched. Returns true if the flag changed.
    pub fn mark_watched(&mut self, year: u32) -> bool {
        match self.movies.get_mut(&year) {
            Some(true) => false,
            Some(flag) => {
                *flag = true;
                true
            }
            None => {
                self.movies.insert(year, true);
                true
            }
        }
    }
}

/// The `read|watched` mapping of a personal file, in file order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct PersonalStore {
    entries: IndexMap<String, PersonalEntry>,
}

impl PersonalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slug: &str) -> Option<&PersonalEntry> {
        self.entries.get(slug)
    }

    pub fn get_mut(&mut self, slug: &str) -> Option<&mut PersonalEntry> {
        self.entries.get_mut(slug)
    }

    /// Existing entry for `slug`, or a new unread one appended at the end.
    pub fn entry_or_default(&mut self, slug: &str) -> &mut PersonalEntry {
        self.entries.entry(slug.to_string()).or_default()
    }

    pub fn insert(&mut self, slug: impl Into<String>, entry: PersonalEntry) -> Option<PersonalEntry> {
        self.entries.insert(slug.into(), entry)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PersonalEntry)> {
        self.entries.iter().map(|(slug, entry)| (slug.as_str(), entry))
    }

    pub fn has_movies(&self) -> bool {
        self.entries.values().any(|e| !e.movies.is_empty())
    }
}
