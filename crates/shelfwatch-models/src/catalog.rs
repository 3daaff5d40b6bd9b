use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A movie adaptation of a catalog book, keyed by release year within its book.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Adaptation {
    pub year: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// IMDb identifier (`tt...`), used to match watch-history exports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEntry {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "movies", default)]
    pub adaptations: Vec<Adaptation>,
}

impl CatalogEntry {
    pub fn has_adaptation(&self, year: u32) -> bool {
        self.adaptations.iter().any(|a| a.year == year)
    }

    pub fn adaptation_count(&self) -> usize {
        self.adaptations.len()
    }
}

/// Structural problem found while assembling a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogConflict {
    DuplicateSlug(String),
    DuplicateYear { slug: String, year: u32 },
}

impl fmt::Display for CatalogConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogConflict::DuplicateSlug(slug) => write!(f, "duplicate slug '{}'", slug),
            CatalogConflict::DuplicateYear { slug, year } => {
                write!(f, "duplicate adaptation year {} for '{}'", year, slug)
            }
        }
    }
}

impl std::error::Error for CatalogConflict {}

/// All known books, keyed by slug in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: IndexMap<String, CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate slugs and duplicate years inside one book.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Result<Self, CatalogConflict> {
        let mut map = IndexMap::with_capacity(entries.len());
        for entry in entries {
            for (i, adaptation) in entry.adaptations.iter().enumerate() {
                if entry.adaptations[..i].iter().any(|a| a.year == adaptation.year) {
                    return Err(CatalogConflict::DuplicateYear {
                        slug: entry.slug.clone(),
                        year: adaptation.year,
                    });
                }
            }
            if map.contains_key(&entry.slug) {
                return Err(CatalogConflict::DuplicateSlug(entry.slug));
            }
            map.insert(entry.slug.clone(), entry);
        }
        Ok(Self { entries: map })
    }

    pub fn get(&self, slug: &str) -> Option<&CatalogEntry> {
        self.entries.get(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn total_adaptations(&self) -> usize {
        self.iter().map(CatalogEntry::adaptation_count).sum()
    }

    pub fn books_with_adaptations(&self) -> usize {
        self.iter().filter(|e| !e.adaptations.is_empty()).count()
    }
}
