use serde::Serialize;
use shelfwatch_models::{Catalog, PersonalStore, WatchRecord};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// A catalog adaptation matched by its IMDb identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovieMatch {
    pub imdb_id: String,
    pub slug: String,
    pub year: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Reverse index from IMDb identifier to the catalog adaptations carrying it.
///
/// Adaptations without an `imdb` identifier are not indexed and never match.
#[derive(Debug, Default)]
pub struct AdaptationIndex {
    by_imdb: HashMap<String, Vec<MovieMatch>>,
    adaptations: usize,
    books_with_adaptations: usize,
}

impl AdaptationIndex {
    pub fn build(catalog: &Catalog) -> Self {
        let mut index = Self::default();

        for book in catalog.iter() {
            if !book.adaptations.is_empty() {
                index.books_with_adaptations += 1;
            }
            for adaptation in &book.adaptations {
                index.adaptations += 1;
                let Some(imdb_id) = adaptation.imdb.as_deref() else {
                    debug!(slug = %book.slug, year = adaptation.year, "Adaptation has no IMDb id");
                    continue;
                };
                index
                    .by_imdb
                    .entry(imdb_id.to_string())
                    .or_default()
                    .push(MovieMatch {
                        imdb_id: imdb_id.to_string(),
                        slug: book.slug.clone(),
                        year: adaptation.year,
                        title: adaptation.title.clone(),
                    });
            }
        }

        index
    }

    pub fn lookup(&self, imdb_id: &str) -> &[MovieMatch] {
        self.by_imdb.get(imdb_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn adaptations(&self) -> usize {
        self.adaptations
    }

    pub fn books_with_adaptations(&self) -> usize {
        self.books_with_adaptations
    }
}

/// Result of merging a watch-history export into a personal store
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    /// Updated copy of the personal store
    pub store: PersonalStore,
    /// Distinct identifiers in the export
    pub watched_ids: usize,
    /// Every catalog adaptation found in the export
    pub matches: Vec<MovieMatch>,
    /// Matches whose watched flag flipped to true in this run
    pub newly_watched: Vec<MovieMatch>,
}

impl UpdateOutcome {
    pub fn has_changes(&self) -> bool {
        !self.newly_watched.is_empty()
    }
}

/// Mark every catalog adaptation present in `records` as watched.
///
/// This is a monotone merge: flags only ever go from unset/false to true, so
/// running it again with the same records changes nothing. Books missing from
/// the store are appended unread. Records that match nothing are skipped.
pub fn update_movies(
    catalog: &Catalog,
    personal: &PersonalStore,
    records: &[WatchRecord],
) -> UpdateOutcome {
    let index = AdaptationIndex::build(catalog);
    let mut store = personal.clone();
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    let mut newly_watched = Vec::new();

    for record in records {
        if !seen.insert(record.external_id.as_str()) {
            continue;
        }
        for found in index.lookup(&record.external_id) {
            matches.push(found.clone());
            if store.entry_or_default(&found.slug).mark_watched(found.year) {
                debug!(slug = %found.slug, year = found.year, imdb_id = %found.imdb_id, "Marked as watched");
                newly_watched.push(found.clone());
            }
        }
    }

    info!(
        watched_ids = seen.len(),
        adaptations = index.adaptations(),
        matches = matches.len(),
        changes = newly_watched.len(),
        "Merged watch history"
    );

    UpdateOutcome {
        store,
        watched_ids: seen.len(),
        matches,
        newly_watched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_models::{Adaptation, CatalogEntry, PersonalEntry};

    fn adaptation(year: u32, imdb: Option<&str>) -> Adaptation {
        Adaptation {
            year,
            title: None,
            imdb: imdb.map(str::to_string),
        }
    }

    fn test_catalog() -> Catalog {
        Catalog::from_entries(vec![
            CatalogEntry {
                slug: "moby-dick".to_string(),
                title: "Moby-Dick".to_string(),
                author: None,
                adaptations: vec![
                    adaptation(1956, Some("tt0049513")),
                    adaptation(1998, Some("tt0142032")),
                ],
            },
            CatalogEntry {
                slug: "dune".to_string(),
                title: "Dune".to_string(),
                author: None,
                adaptations: vec![adaptation(1984, Some("tt0087182")), adaptation(2000, None)],
            },
            CatalogEntry {
                slug: "walden".to_string(),
                title: "Walden".to_string(),
                author: None,
                adaptations: vec![],
            },
        ])
        .unwrap()
    }

    fn records(ids: &[&str]) -> Vec<WatchRecord> {
        ids.iter().map(|id| WatchRecord::new(*id)).collect()
    }

    #[test]
    fn test_index_counts() {
        let index = AdaptationIndex::build(&test_catalog());
        assert_eq!(index.adaptations(), 4);
        assert_eq!(index.books_with_adaptations(), 2);
        assert_eq!(index.lookup("tt0087182")[0].slug, "dune");
        assert!(index.lookup("tt9999999").is_empty());
    }

    #[test]
    fn test_update_marks_existing_entry() {
        let catalog = test_catalog();
        let mut personal = PersonalStore::new();
        let mut moby = PersonalEntry { read: true, ..PersonalEntry::default() };
        moby.movies.insert(1956, false);
        personal.insert("moby-dick", moby);

        let outcome = update_movies(&catalog, &personal, &records(&["tt0049513", "tt0000001"]));

        assert_eq!(outcome.watched_ids, 2);
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.newly_watched.len(), 1);
        let moby = outcome.store.get("moby-dick").unwrap();
        assert!(moby.read);
        assert_eq!(moby.movies.get(&1956), Some(&true));
        // untouched input
        assert_eq!(personal.get("moby-dick").unwrap().movies.get(&1956), Some(&false));
    }

    #[test]
    fn test_update_creates_unread_entry() {
        let catalog = test_catalog();
        let mut personal = PersonalStore::new();
        personal.insert("walden", PersonalEntry { read: true, ..PersonalEntry::default() });

        let outcome = update_movies(&catalog, &personal, &records(&["tt0087182"]));

        let slugs: Vec<&str> = outcome.store.iter().map(|(slug, _)| slug).collect();
        assert_eq!(slugs, vec!["walden", "dune"]);
        let dune = outcome.store.get("dune").unwrap();
        assert!(!dune.read);
        assert_eq!(dune.movies.len(), 1);
        assert_eq!(dune.movies.get(&1984), Some(&true));
    }

    #[test]
    fn test_update_never_downgrades() {
        let catalog = test_catalog();
        let mut personal = PersonalStore::new();
        let mut moby = PersonalEntry::default();
        moby.movies.insert(1998, true);
        moby.movies.insert(1956, false);
        personal.insert("moby-dick", moby);

        let outcome = update_movies(&catalog, &personal, &records(&[]));

        assert!(!outcome.has_changes());
        assert_eq!(outcome.store, personal);
    }

    #[test]
    fn test_update_is_idempotent() {
        let catalog = test_catalog();
        let personal = PersonalStore::new();
        let export = records(&["tt0049513", "tt0087182", "tt0049513"]);

        let once = update_movies(&catalog, &personal, &export);
        let twice = update_movies(&catalog, &once.store, &export);

        assert_eq!(once.watched_ids, 2);
        assert_eq!(once.newly_watched.len(), 2);
        assert_eq!(twice.store, once.store);
        assert!(!twice.has_changes());
        assert_eq!(twice.matches.len(), 2);
    }

    #[test]
    fn test_shared_imdb_id_marks_every_adaptation() {
        let catalog = Catalog::from_entries(vec![
            CatalogEntry {
                slug: "book-one".to_string(),
                title: "One".to_string(),
                author: None,
                adaptations: vec![adaptation(2010, Some("tt1"))],
            },
            CatalogEntry {
                slug: "book-two".to_string(),
                title: "Two".to_string(),
                author: None,
                adaptations: vec![adaptation(2010, Some("tt1"))],
            },
        ])
        .unwrap();

        let outcome = update_movies(&catalog, &PersonalStore::new(), &records(&["tt1"]));
        assert_eq!(outcome.newly_watched.len(), 2);
        assert!(outcome.store.contains("book-one"));
        assert!(outcome.store.contains("book-two"));
    }
}
