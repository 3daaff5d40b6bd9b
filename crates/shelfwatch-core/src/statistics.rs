use serde::Serialize;
use shelfwatch_models::{Catalog, PersonalStore};

/// Where a book stands, combining the read flag with watched adaptations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBucket {
    ReadAndAllMoviesWatched,
    ReadAndSomeMoviesWatched,
    /// Read with nothing watched, including books without adaptations
    ReadOnly,
    WatchedOnly,
    Neither,
}

impl CompletionBucket {
    pub fn classify(read: bool, adaptations: usize, watched: usize) -> Self {
        match (read, watched) {
            (true, 0) => CompletionBucket::ReadOnly,
            (true, w) if w >= adaptations => CompletionBucket::ReadAndAllMoviesWatched,
            (true, _) => CompletionBucket::ReadAndSomeMoviesWatched,
            (false, 0) => CompletionBucket::Neither,
            (false, _) => CompletionBucket::WatchedOnly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookProgress {
    pub slug: String,
    pub read: bool,
    pub adaptations: usize,
    pub watched: usize,
    pub bucket: CompletionBucket,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub read_and_all_movies_watched: usize,
    pub read_and_some_movies_watched: usize,
    pub read_only: usize,
    pub watched_only: usize,
    pub neither: usize,
}

impl BucketCounts {
    fn add(&mut self, bucket: CompletionBucket) {
        let slot = match bucket {
            CompletionBucket::ReadAndAllMoviesWatched => &mut self.read_and_all_movies_watched,
            CompletionBucket::ReadAndSomeMoviesWatched => &mut self.read_and_some_movies_watched,
            CompletionBucket::ReadOnly => &mut self.read_only,
            CompletionBucket::WatchedOnly => &mut self.watched_only,
            CompletionBucket::Neither => &mut self.neither,
        };
        *slot += 1;
    }

    pub fn total(&self) -> usize {
        self.read_and_all_movies_watched
            + self.read_and_some_movies_watched
            + self.read_only
            + self.watched_only
            + self.neither
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsReport {
    pub total_books: usize,
    pub books_read: usize,
    pub books_not_read: usize,
    pub books_with_adaptations: usize,
    pub total_adaptations: usize,
    pub adaptations_watched: usize,
    pub buckets: BucketCounts,
}

impl StatsReport {
    pub fn adaptations_not_watched(&self) -> usize {
        self.total_adaptations - self.adaptations_watched
    }

    pub fn books_read_pct(&self) -> f64 {
        percentage(self.books_read, self.total_books)
    }

    pub fn books_not_read_pct(&self) -> f64 {
        percentage(self.books_not_read, self.total_books)
    }

    pub fn adaptations_watched_pct(&self) -> f64 {
        percentage(self.adaptations_watched, self.total_adaptations)
    }

    pub fn adaptations_not_watched_pct(&self) -> f64 {
        percentage(self.adaptations_not_watched(), self.total_adaptations)
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Progress for every catalog book, in catalog order.
///
/// Books absent from the personal store count as unread with nothing watched.
/// Watched flags only count for years the catalog lists for that book.
pub fn classify_books(catalog: &Catalog, personal: &PersonalStore) -> Vec<BookProgress> {
    catalog
        .iter()
        .map(|book| {
            let entry = personal.get(&book.slug);
            let read = entry.map(|e| e.read).unwrap_or(false);
            let watched = entry
                .map(|e| e.watched_years().filter(|&y| book.has_adaptation(y)).count())
                .unwrap_or(0);
            let adaptations = book.adaptation_count();

            BookProgress {
                slug: book.slug.clone(),
                read,
                adaptations,
                watched,
                bucket: CompletionBucket::classify(read, adaptations, watched),
            }
        })
        .collect()
}

/// Aggregate reading and watching counts over the catalog.
pub fn aggregate(catalog: &Catalog, personal: &PersonalStore) -> StatsReport {
    let mut report = StatsReport {
        total_books: catalog.len(),
        books_with_adaptations: catalog.books_with_adaptations(),
        total_adaptations: catalog.total_adaptations(),
        ..StatsReport::default()
    };

    for progress in classify_books(catalog, personal) {
        if progress.read {
            report.books_read += 1;
        } else {
            report.books_not_read += 1;
        }
        report.adaptations_watched += progress.watched;
        report.buckets.add(progress.bucket);
    }

    tracing::debug!(?report, "Aggregated statistics");
    report
}

/// Render the report as a Mermaid sankey diagram.
pub fn render_mermaid(report: &StatsReport) -> String {
    let b = &report.buckets;
    format!(
        "%%{{init: {{'theme':'base'}}}}%%
sankey-beta

%% Books flow
All Books,Books Read,{books_read}
All Books,Books Not Read,{books_not_read}

%% Books Read breakdown
Books Read,Read + All Movies,{all}
Books Read,Read + Some Movies,{some}
Books Read,Read Only,{read_only}

%% Books Not Read breakdown
Books Not Read,Movies Only,{watched_only}
Books Not Read,Neither,{neither}

%% Movies flow
All Movies,Movies Watched,{watched}
All Movies,Movies Not Watched,{not_watched}
",
        books_read = report.books_read,
        books_not_read = report.books_not_read,
        all = b.read_and_all_movies_watched,
        some = b.read_and_some_movies_watched,
        read_only = b.read_only,
        watched_only = b.watched_only,
        neither = b.neither,
        watched = report.adaptations_watched,
        not_watched = report.adaptations_not_watched(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_models::{Adaptation, CatalogEntry, PersonalEntry};

    fn book(slug: &str, years: &[u32]) -> CatalogEntry {
        CatalogEntry {
            slug: slug.to_string(),
            title: slug.to_string(),
            author: None,
            adaptations: years
                .iter()
                .map(|&year| Adaptation { year, title: None, imdb: None })
                .collect(),
        }
    }

    fn entry(read: bool, movies: &[(u32, bool)]) -> PersonalEntry {
        PersonalEntry {
            read,
            movies: movies.iter().copied().collect(),
        }
    }

    #[test]
    fn test_read_book_without_adaptations_is_read_only() {
        let catalog = Catalog::from_entries(vec![book("walden", &[])]).unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("walden", entry(true, &[]));

        let progress = classify_books(&catalog, &personal);
        assert_eq!(progress[0].bucket, CompletionBucket::ReadOnly);

        let report = aggregate(&catalog, &personal);
        assert_eq!(report.adaptations_watched, 0);
        assert_eq!(report.buckets.read_only, 1);
    }

    #[test]
    fn test_partially_watched_unread_book() {
        let catalog = Catalog::from_entries(vec![book("dune", &[1990, 2005])]).unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("dune", entry(false, &[(1990, true), (2005, false)]));

        let report = aggregate(&catalog, &personal);
        assert_eq!(report.buckets.watched_only, 1);
        assert_eq!(report.adaptations_watched, 1);
        assert_eq!(report.total_adaptations, 2);
        assert_eq!(report.books_not_read, 1);
    }

    #[test]
    fn test_watched_without_book_key() {
        let catalog = Catalog::from_entries(vec![book("moby-dick", &[1956])]).unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("moby-dick", entry(false, &[(1956, true)]));

        let progress = classify_books(&catalog, &personal);
        assert_eq!(progress[0].bucket, CompletionBucket::WatchedOnly);
    }

    #[test]
    fn test_buckets_cover_every_book() {
        let catalog = Catalog::from_entries(vec![
            book("all", &[2000, 2010]),
            book("some", &[2000, 2010]),
            book("read", &[2000]),
            book("watched", &[2000]),
            book("untracked", &[2000]),
            book("nothing", &[]),
        ])
        .unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("all", entry(true, &[(2000, true), (2010, true)]));
        personal.insert("some", entry(true, &[(2000, true), (2010, false)]));
        personal.insert("read", entry(true, &[(2000, false)]));
        personal.insert("watched", entry(false, &[(2000, true)]));
        personal.insert("nothing", entry(false, &[]));
        personal.insert("not-in-catalog", entry(true, &[(1999, true)]));

        let report = aggregate(&catalog, &personal);
        assert_eq!(
            report.buckets,
            BucketCounts {
                read_and_all_movies_watched: 1,
                read_and_some_movies_watched: 1,
                read_only: 1,
                watched_only: 1,
                neither: 2,
            }
        );
        assert_eq!(report.buckets.total(), report.total_books);
        assert_eq!(report.books_read + report.books_not_read, report.total_books);
        assert_eq!(report.books_read, 3);
        assert_eq!(report.books_with_adaptations, 5);
        assert_eq!(report.total_adaptations, 7);
        assert_eq!(report.adaptations_watched, 4);
    }

    #[test]
    fn test_watched_years_outside_catalog_are_clipped() {
        let catalog = Catalog::from_entries(vec![book("dune", &[1984])]).unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("dune", entry(true, &[(1984, true), (1999, true)]));

        let report = aggregate(&catalog, &personal);
        assert_eq!(report.adaptations_watched, 1);
        assert_eq!(report.buckets.read_and_all_movies_watched, 1);
        assert_eq!(report.adaptations_not_watched(), 0);
    }

    #[test]
    fn test_percentages_with_empty_catalog() {
        let report = aggregate(&Catalog::default(), &PersonalStore::new());
        assert_eq!(report.books_read_pct(), 0.0);
        assert_eq!(report.adaptations_watched_pct(), 0.0);
    }

    #[test]
    fn test_render_mermaid() {
        let catalog = Catalog::from_entries(vec![book("dune", &[1990, 2005]), book("emma", &[])]).unwrap();
        let mut personal = PersonalStore::new();
        personal.insert("dune", entry(false, &[(1990, true)]));

        let diagram = render_mermaid(&aggregate(&catalog, &personal));
        assert!(diagram.starts_with("%%{init: {'theme':'base'}}%%\nsankey-beta\n"));
        assert!(diagram.contains("All Books,Books Read,0\n"));
        assert!(diagram.contains("All Books,Books Not Read,2\n"));
        assert!(diagram.contains("Books Not Read,Movies Only,1\n"));
        assert!(diagram.contains("Books Not Read,Neither,1\n"));
        assert!(diagram.contains("All Movies,Movies Watched,1\n"));
        assert!(diagram.ends_with("All Movies,Movies Not Watched,1\n"));
    }

    #[test]
    fn test_report_serializes_bucket_names() {
        let json = serde_json::to_value(CompletionBucket::ReadAndSomeMoviesWatched).unwrap();
        assert_eq!(json, "read_and_some_movies_watched");
    }
}
