use serde::Serialize;
use shelfwatch_models::{Catalog, PersonalStore};
use std::fmt;
use tracing::debug;

/// A cross-reference problem between a personal file and the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// Personal slug that the catalog does not list
    UnknownSlug { slug: String },
    /// Movie year tracked for a known book that has no adaptation that year
    UnknownYear { slug: String, year: u32 },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownSlug { slug } => write!(f, "invalid slug: {}", slug),
            ValidationIssue::UnknownYear { slug, year } => {
                write!(f, "invalid movie year: {}: {}", slug, year)
            }
        }
    }
}

/// Check every personal slug and movie year against the catalog.
///
/// Issues come out in personal-file order: slugs as listed, then each slug's movie years.
pub fn validate(catalog: &Catalog, personal: &PersonalStore) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for (slug, entry) in personal.iter() {
        let Some(book) = catalog.get(slug) else {
            issues.push(ValidationIssue::UnknownSlug {
                slug: slug.to_string(),
            });
            continue;
        };

        for &year in entry.movies.keys() {
            if !book.has_adaptation(year) {
                issues.push(ValidationIssue::UnknownYear {
                    slug: slug.to_string(),
                    year,
                });
            }
        }
    }

    debug!(entries = personal.len(), issues = issues.len(), "Validated personal file");
    issues
}
