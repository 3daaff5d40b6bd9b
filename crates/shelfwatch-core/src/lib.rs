pub mod movies;
pub mod statistics;
pub mod validation;

pub use movies::{update_movies, AdaptationIndex, MovieMatch, UpdateOutcome};
pub use statistics::{aggregate, classify_books, render_mermaid, BookProgress, BucketCounts, CompletionBucket, StatsReport};
pub use validation::{validate, ValidationIssue};
