pub mod catalog;
pub mod error;
pub mod imdb;
pub mod personal;

pub use catalog::load_catalog;
pub use error::StoreError;
pub use imdb::parse_watch_history_csv;
pub use personal::PersonalFile;
