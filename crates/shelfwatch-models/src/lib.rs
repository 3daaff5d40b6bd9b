pub mod catalog;
pub mod personal;
pub mod watch_record;

pub use catalog::{Adaptation, Catalog, CatalogConflict, CatalogEntry};
pub use personal::{PersonalEntry, PersonalStore};
pub use watch_record::WatchRecord;
