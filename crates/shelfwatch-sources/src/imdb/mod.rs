pub mod parser;

pub use parser::parse_watch_history_csv;
