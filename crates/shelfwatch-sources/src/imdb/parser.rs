use crate::error::StoreError;
use csv::Reader;
use shelfwatch_models::WatchRecord;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use tracing::{self, debug};

/// Parse an IMDb export CSV (ratings, check-ins or list export) into watch records.
///
/// Only the `Const` column is required; `Title` and `Year` are picked up when present.
pub fn parse_watch_history_csv<P: AsRef<Path>>(path: P) -> Result<Vec<WatchRecord>, StoreError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| StoreError::io(path, "CSV file", e))?;
    let mut reader = Reader::from_reader(file);
    let mut records = Vec::new();

    // Read header
    let headers = reader
        .headers()
        .map_err(|e| StoreError::parse(path, e))?
        .clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let available_columns: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    tracing::debug!("Available CSV columns: {:?}", available_columns);

    let const_idx = *header_map.get("Const").ok_or_else(|| {
        StoreError::parse(
            path,
            format!("CSV missing 'Const' column. Available columns: {:?}", available_columns),
        )
    })?;
    let title_idx = header_map.get("Title").copied();
    let year_idx = header_map.get("Year").copied();

    // Parse rows
    let mut row_count = 0;
    for result in reader.records() {
        let record = result.map_err(|e| StoreError::parse(path, e))?;
        row_count += 1;

        let imdb_id = record.get(const_idx).unwrap_or("").trim().to_string();
        let title = title_idx
            .and_then(|i| record.get(i))
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        let year = year_idx
            .and_then(|i| record.get(i))
            .and_then(|y| y.trim().parse::<u32>().ok());

        if row_count <= 3 {
            debug!(
                row = row_count,
                imdb_id = %imdb_id,
                title = ?title,
                year = ?year,
                "Parsing watch history CSV row"
            );
        }

        if imdb_id.is_empty() {
            tracing::debug!(row = row_count, "Skipping row with empty IMDB ID");
            continue;
        }

        records.push(WatchRecord {
            external_id: imdb_id,
            title,
            year,
        });
    }

    tracing::info!(
        "Parsed {} total rows, {} watch records from {}",
        row_count,
        records.len(),
        path.display()
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_ratings_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Const,Your Rating,Date Rated,Title,URL,Title Type,IMDb Rating,Runtime (mins),Year,Genres,Num Votes,Release Date,Directors"
        ).unwrap();
        writeln!(
            file,
            "tt0049513,8,2020-01-01,Moby Dick,https://www.imdb.com/title/tt0049513/,Movie,7.3,116,1956,Adventure,20000,1956-06-27,John Huston"
        ).unwrap();
        writeln!(
            file,
            "tt0087182,6,2020-01-02,Dune,https://www.imdb.com/title/tt0087182/,Movie,6.3,137,1984,Action Adventure Sci-Fi,150000,1984-12-14,David Lynch"
        ).unwrap();
        file
    }

    #[test]
    fn test_parse_watch_history_csv() {
        let file = create_ratings_csv();
        let records = parse_watch_history_csv(file.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].external_id, "tt0049513");
        assert_eq!(records[0].title.as_deref(), Some("Moby Dick"));
        assert_eq!(records[0].year, Some(1956));
        assert_eq!(records[1].external_id, "tt0087182");
    }

    #[test]
    fn test_parse_watch_history_csv_const_only() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Const").unwrap();
        writeln!(file, "tt0049513").unwrap();

        let records = parse_watch_history_csv(file.path()).unwrap();
        assert_eq!(records, vec![WatchRecord::new("tt0049513")]);
    }

    #[test]
    fn test_parse_watch_history_csv_missing_const() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Title,Year").unwrap();
        writeln!(file, "Test,2020").unwrap();

        let result = parse_watch_history_csv(file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("CSV missing 'Const' column"));
    }

    #[test]
    fn test_parse_watch_history_csv_empty_imdb_id() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Const,Title,Year").unwrap();
        writeln!(file, ",Untitled,2020").unwrap();
        writeln!(file, "tt0142032,Moby Dick,1998").unwrap();

        let records = parse_watch_history_csv(file.path()).unwrap();
        assert_eq!(records.len(), 1); // Empty IMDB ID should be filtered
        assert_eq!(records[0].external_id, "tt0142032");
    }
}
