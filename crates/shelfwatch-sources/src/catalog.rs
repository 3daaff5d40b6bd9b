use crate::error::StoreError;
use serde::Deserialize;
use shelfwatch_models::{Catalog, CatalogEntry};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CatalogFile {
    books: Vec<CatalogEntry>,
}

/// Load the book/adaptation catalog (`books:` list) into a slug-keyed catalog.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Catalog, StoreError> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).map_err(|e| StoreError::io(path, "Books file", e))?;
    parse_catalog(path, &content)
}

fn parse_catalog(path: &Path, content: &str) -> Result<Catalog, StoreError> {
    let file: CatalogFile =
        serde_yaml::from_str(content).map_err(|e| StoreError::parse(path, e))?;
    let catalog = Catalog::from_entries(file.books).map_err(|e| StoreError::parse(path, e))?;

    debug!(
        books = catalog.len(),
        adaptations = catalog.total_adaptations(),
        "Loaded catalog"
    );
    Ok(catalog)
}
