use crate::error::StoreError;
use serde_yaml::{Mapping, Value};
use shelfwatch_models::{PersonalEntry, PersonalStore};
use std::path::Path;
use tracing::debug;

const READ_WATCHED_KEY: &str = "read|watched";

/// A personal progress file.
///
/// The `read|watched` section is parsed into a typed [`PersonalStore`]; every
/// other top-level key is carried through untouched so `save` keeps it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonalFile {
    document: Mapping,
    store: PersonalStore,
}

impl PersonalFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::io(path, "Personal YAML file", e))?;
        Self::parse(path, &content)
    }

    fn parse(path: &Path, content: &str) -> Result<Self, StoreError> {
        let document: Mapping =
            serde_yaml::from_str(content).map_err(|e| StoreError::parse(path, e))?;
        let section = document
            .get(READ_WATCHED_KEY)
            .cloned()
            .ok_or_else(|| StoreError::parse(path, format!("missing `{}` key", READ_WATCHED_KEY)))?;
        let store: PersonalStore = serde_yaml::from_value(section)
            .map_err(|e| StoreError::parse(path, format!("{}: {}", READ_WATCHED_KEY, e)))?;

        debug!(path = %path.display(), entries = store.len(), "Loaded personal file");
        Ok(Self { document, store })
    }

    pub fn store(&self) -> &PersonalStore {
        &self.store
    }

    pub fn into_store(self) -> PersonalStore {
        self.store
    }

    pub fn replace_store(&mut self, store: PersonalStore) {
        self.store = store;
    }

    /// Serialize the file, rewriting only the flags that differ from what was loaded.
    ///
    /// Entries that did not change keep their original node, so a missing `book`
    /// key or an empty `movies` mapping survives a save.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        let mut document = self.document.clone();
        let loaded = match document.get(READ_WATCHED_KEY) {
            Some(Value::Mapping(section)) => section.clone(),
            _ => Mapping::new(),
        };

        let mut section = Mapping::new();
        for (slug, entry) in self.store.iter() {
            let node = match loaded.get(slug) {
                Some(node) => merge_entry(node.clone(), entry)?,
                None => serde_yaml::to_value(entry)?,
            };
            section.insert(Value::String(slug.to_string()), node);
        }

        // Inserting over an existing key keeps its position in the mapping
        document.insert(
            Value::String(READ_WATCHED_KEY.to_string()),
            Value::Mapping(section),
        );
        serde_yaml::to_string(&document)
    }

    /// Overwrite `path` with this file's content.
    ///
    /// The YAML is written to a hidden sibling first and renamed over the target,
    /// so readers see either the old or the new file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), StoreError> {
        let path = path.as_ref();
        let content = self.to_yaml_string().map_err(|e| StoreError::parse(path, e))?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::parse(path, "invalid file name"))?;
        let tmp_path = path.with_file_name(format!(".{}.tmp", file_name));

        std::fs::write(&tmp_path, content).map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = %path.display(), entries = self.store.len(), "Saved personal file");
        Ok(())
    }
}

fn merge_entry(mut node: Value, entry: &PersonalEntry) -> Result<Value, serde_yaml::Error> {
    if serde_yaml::from_value::<PersonalEntry>(node.clone()).ok().as_ref() == Some(entry) {
        return Ok(node);
    }
    let Value::Mapping(fields) = &mut node else {
        return serde_yaml::to_value(entry);
    };

    let was_read = fields.get("book").and_then(Value::as_bool).unwrap_or(false);
    if was_read != entry.read {
        fields.insert(Value::String("book".to_string()), Value::Bool(entry.read));
    }

    if !entry.movies.is_empty() {
        if !matches!(fields.get("movies"), Some(Value::Mapping(_))) {
            fields.insert(Value::String("movies".to_string()), Value::Mapping(Mapping::new()));
        }
        if let Some(Value::Mapping(movies)) = fields.get_mut("movies") {
            for (year, watched) in &entry.movies {
                let key = Value::Number((*year).into());
                if movies.get(&key).and_then(Value::as_bool) != Some(*watched) {
                    movies.insert(key, Value::Bool(*watched));
                }
            }
        }
    }
    Ok(node)
}

/// Load only the typed `read|watched` mapping of a personal file.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PersonalStore, StoreError> {
    PersonalFile::load(path).map(PersonalFile::into_store)
}
