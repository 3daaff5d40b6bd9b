use serde::{Deserialize, Serialize};

/// One row of a watch-history export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchRecord {
    pub external_id: String, // IMDb `Const` column, e.g. "tt1234567"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
}

impl WatchRecord {
    pub fn new(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            title: None,
            year: None,
        }
    }
}
