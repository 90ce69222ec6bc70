//! Store configuration supplied by the host plugin at construction time.
use std::path::PathBuf;

use crate::store::StoreDocument;

/// Data file used when the host plugin does not pick one.
pub const DEFAULT_DATA_PATH: &str = "data/astrbot_plugin_rss_data.json";

/// Where the data file lives and what a freshly created one contains.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path of the JSON data file.
    pub data_path: PathBuf,

    /// Written to `data_path` when the file does not exist yet.
    pub default_document: StoreDocument,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_document: StoreDocument::default(),
        }
    }
}

impl StoreConfig {
    /// Default configuration pointing at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: path.into(),
            ..Self::default()
        }
    }

    /// Replaces the document seeded into a missing data file.
    pub fn with_default_document(mut self, document: StoreDocument) -> Self {
        self.default_document = document;
        self
    }
}
