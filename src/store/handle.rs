use std::path::Path;

use super::file::{ensure_default_exists, read_document, write_document, StoreError};
use super::StoreDocument;
use crate::config::StoreConfig;

/// The subscription store: the data file plus its in-memory document.
///
/// Loaded once on [`Store::open`], mutated in place by the host plugin
/// through [`Store::data_mut`], and written back only on [`Store::save`].
/// There is no locking; two stores on the same path overwrite each other.
#[derive(Debug)]
pub struct Store {
    config: StoreConfig,
    data: StoreDocument,
}

impl Store {
    /// Opens the store, creating the data file from the configured default
    /// document if it does not exist yet.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let data = Self::read_or_init(&config)?;
        Ok(Self { config, data })
    }

    /// Re-reads the data file, replacing the in-memory document.
    ///
    /// Unsaved changes are discarded.
    pub fn load(&mut self) -> Result<(), StoreError> {
        self.data = Self::read_or_init(&self.config)?;
        Ok(())
    }

    /// Writes the whole in-memory document back to the data file.
    pub fn save(&self) -> Result<(), StoreError> {
        write_document(self.path(), &self.data)
    }

    /// Feed URLs `subscriber` is subscribed to, in store order.
    pub fn get_subs_channel_url(&self, subscriber: &str) -> Vec<String> {
        self.data.subscribed_urls(subscriber)
    }

    pub fn path(&self) -> &Path {
        &self.config.data_path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data(&self) -> &StoreDocument {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut StoreDocument {
        &mut self.data
    }

    fn read_or_init(config: &StoreConfig) -> Result<StoreDocument, StoreError> {
        ensure_default_exists(&config.data_path, &config.default_document)?;
        read_document(&config.data_path)
    }
}
