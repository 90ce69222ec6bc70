//! JSON-backed subscription store.
//!
//! - `document`: typed view of the data file (endpoints, settings, feeds)
//! - `file`: create-default, read and write primitives
//! - [`Store`]: facade that loads on open and saves on request

mod document;
mod file;
mod handle;

pub use document::{
    FeedRecord, SchemaError, StoreDocument, Subscribers, ENDPOINTS_KEY, SETTINGS_KEY,
};
pub use file::{ensure_default_exists, read_document, write_document, StoreError};
pub use handle::Store;
