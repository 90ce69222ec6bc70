//! Subscription store and feed text helpers for an RSS chat bot plugin.
//!
//! The host plugin owns polling, fetching and command handling. This crate
//! gives it:
//!
//! - a JSON-backed [`Store`] mapping feed URLs to their subscribers,
//! - [`strip_html`] / [`strip_html_pic`] to turn entry HTML into chat text
//!   and image links,
//! - [`parse_channel_text_info`] to read a feed's title and description,
//! - [`get_root_url`] to reduce a URL to its origin.
//!
//! Everything is synchronous and single-threaded.
//!
//! ```no_run
//! use feedbox::{Store, StoreConfig};
//!
//! # fn main() -> Result<(), feedbox::StoreError> {
//! let mut store = Store::open(StoreConfig::default())?;
//! if let Some(feed) = store.data_mut().feed_mut("https://example.com/feed.xml") {
//!     feed.subscribers_mut().insert("group:42");
//! }
//! store.save()?;
//! let urls = store.get_subs_channel_url("group:42");
//! # let _ = urls;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod feed;
pub mod store;
pub mod util;

pub use config::StoreConfig;
pub use feed::{parse_channel_text_info, ChannelError, ChannelInfo};
pub use store::{FeedRecord, Store, StoreDocument, StoreError, Subscribers};
pub use util::{get_root_url, strip_html, strip_html_pic};
