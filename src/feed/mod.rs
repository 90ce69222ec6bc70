//! Feed document helpers.
//!
//! Fetching and polling belong to the host plugin. This module only reads
//! what the store needs to describe a subscription: the channel title and
//! description, via a `quick-xml` pull parser.

mod channel;

pub use channel::{parse_channel_text_info, ChannelError, ChannelInfo};
