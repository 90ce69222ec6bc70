//! Text helpers for turning feed content into chat messages.
//!
//! This module provides pure functions for:
//!
//! - **HTML to text**: strip markup while keeping line breaks and marking
//!   quoted blocks
//! - **Image extraction**: collect `<img src>` values in document order
//! - **URL roots**: reduce a URL to `scheme://netloc`
//!
//! # Examples
//!
//! ```
//! use feedbox::util::{get_root_url, strip_html, strip_html_pic};
//!
//! let html = r#"<p>New post<br>with <img src="https://example.com/a.png"></p>"#;
//! assert_eq!(strip_html(html), "\nNew post\nwith ");
//! assert_eq!(strip_html_pic(html), vec!["https://example.com/a.png"]);
//! assert_eq!(get_root_url("https://example.com/feed.xml"), "https://example.com");
//! ```

mod html;
mod root_url;

pub use html::{strip_html, strip_html_pic, QUOTE_CLOSE, QUOTE_OPEN};
pub use root_url::get_root_url;
