use std::sync::OnceLock;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, ParseOpts, QualName};
use regex::{Captures, Regex};
use scraper::{Html, HtmlTreeSink, Node, Selector};

/// Line placed before quoted content in normalized text.
pub const QUOTE_OPEN: &str = "---引用---";
/// Line placed after quoted content in normalized text.
pub const QUOTE_CLOSE: &str = "---☆☆---";

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<\s*br\s*/?>").expect("invalid line break regex"))
}

fn blockquote_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<blockquote>(.*?)</blockquote>").expect("invalid blockquote regex")
    })
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n\s*\n").expect("invalid blank line regex"))
}

fn newline_run_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").expect("invalid newline regex"))
}

fn img_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("img").expect("invalid img selector"))
}

/// Elements whose text is never shown to a reader.
const HIDDEN_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "template"];

/// Parses `html` as a `<body>` fragment with scripting disabled, so
/// `<noscript>` content is parsed as markup instead of raw text.
fn parse_fragment(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    html5ever::driver::parse_fragment(
        HtmlTreeSink::new(Html::new_fragment()),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        Vec::new(),
    )
    .one(html)
}

fn is_hidden_element(node: &Node) -> bool {
    node.as_element()
        .is_some_and(|el| HIDDEN_TEXT_ELEMENTS.contains(&el.name()))
}

/// Visible text of a parsed fragment in document order.
fn visible_text(fragment: &Html) -> String {
    fragment
        .root_element()
        .descendants()
        .filter(|node| !node.ancestors().any(|a| is_hidden_element(a.value())))
        .filter_map(|node| node.value().as_text().map(|t| &**t))
        .collect()
}

/// Converts a feed entry's HTML into plain text for a chat message.
///
/// `<br>` variants become newlines and each `<blockquote>` is rewritten into
/// a block bracketed by [`QUOTE_OPEN`] and [`QUOTE_CLOSE`] lines. Both
/// rewrites run on the raw markup, before the remaining tags are stripped by
/// a tolerant HTML parser, so tags inside a quote are still removed.
/// Text inside `<script>`, `<style>` and `<template>` is dropped.
///
/// The result starts with a newline and never contains a blank line. Empty
/// input gives an empty string.
///
/// # Examples
///
/// ```
/// use feedbox::util::strip_html;
///
/// assert_eq!(strip_html("<p>Hello<br>World</p>"), "\nHello\nWorld");
/// assert_eq!(strip_html(""), "");
/// ```
pub fn strip_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let html = line_break_re().replace_all(html, "\n");
    let html = blockquote_re().replace_all(&html, |caps: &Captures| {
        let inner = caps.get(1).map_or("", |m| m.as_str()).trim();
        let inner = blank_lines_re().replace_all(inner, "\n");
        format!("{QUOTE_OPEN}\n{inner}\n{QUOTE_CLOSE}")
    });

    let text = visible_text(&parse_fragment(&html));

    let text = format!("\n{text}");
    newline_run_re().replace_all(&text, "\n").into_owned()
}

/// Returns the `src` of every `<img>` with a non-empty one, in document order.
///
/// Duplicates are kept and URLs are returned as written (entities decoded).
pub fn strip_html_pic(html: &str) -> Vec<String> {
    let fragment = parse_fragment(html);
    fragment
        .select(img_selector())
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| !src.is_empty())
        .map(str::to_string)
        .collect()
}
