use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Errors that can occur while reading channel metadata.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The document is not well-formed XML.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// No element with this name exists anywhere in the document.
    #[error("Feed has no <{0}> element")]
    MissingElement(&'static str),
}

/// Title and description of a feed channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub title: String,
    pub description: String,
}

#[derive(Clone, Copy)]
enum Field {
    Title,
    Description,
}

#[derive(Default)]
struct Found {
    title: Option<String>,
    description: Option<String>,
}

impl Found {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
        }
    }

    fn wanted(&self, e: &BytesStart<'_>) -> Option<Field> {
        match e.name().as_ref() {
            b"title" if self.title.is_none() => Some(Field::Title),
            b"description" if self.description.is_none() => Some(Field::Description),
            _ => None,
        }
    }
}

/// Parses a feed document and returns the text of the first `<title>` and the
/// first `<description>` found anywhere in it.
///
/// The lookup is by plain element name in document order, so an item title
/// wins if it comes before the channel title. Prefixed names such as
/// `itunes:title` do not match. The text of an element is the character data
/// (and CDATA) before its first child node (element, comment or processing
/// instruction), with entities decoded; an empty element yields an empty string.
///
/// # Errors
///
/// - [`ChannelError::XmlParse`] if the whole document is not well-formed
/// - [`ChannelError::MissingElement`] if either element is absent
///
/// # Security
///
/// `quick-xml` (0.37) does not expand `<!ENTITY>` declarations. A reference to
/// a custom entity fails to unescape and is reported as `XmlParse`.
pub fn parse_channel_text_info(text: &str) -> Result<ChannelInfo, ChannelError> {
    let mut reader = Reader::from_str(text.trim_start_matches('\u{feff}'));

    let mut found = Found::default();
    let mut capturing: Option<Field> = None;
    let mut captured = String::new();
    let mut depth: usize = 0;
    let mut seen_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                check_single_root(depth, seen_root)?;
                finish_capture(&mut found, &mut capturing, &mut captured);
                seen_root = true;
                depth += 1;
                capturing = found.wanted(&e);
            }
            Ok(Event::Empty(e)) => {
                check_single_root(depth, seen_root)?;
                finish_capture(&mut found, &mut capturing, &mut captured);
                seen_root = true;
                if let Some(field) = found.wanted(&e) {
                    *found.slot(field) = Some(String::new());
                }
            }
            Ok(Event::End(_)) => {
                finish_capture(&mut found, &mut capturing, &mut captured);
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ChannelError::XmlParse("unexpected closing tag".to_string()))?;
            }
            Ok(Event::Text(e)) => {
                if depth == 0 {
                    if !e.iter().all(u8::is_ascii_whitespace) {
                        return Err(ChannelError::XmlParse(
                            "text outside the root element".to_string(),
                        ));
                    }
                } else if capturing.is_some() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| ChannelError::XmlParse(e.to_string()))?;
                    captured.push_str(&unescaped);
                }
            }
            Ok(Event::CData(e)) => {
                if depth == 0 {
                    return Err(ChannelError::XmlParse(
                        "CDATA outside the root element".to_string(),
                    ));
                }
                if capturing.is_some() {
                    captured.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Comment(_)) | Ok(Event::PI(_)) => {
                finish_capture(&mut found, &mut capturing, &mut captured);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ChannelError::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    if depth > 0 {
        return Err(ChannelError::XmlParse(format!(
            "{depth} element(s) left unclosed at end of document"
        )));
    }
    if !seen_root {
        return Err(ChannelError::XmlParse("document is empty".to_string()));
    }

    let title = found
        .title
        .ok_or(ChannelError::MissingElement("title"))?;
    let description = found
        .description
        .ok_or(ChannelError::MissingElement("description"))?;

    tracing::debug!(title = %title, "Parsed channel info");
    Ok(ChannelInfo { title, description })
}

/// A second top-level element makes the document ill-formed.
fn check_single_root(depth: usize, seen_root: bool) -> Result<(), ChannelError> {
    if depth == 0 && seen_root {
        return Err(ChannelError::XmlParse(
            "extra content after the root element".to_string(),
        ));
    }
    Ok(())
}

fn finish_capture(found: &mut Found, capturing: &mut Option<Field>, captured: &mut String) {
    if let Some(field) = capturing.take() {
        *found.slot(field) = Some(std::mem::take(captured));
    }
}
