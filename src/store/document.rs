use std::collections::HashSet;

use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// Top-level key holding the RSSHub endpoint list.
pub const ENDPOINTS_KEY: &str = "rsshub_endpoints";
/// Top-level key holding plugin settings.
pub const SETTINGS_KEY: &str = "settings";

// ============================================================================
// Error Types
// ============================================================================

/// The JSON was valid but did not have the shape of a store document.
#[derive(Debug, Error)]
#[error("Invalid store document: {0}")]
pub struct SchemaError(String);

// ============================================================================
// Subscribers
// ============================================================================

/// Subscriber identifiers recorded against one feed.
///
/// Older data files hold a plain list; newer ones key per-subscriber state by
/// identifier. List entries may be strings or numbers. Anything else the host
/// wrote is kept in `Other`, matches no one, and is written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Subscribers {
    List(Vec<Value>),
    Keyed(Map<String, Value>),
    Other(Value),
}

impl Default for Subscribers {
    fn default() -> Self {
        Subscribers::List(Vec::new())
    }
}

/// String ids compare as-is; numeric ids by their JSON text (`12345` == "12345").
fn id_matches(value: &Value, id: &str) -> bool {
    match value {
        Value::String(s) => s == id,
        Value::Number(n) => n.to_string() == id,
        _ => false,
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Subscribers {
    pub fn contains(&self, id: &str) -> bool {
        match self {
            Subscribers::List(ids) => ids.iter().any(|v| id_matches(v, id)),
            Subscribers::Keyed(map) => map.contains_key(id),
            Subscribers::Other(_) => false,
        }
    }

    /// Identifiers in stored order. Numbers are rendered as text.
    pub fn ids(&self) -> Vec<String> {
        match self {
            Subscribers::List(ids) => ids.iter().filter_map(id_text).collect(),
            Subscribers::Keyed(map) => map.keys().cloned().collect(),
            Subscribers::Other(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Subscribers::List(ids) => ids.len(),
            Subscribers::Keyed(map) => map.len(),
            Subscribers::Other(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds `id` if absent. Keyed entries start with an empty state object.
    /// An unrecognised value is replaced by a one-element list.
    /// Returns `false` when `id` was already subscribed.
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        match self {
            Subscribers::List(ids) => ids.push(Value::String(id.to_string())),
            Subscribers::Keyed(map) => {
                map.insert(id.to_string(), Value::Object(Map::new()));
            }
            Subscribers::Other(_) => {
                *self = Subscribers::List(vec![Value::String(id.to_string())]);
            }
        }
        true
    }

    /// Removes `id`, keeping the order of the remaining subscribers.
    pub fn remove(&mut self, id: &str) -> bool {
        match self {
            Subscribers::List(ids) => {
                let before = ids.len();
                ids.retain(|v| !id_matches(v, id));
                ids.len() != before
            }
            Subscribers::Keyed(map) => {
                let before = map.len();
                map.retain(|k, _| k != id);
                map.len() != before
            }
            Subscribers::Other(_) => false,
        }
    }
}

// ============================================================================
// Feed Records
// ============================================================================

/// Everything stored under one feed URL.
///
/// Only `subscribers` is interpreted here. Fields written by the host plugin
/// (channel info, last update markers, ...) ride along in `extra`. A record
/// with no `subscribers` key stays without one when saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedRecord {
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub subscribers: Option<Subscribers>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// Only called when the key exists, so `"subscribers": null` stays `Some(Other(null))`.
fn present<'de, D>(deserializer: D) -> Result<Option<Subscribers>, D::Error>
where
    D: Deserializer<'de>,
{
    Subscribers::deserialize(deserializer).map(Some)
}

impl FeedRecord {
    pub fn with_subscribers(subscribers: Subscribers) -> Self {
        Self {
            subscribers: Some(subscribers),
            extra: Map::new(),
        }
    }

    pub fn has_subscriber(&self, id: &str) -> bool {
        self.subscribers.as_ref().is_some_and(|s| s.contains(id))
    }

    pub fn subscriber_ids(&self) -> Vec<String> {
        self.subscribers
            .as_ref()
            .map(Subscribers::ids)
            .unwrap_or_default()
    }

    /// Subscribers for editing, starting an empty list if the record had none.
    pub fn subscribers_mut(&mut self) -> &mut Subscribers {
        self.subscribers.get_or_insert_with(Subscribers::default)
    }
}

// ============================================================================
// Store Document
// ============================================================================

/// In-memory form of the data file.
///
/// On disk this is one flat JSON object where the two reserved keys share the
/// namespace with feed URLs. In memory they are split into named fields.
/// Top-level values that are not objects (and a malformed endpoint list) are
/// kept in `other` so a save writes them back as they were.
///
/// A document read from disk remembers its key order and is written back in
/// that order; new keys follow. Equality ignores the remembered order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct StoreDocument {
    pub endpoints: Vec<String>,
    pub settings: Option<Value>,
    pub feeds: IndexMap<String, FeedRecord>,
    pub other: Map<String, Value>,
    key_order: Option<Vec<String>>,
}

impl PartialEq for StoreDocument {
    fn eq(&self, other: &Self) -> bool {
        self.endpoints == other.endpoints
            && self.settings == other.settings
            && self.feeds == other.feeds
            && self.other == other.other
    }
}

impl StoreDocument {
    pub fn with_endpoints(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            ..Self::default()
        }
    }

    /// Whether `key` is one of the top-level keys that is not a feed URL.
    pub fn is_reserved_key(key: &str) -> bool {
        key == ENDPOINTS_KEY || key == SETTINGS_KEY
    }

    pub fn feed(&self, url: &str) -> Option<&FeedRecord> {
        self.feeds.get(url)
    }

    pub fn feed_mut(&mut self, url: &str) -> Option<&mut FeedRecord> {
        self.feeds.get_mut(url)
    }

    /// URLs of every feed `subscriber` is recorded against, in feed order.
    pub fn subscribed_urls(&self, subscriber: &str) -> Vec<String> {
        self.feeds
            .iter()
            .filter(|(url, _)| !Self::is_reserved_key(url))
            .filter(|(_, record)| record.has_subscriber(subscriber))
            .map(|(url, _)| url.clone())
            .collect()
    }

    fn had_key(&self, key: &str) -> bool {
        self.key_order
            .as_ref()
            .is_some_and(|order| order.iter().any(|k| k == key))
    }

    /// Writes the entry for `key` if this document has one. Returns whether
    /// anything was written.
    fn write_entry<M: SerializeMap>(&self, key: &str, map: &mut M) -> Result<bool, M::Error> {
        match key {
            ENDPOINTS_KEY => {
                if self.endpoints.is_empty() {
                    if let Some(raw) = self.other.get(ENDPOINTS_KEY) {
                        map.serialize_entry(ENDPOINTS_KEY, raw)?;
                        return Ok(true);
                    }
                    // Built in code: always present. Read from disk: only if it was there.
                    if self.key_order.is_some() && !self.had_key(ENDPOINTS_KEY) {
                        return Ok(false);
                    }
                }
                map.serialize_entry(ENDPOINTS_KEY, &self.endpoints)?;
                Ok(true)
            }
            SETTINGS_KEY => match (&self.settings, self.other.get(SETTINGS_KEY)) {
                (Some(settings), _) => {
                    map.serialize_entry(SETTINGS_KEY, settings)?;
                    Ok(true)
                }
                (None, Some(raw)) => {
                    map.serialize_entry(SETTINGS_KEY, raw)?;
                    Ok(true)
                }
                (None, None) => Ok(false),
            },
            _ => {
                if let Some(record) = self.feeds.get(key) {
                    map.serialize_entry(key, record)?;
                    Ok(true)
                } else if let Some(raw) = self.other.get(key) {
                    map.serialize_entry(key, raw)?;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
        }
    }
}

impl TryFrom<Map<String, Value>> for StoreDocument {
    type Error = SchemaError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut doc = StoreDocument {
            key_order: Some(map.keys().cloned().collect()),
            ..StoreDocument::default()
        };

        for (key, value) in map {
            match key.as_str() {
                ENDPOINTS_KEY => match string_list(&value) {
                    Some(endpoints) => doc.endpoints = endpoints,
                    None => {
                        tracing::warn!(
                            key = ENDPOINTS_KEY,
                            "Endpoint list is not a list of strings, keeping it as-is"
                        );
                        doc.other.insert(key, value);
                    }
                },
                SETTINGS_KEY => doc.settings = Some(value),
                _ if value.is_object() => {
                    let record = serde_json::from_value(value)
                        .map_err(|e| SchemaError(format!("feed `{key}`: {e}")))?;
                    doc.feeds.insert(key, record);
                }
                _ => {
                    tracing::debug!(
                        key = %key,
                        "Top-level value is not a feed record, keeping it as-is"
                    );
                    doc.other.insert(key, value);
                }
            }
        }

        Ok(doc)
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}

impl Serialize for StoreDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        let mut written: HashSet<&str> = HashSet::new();

        let remembered = self.key_order.iter().flatten().map(String::as_str);
        let canonical = [ENDPOINTS_KEY, SETTINGS_KEY]
            .into_iter()
            .chain(self.feeds.keys().map(String::as_str))
            .chain(self.other.keys().map(String::as_str));

        for key in remembered.chain(canonical) {
            if written.contains(key) {
                continue;
            }
            if self.write_entry(key, &mut map)? {
                written.insert(key);
            }
        }
        map.end()
    }
}
