//! Payload types
//!
//! Defines the request and response shapes used by the orchestrator
//! and its collaborators.

use crate::error::{Error, Result};
use crate::types::{with_start, Entry, JsonValue, Params};
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

// ============================================================================
// Command
// ============================================================================

/// A single method invocation: method name plus parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Method name (e.g. `crm.deal.list`)
    pub method: String,
    /// Parameter bag
    #[serde(default)]
    pub params: Params,
}

impl Command {
    /// Create a command with the given parameters
    pub fn new(method: impl Into<String>, params: Params) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// Create a command without parameters
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Params::new())
    }

    /// Set a single parameter
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Copy of this command starting at the given offset
    #[must_use]
    pub fn at_start(&self, start: u64) -> Self {
        Self {
            method: self.method.clone(),
            params: with_start(&self.params, start),
        }
    }
}

// ============================================================================
// Batch Entry
// ============================================================================

/// One per-command result of a batch, normalized by shape.
///
/// The API answers with an array for list methods, a wrapper object with an
/// `items` array for some newer methods, and a bare value for everything
/// else. Unknown shapes land in `Scalar` rather than failing.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    /// Plain array of entries
    Sequence(Vec<Entry>),
    /// Object wrapping its entries under `items`
    Wrapped(Vec<Entry>),
    /// Any other value, treated as one entry
    Scalar(Entry),
}

impl BatchEntry {
    /// Flatten into a sequence of entries
    pub fn into_entries(self) -> Vec<Entry> {
        match self {
            Self::Sequence(entries) | Self::Wrapped(entries) => entries,
            Self::Scalar(entry) => vec![entry],
        }
    }

    /// Number of entries this result contributes
    pub fn len(&self) -> usize {
        match self {
            Self::Sequence(entries) | Self::Wrapped(entries) => entries.len(),
            Self::Scalar(_) => 1,
        }
    }

    /// Whether this result contributes no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<JsonValue> for BatchEntry {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Array(entries) => Self::Sequence(entries),
            JsonValue::Object(mut map) if map.get("items").is_some_and(JsonValue::is_array) => {
                match map.remove("items") {
                    Some(JsonValue::Array(entries)) => Self::Wrapped(entries),
                    _ => Self::Wrapped(Vec::new()),
                }
            }
            other => Self::Scalar(other),
        }
    }
}

impl<'de> Deserialize<'de> for BatchEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// Keyed Map
// ============================================================================

/// Insertion-ordered map from command key to a per-command value.
///
/// PHP-backed APIs encode an empty map as `[]` and sometimes a list-shaped
/// map as an array, so arrays are accepted too and keyed by index. `null`
/// decodes to an empty map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct KeyedMap<V>(IndexMap<String, V>);

impl<V> KeyedMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Unwrap the inner map
    pub fn into_inner(self) -> IndexMap<String, V> {
        self.0
    }
}

impl<V> Default for KeyedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Deref for KeyedMap<V> {
    type Target = IndexMap<String, V>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<V> DerefMut for KeyedMap<V> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for KeyedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V> IntoIterator for KeyedMap<V> {
    type Item = (String, V);
    type IntoIter = indexmap::map::IntoIter<String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

struct KeyedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for KeyedMapVisitor<V> {
    type Value = KeyedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map, an array or null")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(KeyedMap(map))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = IndexMap::with_capacity(access.size_hint().unwrap_or(0));
        let mut index = 0usize;
        while let Some(value) = access.next_element::<V>()? {
            map.insert(index.to_string(), value);
            index += 1;
        }
        Ok(KeyedMap(map))
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(KeyedMap::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(KeyedMap::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for KeyedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(KeyedMapVisitor(PhantomData))
    }
}

// ============================================================================
// Single Response
// ============================================================================

/// One page returned by a single call
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SingleResponse {
    /// Entries of this page
    #[serde(default, deserialize_with = "deserialize_entries")]
    pub result: Vec<Entry>,
    /// Total number of entries the listing holds
    #[serde(default)]
    pub total: u64,
    /// Offset to resume from; absent once the listing is exhausted
    #[serde(default)]
    pub next: Option<u64>,
    /// Soft error reported alongside the data
    #[serde(default)]
    pub error: Option<String>,
    /// Timing information, passed through untouched
    #[serde(default)]
    pub time: JsonValue,
}

impl SingleResponse {
    /// Create a response holding the given entries
    pub fn new(result: Vec<Entry>, total: u64, next: Option<u64>) -> Self {
        Self {
            result,
            total,
            next,
            error: None,
            time: JsonValue::Null,
        }
    }

    /// Whether more entries remain after this page
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    /// Reinterpret this page as a complete listing
    pub fn into_list_payload(self) -> ListPayload {
        ListPayload {
            result: self.result,
            total: self.total,
            next: self.next,
            error: self.error.unwrap_or_default(),
            time: self.time,
        }
    }
}

fn deserialize_entries<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<Entry>, D::Error> {
    BatchEntry::deserialize(deserializer).map(BatchEntry::into_entries)
}

// ============================================================================
// Batch Response
// ============================================================================

/// Keyed per-command results of one batch call
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BatchResponse {
    /// Per-command results
    #[serde(default)]
    pub result: KeyedMap<BatchEntry>,
    /// Per-command totals
    #[serde(default)]
    pub result_total: KeyedMap<Option<u64>>,
    /// Per-command soft errors
    #[serde(default, deserialize_with = "deserialize_errors")]
    pub result_error: KeyedMap<String>,
    /// Per-command continuation offsets
    #[serde(default)]
    pub result_next: KeyedMap<Option<u64>>,
    /// Timing information, passed through untouched
    #[serde(default)]
    pub time: JsonValue,
}

/// Per-command errors arrive either as plain strings or as
/// `{"error": code, "error_description": text}` objects.
fn deserialize_errors<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<KeyedMap<String>, D::Error> {
    let raw = KeyedMap::<JsonValue>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key, error_text(value)))
        .collect())
}

fn error_text(value: JsonValue) -> String {
    match value {
        JsonValue::String(s) => s,
        JsonValue::Null => String::new(),
        JsonValue::Object(map) => {
            let code = map.get("error").and_then(JsonValue::as_str);
            let description = map
                .get("error_description")
                .and_then(JsonValue::as_str)
                .filter(|d| !d.is_empty());
            match (code, description) {
                (Some(code), Some(description)) => format!("{code}: {description}"),
                (Some(code), None) => code.to_string(),
                (None, Some(description)) => description.to_string(),
                (None, None) => JsonValue::Object(map).to_string(),
            }
        }
        other => other.to_string(),
    }
}

// ============================================================================
// List Payload
// ============================================================================

/// Complete listing handed back by [`Lister::list`](crate::list::Lister::list)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListPayload {
    /// All entries, in command order
    pub result: Vec<Entry>,
    /// Highest total reported by any command, or 0
    pub total: u64,
    /// Highest continuation offset reported, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<u64>,
    /// Newline-joined per-command errors
    #[serde(default)]
    pub error: String,
    /// Timing information of the last request
    #[serde(default)]
    pub time: JsonValue,
}

impl ListPayload {
    /// Number of entries
    pub fn len(&self) -> usize {
        self.result.len()
    }

    /// Whether the payload holds no entries
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    /// Whether any command reported a non-blank error
    pub fn has_errors(&self) -> bool {
        !self.error.trim().is_empty()
    }

    /// Deserialize all entries into `T`
    pub fn entries_as<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.result
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                T::deserialize(entry)
                    .map_err(|e| Error::decode(format!("entry {index}: {e}")))
            })
            .collect()
    }
}
