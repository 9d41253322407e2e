//! Common types used throughout batchlist
//!
//! This module contains shared type definitions and type aliases
//! used across multiple modules.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Parameter bag sent with a method call
pub type Params = JsonObject;

/// A single listed entry, kept as raw JSON until the caller asks for a type
pub type Entry = JsonValue;

/// Name of the parameter carrying the listing offset
pub const START_PARAM: &str = "start";

// ============================================================================
// Utilities
// ============================================================================

/// Read the `start` offset out of a parameter bag.
///
/// A missing or `null` value means offset 0. Numeric strings are accepted
/// since the API itself does; anything else yields `None`.
pub fn start_offset(params: &Params) -> Option<u64> {
    match params.get(START_PARAM) {
        None | Some(JsonValue::Null) => Some(0),
        Some(JsonValue::Number(n)) => n.as_u64(),
        Some(JsonValue::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}

/// Return a copy of `params` with `start` overridden
pub fn with_start(params: &Params, start: u64) -> Params {
    let mut params = params.clone();
    params.insert(START_PARAM.to_string(), JsonValue::from(start));
    params
}
