//! Query string encoding for batch commands
//!
//! Batch commands travel as `method?query` strings, so nested parameters
//! have to be flattened the way PHP's `http_build_query` does:
//! `filter[>ID]=5&select[0]=ID&select[1]=TITLE`.

use crate::types::{JsonValue, Params};
use url::form_urlencoded::Serializer;

/// Encode a parameter bag as a bracketed query string.
///
/// Booleans become `1`/`0`. `null` values and empty containers are left out.
pub fn build_query(params: &Params) -> String {
    let mut serializer = Serializer::new(String::new());
    for (key, value) in params {
        append(&mut serializer, key, value);
    }
    serializer.finish()
}

fn append(serializer: &mut Serializer<'_, String>, name: &str, value: &JsonValue) {
    match value {
        JsonValue::Null => {}
        JsonValue::Bool(b) => {
            serializer.append_pair(name, if *b { "1" } else { "0" });
        }
        JsonValue::Number(n) => {
            serializer.append_pair(name, &n.to_string());
        }
        JsonValue::String(s) => {
            serializer.append_pair(name, s);
        }
        JsonValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                append(serializer, &format!("{name}[{index}]"), item);
            }
        }
        JsonValue::Object(map) => {
            for (key, item) in map {
                append(serializer, &format!("{name}[{key}]"), item);
            }
        }
    }
}
