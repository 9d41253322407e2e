//! Result aggregation
//!
//! Reduces the keyed per-command results of a batch into one flat
//! [`ListPayload`].

use crate::payload::{BatchResponse, ListPayload};

/// Highest defined value, ignoring `None`s.
///
/// Accepts anything iterable, so both slices and keyed maps work:
/// `highest(map.values().copied())`.
pub fn highest<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = Option<T>>,
{
    values.into_iter().flatten().max()
}

/// Merge a batch response into a single list payload.
///
/// Entries are concatenated in key order, each command keeping its own
/// order. `total` and `next` are the highest values any command reported.
/// Every per-command error is joined with `\n`, empty ones included.
pub fn batch_to_list_payload(payload: BatchResponse) -> ListPayload {
    let BatchResponse {
        result,
        result_total,
        result_error,
        result_next,
        time,
    } = payload;

    let total = highest(result_total.values().copied()).unwrap_or(0);
    let next = highest(result_next.values().copied());
    let error = result_error
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    let result = result
        .into_iter()
        .flat_map(|(_key, entry)| entry.into_entries())
        .collect();

    ListPayload {
        result,
        total,
        next,
        error,
        time,
    }
}
