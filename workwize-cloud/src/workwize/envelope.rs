//! Response envelope handling for the Workwize public API
//!
//! Collections arrive wrapped in `data` or `value`, occasionally as a bare
//! array, and single records as a bare object. A paginator object under
//! `data` carries the records in its own `data` array. Pagination metadata
//! is optional: `links.next`, `meta.current_page`/`meta.last_page`, or the
//! paginator's `next_page_url`/`current_page`/`last_page`.

use serde_json::Value;

/// Extract the records carried by one response body.
pub fn unwrap_records(body: Value) -> Vec<Value> {
    let inner = match body {
        Value::Object(mut map) => {
            if let Some(data) = map.remove("data").filter(|v| !v.is_null()) {
                data
            } else if let Some(value) = map.remove("value").filter(|v| !v.is_null()) {
                value
            } else {
                Value::Object(map)
            }
        }
        other => other,
    };

    match inner {
        Value::Array(items) => items,
        Value::Object(mut map) if map.get("data").is_some_and(Value::is_array) => {
            match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        }
        Value::Object(map) if map.is_empty() => Vec::new(),
        Value::Object(map) => vec![Value::Object(map)],
        _ => Vec::new(),
    }
}

/// Whether the provider advertises a page after `current`.
///
/// A body without pagination metadata has no next page.
pub fn has_next_page(body: &Value, current: u32) -> bool {
    let paginator = body.get("data").filter(|d| d.is_object());
    let next = body
        .pointer("/links/next")
        .or_else(|| paginator.and_then(|p| p.get("next_page_url")));
    if let Some(next) = next {
        return next.as_str().is_some_and(|s| !s.is_empty());
    }

    let meta = body.get("meta").or(paginator);
    let last_page = meta.and_then(|m| m.get("last_page")).and_then(Value::as_u64);
    match last_page {
        Some(last) => {
            let current = meta
                .and_then(|m| m.get("current_page"))
                .and_then(Value::as_u64)
                .unwrap_or(u64::from(current));
            current < last
        }
        None => false,
    }
}

/// The single record of an address lookup, if any.
pub fn unwrap_single(body: Value) -> Option<Value> {
    let data = match body {
        Value::Object(mut map) => map.remove("data")?,
        _ => return None,
    };
    match data {
        Value::Object(map) if map.is_empty() => None,
        Value::Object(map) => Some(Value::Object(map)),
        Value::Array(items) => items.into_iter().find(Value::is_object),
        _ => None,
    }
}
