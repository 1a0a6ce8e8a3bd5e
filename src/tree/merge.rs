//! Fallback merge of plain configuration mappings.
//!
//! `fallback(high, low)` keeps everything in `high` and fills in whatever
//! `high` lacks from `low`, recursing where both sides hold a mapping.

use serde_json::{Map, Value};

/// Merge `low` underneath `high`, with `high` winning every conflict.
///
/// - Both mappings: union of keys, shared keys merged recursively. `high`'s
///   key order is kept and keys only `low` has are appended.
/// - Anything else: `high` is returned unchanged (including `null`, arrays
///   are never concatenated).
///
/// # Example
/// ```
/// use serde_json::json;
/// use conftree::tree::merge::fallback;
///
/// let high = json!({"a": {"b": 1}});
/// let low = json!({"a": {"c": 2}, "d": 3});
/// assert_eq!(fallback(high, low), json!({"a": {"b": 1, "c": 2}, "d": 3}));
/// ```
pub fn fallback(high: Value, low: Value) -> Value {
    match (high, low) {
        (Value::Object(high_map), Value::Object(low_map)) => {
            Value::Object(fallback_map(high_map, low_map))
        }
        (high, _) => high,
    }
}

/// [`fallback`] for two mappings.
pub fn fallback_map(mut high: Map<String, Value>, low: Map<String, Value>) -> Map<String, Value> {
    for (key, low_value) in low {
        match high.get_mut(&key) {
            Some(high_value) => {
                let merged = fallback(std::mem::take(high_value), low_value);
                *high_value = merged;
            }
            None => {
                high.insert(key, low_value);
            }
        }
    }
    high
}

/// Merge sources ordered from lowest to highest precedence.
///
/// Each later source is folded in as the new `high`. Returns `None` when
/// there are no sources.
pub fn fallback_all(sources: impl IntoIterator<Item = Value>) -> Option<Value> {
    sources.into_iter().reduce(|merged, next| fallback(next, merged))
}
