//! Recursive copying of JSON object fields
//!
//! Used to apply a partial property update (e.g. from an inspector panel) onto
//! a layer's properties. Nested objects are merged key by key; everything else,
//! arrays included, replaces the destination value wholesale.

use serde_json::{Map, Value};

/// Copies every field of `src` into `dst`.
///
/// Object values are merged recursively into the matching object in `dst`,
/// which is created (or replaces a non-object value) when needed. Arrays and
/// scalars overwrite.
pub fn copy_object_values(src: &Map<String, Value>, dst: &mut Map<String, Value>) {
    for (key, value) in src {
        match value {
            Value::Object(nested) => {
                let slot = dst
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(target) = slot {
                    copy_object_values(nested, target);
                }
            }
            other => {
                dst.insert(key.clone(), other.clone());
            }
        }
    }
}

/// [`copy_object_values`] for untyped values.
///
/// Returns `false` and leaves `dst` unchanged unless both are objects.
pub fn copy_values(src: &Value, dst: &mut Value) -> bool {
    match (src, dst) {
        (Value::Object(src), Value::Object(dst)) => {
            copy_object_values(src, dst);
            true
        }
        _ => false,
    }
}
