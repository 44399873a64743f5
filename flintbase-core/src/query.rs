// src/query.rs
// Single-level equality filter over JSON document blobs

use std::collections::HashMap;

use serde_json::Value;

/// Does a parsed document satisfy every filter entry?
///
/// A document matches iff it is a JSON object and, for each
/// `(field, expected)` pair, the object contains that field with a value
/// equal to `expected` after type normalization. An empty filter map
/// matches every document.
pub fn matches(doc: &Value, filters: &HashMap<String, String>) -> bool {
    let Value::Object(fields) = doc else {
        return false;
    };

    filters.iter().all(|(field, expected)| {
        fields
            .get(field)
            .is_some_and(|value| value_matches(value, expected))
    })
}

/// Type-normalized equality between a JSON value and an expected string.
///
/// Strings compare raw; numbers and booleans compare against their
/// canonical textual form, so the filter `{"age": "30"}` matches the
/// document field `"age": 30`. Arrays and objects never match.
pub fn value_matches(value: &Value, expected: &str) -> bool {
    match value {
        Value::String(s) => s == expected,
        Value::Number(n) => n.to_string() == expected,
        Value::Bool(b) => b.to_string() == expected,
        Value::Null => expected == "null",
        Value::Array(_) | Value::Object(_) => false,
    }
}
