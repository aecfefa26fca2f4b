//! BSON key sanitization for MongoDB compatibility.
//!
//! MongoDB restricts document keys from containing dots (`.`), dollar signs
//! (`$`), and null bytes, all of which have meaning in its query syntax.
//! Keys are escaped on the way in and unescaped on the way out; values are
//! left untouched so stored data and query filters keep matching each other.

use bson::Bson;

/// Escape pairs applied to keys, in order.
const REPLACEMENTS: [(&str, &str); 3] = [
    (".", "__dot__"),
    ("$", "__dollar__"),
    ("\0", "__null__"),
];

/// Escapes a single key.
pub(crate) fn sanitize_key(key: &str) -> String {
    let mut sanitized = key.to_string();
    for (target, replacement) in REPLACEMENTS.iter() {
        sanitized = sanitized.replace(*target, *replacement);
    }
    sanitized
}

/// Recursively escapes the keys of every document nested in the value.
pub(crate) fn sanitize_value(value: &Bson) -> Bson {
    match value {
        Bson::Array(arr) => Bson::Array(
            arr.iter()
                .map(sanitize_value)
                .collect(),
        ),
        Bson::Document(doc) => Bson::Document(
            doc.iter()
                .map(|(k, v)| (sanitize_key(k), sanitize_value(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Unescapes a single key; the inverse of [`sanitize_key`].
pub(crate) fn restore_key(key: &str) -> String {
    let mut restored = key.to_string();
    for (target, replacement) in REPLACEMENTS.iter().rev() {
        restored = restored.replace(*replacement, *target);
    }
    restored
}

/// Recursively unescapes the keys of every document nested in the value.
pub(crate) fn restore_value(value: &Bson) -> Bson {
    match value {
        Bson::Array(arr) => Bson::Array(
            arr.iter()
                .map(restore_value)
                .collect(),
        ),
        Bson::Document(doc) => Bson::Document(
            doc.iter()
                .map(|(k, v)| (restore_key(k), restore_value(v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}
