//! Query-string encoding for form bodies.
//!
//! Nested values are flattened with bracket notation, so
//! `{"a": 1, "b": {"c": 2}}` becomes `a=1&b[c]=2`. Arrays are keyed by index.

use serde_json::{Map, Value};

/// Serialize a structured value into a form-encoded string
///
/// Only objects and arrays produce output; any other top-level value yields an
/// empty string. Empty nested containers contribute nothing and `null` leaves
/// are sent with an empty value.
///
/// # Examples
///
/// ```
/// use fetchit::http::qs;
///
/// let body = serde_json::json!({"a": 1, "b": {"c": 2}});
/// assert_eq!(qs::stringify(&body), "a=1&b[c]=2");
/// ```
pub fn stringify(value: &Value) -> String {
    let mut pairs = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                flatten(urlencoding::encode(key).into_owned(), v, &mut pairs);
            }
        }
        Value::Array(items) => {
            for (index, v) in items.iter().enumerate() {
                flatten(index.to_string(), v, &mut pairs);
            }
        }
        _ => {}
    }
    pairs.join("&")
}

fn flatten(prefix: String, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, v) in map {
                flatten(format!("{prefix}[{}]", urlencoding::encode(key)), v, out);
            }
        }
        Value::Array(items) => {
            for (index, v) in items.iter().enumerate() {
                flatten(format!("{prefix}[{index}]"), v, out);
            }
        }
        Value::Null => out.push(format!("{prefix}=")),
        Value::String(s) => out.push(format!("{prefix}={}", urlencoding::encode(s))),
        Value::Bool(b) => out.push(format!("{prefix}={b}")),
        Value::Number(n) => out.push(format!("{prefix}={n}")),
    }
}

/// Decode a form-encoded string into ordered key/value pairs
///
/// `+` is read as a space and invalid UTF-8 is replaced rather than rejected.
pub fn parse(input: &str) -> Vec<(String, String)> {
    input
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Build a nested object from bracketed keys
///
/// `("b[c]", "2")` lands at `{"b": {"c": "2"}}`. A key that collides with an
/// existing scalar replaces it. A key with an unclosed bracket, like `a[b`, is
/// kept whole as a literal field name.
pub fn to_value<I, K, V>(pairs: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Map::new();
    for (key, value) in pairs {
        let segments = key_segments(key.as_ref());
        insert_nested(&mut root, &segments, Value::String(value.into()));
    }
    Value::Object(root)
}

fn key_segments(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };
    let mut segments = vec![&key[..open]];
    let mut rest = &key[open..];
    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(&stripped[..close]);
                rest = &stripped[close + 1..];
            }
            None => return vec![key],
        }
    }
    segments
}

fn insert_nested(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            map.insert((*last).to_string(), value);
        }
        [head, tail @ ..] => {
            let entry = map
                .entry((*head).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(child) = entry {
                insert_nested(child, tail, value);
            }
        }
    }
}
