//! Canonical request paths and query-string assembly.

use serde_json::Value;
use url::{form_urlencoded, Url};

/// Normalize an object key: collapse runs of slashes and strip one
/// leading and one trailing slash.
///
/// Idempotent — keys are normalized both when first supplied and again
/// at render time for public URLs, so a second pass must be a no-op.
pub fn normalize_key(key: &str) -> String {
    let mut collapsed = String::with_capacity(key.len());
    let mut prev_slash = false;
    for ch in key.chars() {
        if ch == '/' {
            if !prev_slash {
                collapsed.push('/');
            }
            prev_slash = true;
        } else {
            prev_slash = false;
            collapsed.push(ch);
        }
    }
    let trimmed = collapsed.strip_prefix('/').unwrap_or(&collapsed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.to_string()
}

/// Request path for an object operation:
/// `<prefix>/<bucket>/<normalized key>`.
pub fn object_route(prefix: &str, bucket_id: &str, key: &str) -> String {
    format!(
        "{}/{}/{}",
        prefix.trim_matches('/'),
        bucket_id,
        normalize_key(key)
    )
}

/// Join a relative path onto the client base URL, preserving any path
/// the base already carries (e.g. `/storage/v1`).
pub fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let extended = format!("{}/", base.path());
        base.set_path(&extended);
    }
    base.join(path.trim_start_matches('/'))
}

/// Recursively flatten a JSON record into query pairs.
///
/// Nested records become a single URL-encoded sub-string under their
/// own key; null fields are omitted, not encoded as empty.
pub fn flatten_query(value: &Value) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    if let Value::Object(map) = value {
        for (key, entry) in map {
            match entry {
                Value::Null => {}
                Value::String(text) => pairs.push((key.clone(), text.clone())),
                Value::Bool(flag) => pairs.push((key.clone(), flag.to_string())),
                Value::Number(number) => pairs.push((key.clone(), number.to_string())),
                Value::Object(_) => {
                    pairs.push((key.clone(), encode_query(&flatten_query(entry))));
                }
                Value::Array(items) => {
                    let joined = items.iter().map(value_text).collect::<Vec<_>>().join(",");
                    pairs.push((key.clone(), joined));
                }
            }
        }
    }
    pairs
}

/// Encode pairs as an `application/x-www-form-urlencoded` query string.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
