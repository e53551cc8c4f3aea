//! Key-casing normalization for JSON payloads.

use serde_json::{Map, Value};

/// Convert a camelCase or PascalCase identifier (acronyms included) to
/// snake_case.
///
/// A word boundary is placed before an uppercase letter that follows a
/// lowercase letter or digit, and before the last capital of an acronym that
/// starts a new word.
///
/// ```rust
/// use quas_utils::keys::to_snake_case;
///
/// assert_eq!(to_snake_case("HTTPServerError"), "http_server_error");
/// assert_eq!(to_snake_case("userID"), "user_id");
/// assert_eq!(to_snake_case("firstName"), "first_name");
/// ```
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let after_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            let ends_acronym = prev.is_ascii_uppercase()
                && chars.get(i + 1).is_some_and(|next| next.is_ascii_lowercase());
            if after_lower || ends_acronym {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Recursively rewrite every object key in `value` to snake_case.
///
/// Arrays are walked; scalars are returned unchanged.
///
/// ```rust
/// use quas_utils::keys::normalize_keys;
/// use serde_json::json;
///
/// let payload = json!({"firstName": "John", "address": {"streetAddress": "123 Main St"}});
/// assert_eq!(
///     normalize_keys(payload),
///     json!({"first_name": "John", "address": {"street_address": "123 Main St"}})
/// );
/// ```
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (to_snake_case(&key), normalize_keys(value)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}
