//! Small random-value, parsing, and paging helpers.

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::error::ConfigError;

const LOWERCASE_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Longest decimal number that fits in a `u64` for every digit pattern.
pub const MAX_NUMBER_LEN: usize = 19;

/// A random string of `length` letters and digits.
///
/// Mixed case unless `lowercase` is set. A non-empty `prefix` is prepended
/// with a hyphen.
///
/// ```rust
/// use quas_utils::misc::generate_random_string;
///
/// let code = generate_random_string(8, "inv", true);
/// assert!(code.starts_with("inv-"));
/// assert_eq!(code.len(), 12);
/// ```
pub fn generate_random_string(length: usize, prefix: &str, lowercase: bool) -> String {
    random_string_with(&mut rand::rng(), length, prefix, lowercase)
}

fn random_string_with<G: Rng>(rng: &mut G, length: usize, prefix: &str, lowercase: bool) -> String {
    let random: String = if lowercase {
        (0..length)
            .map(|_| {
                let idx = rng.random_range(0..LOWERCASE_ALPHANUMERIC.len());
                char::from(LOWERCASE_ALPHANUMERIC[idx])
            })
            .collect()
    } else {
        (0..length)
            .map(|_| char::from(rng.sample(Alphanumeric)))
            .collect()
    };

    if prefix.is_empty() {
        random
    } else {
        format!("{}-{}", prefix, random)
    }
}

/// A random number with exactly `length` decimal digits.
///
/// ```rust
/// use quas_utils::misc::generate_random_number;
///
/// let otp = generate_random_number(6).unwrap();
/// assert!((100_000..=999_999).contains(&otp));
/// assert!(generate_random_number(0).is_err());
/// ```
pub fn generate_random_number(length: usize) -> Result<u64, ConfigError> {
    if !(1..=MAX_NUMBER_LEN).contains(&length) {
        return Err(ConfigError::InvalidLength {
            parameter: "length",
            value: length,
            min: 1,
            max: MAX_NUMBER_LEN,
        });
    }
    // length <= 19, so both bounds fit in u64.
    let low = 10u64.pow(length as u32 - 1);
    let high = 10u64.pow(length as u32 - 1) * 10 - 1;
    Ok(rand::rng().random_range(low..=high))
}

/// Parse an integer, returning `None` instead of an error.
///
/// Surrounding whitespace is ignored.
pub fn parse_int(s: &str) -> Option<i64> {
    s.trim().parse().ok()
}

/// Interpret `"true"`, `"1"`, or `"yes"` (any case) as true; everything else,
/// including a missing value, as false.
pub fn parse_bool(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim();
        v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes")
    })
}

/// Split a URL or path on `/`.
///
/// ```rust
/// use quas_utils::misc::url_parts;
///
/// assert_eq!(url_parts("/blog/posts/hello"), vec!["", "blog", "posts", "hello"]);
/// ```
pub fn url_parts(url: &str) -> Vec<&str> {
    url.split('/').collect()
}

/// The items on 1-based `page` when showing `per_page` items per page.
///
/// Page 0 is treated as page 1. Pages past the end are empty.
///
/// ```rust
/// use quas_utils::misc::paginate;
///
/// let items: Vec<u32> = (1..=25).collect();
/// assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
/// assert!(paginate(&items, 4, 10).is_empty());
/// ```
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.max(1).saturating_sub(1).saturating_mul(per_page);
    let end = start.saturating_add(per_page);
    let start = start.min(items.len());
    let end = end.min(items.len());
    &items[start..end]
}
