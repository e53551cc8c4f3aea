//! Text to URL-safe slug normalization.

use deunicode::deunicode;

/// Normalize free text into a lowercase, hyphen-separated slug.
///
/// Text is transliterated to ASCII first (`é` → `e`, `Привет` → `Privet`,
/// `日本` → `Ri Ben`), then lowercased. Every run of characters that is not an
/// ASCII letter or digit becomes a single hyphen, and hyphens are trimmed
/// from both ends. Text with no usable characters yields an empty string.
///
/// # Examples
///
/// ```rust
/// use quas_utils::slug::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "hello-world");
/// assert_eq!(slugify("  Crème   Brûlée  "), "creme-brulee");
/// assert_eq!(slugify("Привет мир"), "privet-mir");
/// assert_eq!(slugify("C++ / Rust -- 2024"), "c-rust-2024");
/// assert_eq!(slugify("!!!"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
