//! Filesystem-safe slugs of location names.

/// Slug of an empty or all-punctuation name.
pub const UNNAMED_SLUG: &str = "unnamed";

/// Lowercase ASCII alphanumerics; every other run of characters becomes a
/// single `-`.  Leading and trailing separators are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() { UNNAMED_SLUG.to_owned() } else { slug }
}
