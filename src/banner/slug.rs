//! Slug rules for addressing banners from embed references.

/// Check that a slug is non-empty and URL-safe (`[a-z0-9_-]+`).
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'_')
}

/// Normalize user input into slug form without inventing characters.
///
/// Trims and lowercases; the result still has to pass [`is_valid_slug`].
pub fn normalize_slug(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Derive a slug from a banner name.
///
/// Runs of anything other than ASCII letters and digits become a single
/// `-`, and leading/trailing dashes are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug
}
