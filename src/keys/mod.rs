//! Query key canonicalization and hashing.
//!
//! Every tier looks foods up by the same normalized key, so this is the one place
//! that decides what "the same query" means.

/// Canonicalizes free text into a cache key (trimmed, lowercased).
///
/// Idempotent: `normalize_key(&normalize_key(s)) == normalize_key(s)`.
///
/// ```
/// use forage::keys::normalize_key;
///
/// assert_eq!(normalize_key("  Peanut Butter \n"), "peanut butter");
/// assert_eq!(normalize_key(""), "");
/// ```
#[inline]
pub fn normalize_key(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Hex BLAKE3 digest of a normalized key, used as the on-disk entry name.
#[inline]
pub fn hash_key_hex(key: &str) -> String {
    blake3::hash(key.as_bytes()).to_hex().to_string()
}
