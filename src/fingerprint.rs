//! Content hashing for cache-busting tokens.
//!
//! Hashes are blake3 digests truncated to a short lowercase hex prefix. They are stable for
//! identical bytes; collisions are not detected.

use crate::models::Fingerprint;
use crate::rewrite::rewrite;

/// Number of hex characters kept from the digest.
pub const HASH_LENGTH: usize = 10;

/// Compute the short content hash used as the `v` query value.
pub fn content_hash(contents: &[u8]) -> String {
    let digest = blake3::hash(contents);
    let mut encoded = hex::encode(digest.as_bytes());
    encoded.truncate(HASH_LENGTH);
    encoded
}

/// Produce the substitution pair for an asset whose bytes were already read.
pub fn fingerprint(
    original_url: &str,
    contents: &[u8],
    replace_asset_root: Option<&str>,
) -> Fingerprint {
    rewrite(original_url, &content_hash(contents), replace_asset_root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_short_lowercase_hex() {
        let hash = content_hash(b"body { color: red; }");
        assert_eq!(hash.len(), HASH_LENGTH);
        assert!(hash.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn hash_follows_content() {
        assert_eq!(content_hash(b"a"), content_hash(b"a"));
        assert_ne!(content_hash(b"a"), content_hash(b"b"));
    }

    #[test]
    fn fingerprint_keeps_original_and_versions_url() {
        let result = fingerprint("/css/site.css", b"body {}", None);
        assert_eq!(result.original_url, "/css/site.css");
        assert_eq!(
            result.fingerprinted_url,
            format!("/css/site.css?v={}", content_hash(b"body {}"))
        );
    }
}
