//! Apply substitution pairs back onto the source markup.

use crate::models::Fingerprint;

/// Fold every pair onto `html`, replacing one literal occurrence per pair.
///
/// Each search starts where the previous replacement ended. Pairs arrive in document order,
/// so every tag is reached and two tags sharing the same URL are each versioned once.
/// A fragment that cannot be found leaves the text untouched.
pub fn apply(html: &str, substitutions: &[Fingerprint]) -> String {
    let mut output = html.to_string();
    let mut cursor = 0;

    for substitution in substitutions {
        if substitution.original_url.is_empty() {
            continue;
        }

        let Some(offset) = output[cursor..].find(&substitution.original_url) else {
            continue;
        };

        let start = cursor + offset;
        let end = start + substitution.original_url.len();
        output.replace_range(start..end, &substitution.fingerprinted_url);
        cursor = start + substitution.fingerprinted_url.len();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(original: &str, replacement: &str) -> Fingerprint {
        Fingerprint {
            original_url: original.into(),
            fingerprinted_url: replacement.into(),
        }
    }

    #[test]
    fn returns_input_without_substitutions() {
        let html = "<p>unchanged</p>";
        assert_eq!(apply(html, &[]), html);
    }

    #[test]
    fn replaces_each_pair_in_order() {
        let html = r#"<link href="/a.css"><script src="/b.js"></script>"#;
        let result = apply(html, &[pair("/a.css", "/a.css?v=1"), pair("/b.js", "/b.js?v=2")]);
        assert_eq!(result, r#"<link href="/a.css?v=1"><script src="/b.js?v=2"></script>"#);
    }

    #[test]
    fn versions_identical_urls_once_each() {
        let html = r#"<link href="/a.css"><link href="/a.css">"#;
        let replacement = pair("/a.css", "/a.css?v=1");
        let result = apply(html, &[replacement.clone(), replacement]);
        assert_eq!(result, r#"<link href="/a.css?v=1"><link href="/a.css?v=1">"#);
    }

    #[test]
    fn ignores_missing_fragments() {
        let html = r#"<link href="/a.css">"#;
        let result = apply(html, &[pair("/missing.css", "/missing.css?v=1"), pair("/a.css", "/a.css?v=1")]);
        assert_eq!(result, r#"<link href="/a.css?v=1">"#);
    }
}
