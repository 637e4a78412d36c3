//! URL rewriting: attach the version parameter and optionally move the URL to a new root.

use std::sync::OnceLock;

use url::{Position, Url};

use crate::models::Fingerprint;

/// Query parameter carrying the content fingerprint.
pub const VERSION_PARAM: &str = "v";

/// Build the substitution pair for an asset whose content hashed to `hash`.
pub fn rewrite(original_url: &str, hash: &str, replace_asset_root: Option<&str>) -> Fingerprint {
    let anchored = match replace_asset_root.filter(|root| !root.is_empty()) {
        Some(root) => re_anchor(original_url, root),
        None => original_url.to_string(),
    };

    Fingerprint {
        original_url: original_url.to_string(),
        fingerprinted_url: versioned_url(&anchored, hash),
    }
}

/// Resolve `url` against `new_root` the way a browser resolves a link against a base.
///
/// Absolute roots produce absolute URLs (`http://localhost` + `/app.css` gives
/// `http://localhost/app.css`). Path-only roots are resolved through a placeholder origin
/// that is dropped again afterwards.
pub fn re_anchor(url: &str, new_root: &str) -> String {
    if let Ok(base) = Url::parse(new_root) {
        return match base.join(url) {
            Ok(joined) => joined.to_string(),
            Err(_) => url.to_string(),
        };
    }

    static PLACEHOLDER: OnceLock<Url> = OnceLock::new();
    let placeholder =
        PLACEHOLDER.get_or_init(|| Url::parse("http://localhost/").expect("invalid placeholder base"));

    match placeholder.join(new_root).and_then(|root| root.join(url)) {
        Ok(joined) if joined.origin() == placeholder.origin() => joined[Position::BeforePath..].to_string(),
        Ok(joined) => joined.to_string(),
        Err(_) => url.to_string(),
    }
}

/// Merge `v=<hash>` into the query of `url`, leaving path and fragment untouched.
///
/// Existing query pieces are kept byte for byte and in order (escaped `&amp;` and value-less
/// keys included); only a previous `v` is dropped so the new one is never repeated.
pub fn versioned_url(url: &str, hash: &str) -> String {
    let (before_fragment, fragment) = match url.find('#') {
        Some(index) => url.split_at(index),
        None => (url, ""),
    };
    let (path, query) = match before_fragment.find('?') {
        Some(index) => (&before_fragment[..index], &before_fragment[index + 1..]),
        None => (before_fragment, ""),
    };

    let version = format!("{VERSION_PARAM}={hash}");
    let pieces: Vec<&str> = query
        .split('&')
        .filter(|piece| !piece.is_empty() && !is_version_piece(piece))
        .chain(std::iter::once(version.as_str()))
        .collect();

    format!("{path}?{}{fragment}", pieces.join("&"))
}

fn is_version_piece(piece: &str) -> bool {
    piece.split('=').next() == Some(VERSION_PARAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_version_to_plain_urls() {
        assert_eq!(versioned_url("/css/site.css", "abc123"), "/css/site.css?v=abc123");
    }

    #[test]
    fn merges_version_into_existing_query() {
        assert_eq!(
            versioned_url("/css/site.css?theme=dark&v=old", "abc123"),
            "/css/site.css?theme=dark&v=abc123"
        );
    }

    #[test]
    fn keeps_fragment_after_query() {
        assert_eq!(versioned_url("app.js#main", "abc123"), "app.js?v=abc123#main");
    }

    #[test]
    fn keeps_existing_query_pieces_verbatim() {
        assert_eq!(versioned_url("/a.css?x=1&amp;y=2", "h"), "/a.css?x=1&amp;y=2&v=h");
        assert_eq!(versioned_url("/a.css?flag&b=a%20b", "h"), "/a.css?flag&b=a%20b&v=h");
    }

    #[test]
    fn drops_value_less_version_keys() {
        assert_eq!(versioned_url("/a.css?v&x=1#top", "h"), "/a.css?x=1&v=h#top");
        assert_eq!(versioned_url("/a.css?", "h"), "/a.css?v=h");
    }

    #[test]
    fn re_anchors_on_absolute_roots() {
        assert_eq!(
            re_anchor("/test/existant.css", "http://localhost"),
            "http://localhost/test/existant.css"
        );
    }

    #[test]
    fn re_anchors_on_path_roots() {
        assert_eq!(re_anchor("app.js", "/static/"), "/static/app.js");
    }

    #[test]
    fn rewrite_ignores_empty_roots() {
        let fingerprint = rewrite("/a.css", "abc", Some(""));
        assert_eq!(fingerprint.original_url, "/a.css");
        assert_eq!(fingerprint.fingerprinted_url, "/a.css?v=abc");
    }

    #[test]
    fn rewrite_combines_root_and_version() {
        let fingerprint = rewrite("/test/existant.css", "abc", Some("http://localhost"));
        assert_eq!(
            fingerprint.fingerprinted_url,
            "http://localhost/test/existant.css?v=abc"
        );
    }
}
