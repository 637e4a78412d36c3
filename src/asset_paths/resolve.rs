use std::path::Path;
use std::sync::OnceLock;

use percent_encoding::percent_decode_str;
use url::Url;

use crate::models::{AssetReference, ResolvedAsset};

/// Strip query string and fragment from an asset URL, returning the decoded path.
///
/// Parsing goes through a placeholder origin so relative and root-relative references are
/// normalised the same way. Literal dot segments collapse during the join; escaped separators
/// are decoded as-is, so build filesystem paths with [`resolve`] instead.
pub fn strip_query_and_fragment(url: &str) -> String {
    match placeholder_base().join(url) {
        Ok(parsed) => percent_decode_str(parsed.path())
            .decode_utf8()
            .map(|path| path.into_owned())
            .unwrap_or_else(|_| parsed.path().to_string()),
        Err(_) => url.split(['?', '#']).next().unwrap_or(url).to_string(),
    }
}

/// Resolve a reference to the file it names under `asset_root`.
///
/// Root-relative URLs are joined under the root exactly like relative ones. Each path segment
/// is decoded on its own, and anything that only turns into a separator or a dot segment after
/// decoding is dropped.
pub fn resolve(reference: &AssetReference, asset_root: &Path) -> ResolvedAsset {
    let file_path = decoded_segments(&reference.raw_url)
        .into_iter()
        .fold(asset_root.to_path_buf(), |path, segment| path.join(segment));

    ResolvedAsset {
        reference: reference.clone(),
        file_path,
    }
}

fn decoded_segments(url: &str) -> Vec<String> {
    let decoded: Vec<String> = match placeholder_base().join(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| segments.map(decode_segment).collect())
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or(url)
            .split('/')
            .map(decode_segment)
            .collect(),
    };

    decoded
        .iter()
        .flat_map(|segment| segment.split(['/', '\\']))
        .filter(|segment| !matches!(*segment, "" | "." | ".."))
        .map(str::to_string)
        .collect()
}

fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn placeholder_base() -> &'static Url {
    static BASE: OnceLock<Url> = OnceLock::new();
    BASE.get_or_init(|| Url::parse("http://localhost/").expect("invalid placeholder base"))
}
