//! Data structures produced while cache busting a single document.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// Opt-in attribute a tag must carry before its URL is fingerprinted.
pub const FINGERPRINT_MARKER: &str = "data-finger-print";

/// Kind of tag an asset reference was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TagKind {
    /// `<link href="...">`, typically a stylesheet.
    Link,
    /// `<script src="...">`.
    Script,
}

impl TagKind {
    /// Map a tag name onto a recognised kind, ignoring ASCII case.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("link") {
            Some(Self::Link)
        } else if name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else {
            None
        }
    }

    /// Attribute holding the asset URL for this kind of tag.
    pub fn url_attribute(self) -> &'static str {
        match self {
            Self::Link => "href",
            Self::Script => "src",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Link => f.write_str("link"),
            Self::Script => f.write_str("script"),
        }
    }
}

/// Asset URL collected from an opted-in tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetReference {
    /// Attribute value exactly as written in the markup.
    pub raw_url: String,
    /// Tag the value came from.
    pub tag_kind: TagKind,
}

impl AssetReference {
    /// Build a reference for the given kind.
    pub fn new(raw_url: impl Into<String>, tag_kind: TagKind) -> Self {
        Self {
            raw_url: raw_url.into(),
            tag_kind,
        }
    }
}

/// Reference paired with the file it resolves to under the asset root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Reference the path was derived from.
    pub reference: AssetReference,
    /// Root-joined path with query and fragment removed.
    pub file_path: PathBuf,
}

/// Substitution pair for one successfully fingerprinted asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fingerprint {
    /// Fragment as it appears in the source document.
    pub original_url: String,
    /// Replacement carrying the `v` query parameter.
    pub fingerprinted_url: String,
}
