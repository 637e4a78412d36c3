//! Locate opted-in asset references inside an HTML document.

use tl::{Node, NodeHandle, ParserOptions};
use tracing::trace;

use crate::error::CacheBustError;
use crate::models::{AssetReference, FINGERPRINT_MARKER, TagKind};

const RAW_TEXT_ELEMENTS: [&str; 3] = ["script", "style", "textarea"];

/// Collect the asset URLs of every `link`/`script` tag carrying the opt-in marker.
///
/// References are returned in document order and may repeat. Tags whose URL attribute is
/// missing or empty are skipped without error. Only a hard tokenizer failure is reported.
pub fn scan(html: &str) -> Result<Vec<AssetReference>, CacheBustError> {
    if html.is_empty() {
        return Ok(Vec::new());
    }

    let dom = tl::parse(html, ParserOptions::default())
        .map_err(|err| CacheBustError::Parse(format!("{err:?}")))?;

    let parser = dom.parser();
    let mut references = Vec::new();
    let mut pending: Vec<NodeHandle> = dom.children().iter().rev().copied().collect();

    while let Some(handle) = pending.pop() {
        let Some(Node::Tag(tag)) = handle.get(parser) else {
            continue;
        };

        let name = tag.name().as_utf8_str();
        if let Some(kind) = TagKind::from_tag_name(&name) {
            if let Some(url) = extract_marked_url(tag.attributes().iter(), kind) {
                references.push(AssetReference::new(url, kind));
            }
        }

        if is_raw_text_element(&name) {
            continue;
        }
        let children: Vec<NodeHandle> = tag.children().top().iter().copied().collect();
        pending.extend(children.into_iter().rev());
    }

    trace!(count = references.len(), "scanned html for marked assets");
    Ok(references)
}

/// Elements whose body is text, even when it looks like markup.
fn is_raw_text_element(name: &str) -> bool {
    RAW_TEXT_ELEMENTS
        .iter()
        .any(|element| name.eq_ignore_ascii_case(element))
}

/// Return the kind-specific URL when the attribute list carries the opt-in marker.
fn extract_marked_url<K, V>(
    attributes: impl Iterator<Item = (K, Option<V>)>,
    kind: TagKind,
) -> Option<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let url_attribute = kind.url_attribute();
    let mut marked = false;
    let mut url = None;

    for (key, value) in attributes {
        let key = key.as_ref();
        if key.eq_ignore_ascii_case(FINGERPRINT_MARKER) {
            marked = true;
        } else if url.is_none() && key.eq_ignore_ascii_case(url_attribute) {
            url = value.map(|value| value.as_ref().to_string());
        }
    }

    if !marked {
        return None;
    }
    url.filter(|value| !value.is_empty())
}
