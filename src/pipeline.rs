//! Pipeline orchestrating scan, resolve, read, fingerprint and substitution for one document.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::debug;

use crate::asset_paths::{is_external_reference, resolve};
use crate::error::{AssetError, CacheBustError};
use crate::fingerprint::fingerprint;
use crate::models::{AssetReference, Fingerprint};
use crate::options::PipelineOptions;
use crate::scanner::scan;
use crate::substitute::apply;

/// Message reported when the asset root is missing.
const MISSING_ASSET_ROOT: &str = "The asset root cannot be null or undefined";

/// Source of asset bytes consulted once per resolved reference.
#[async_trait]
pub trait AssetReader: Send + Sync {
    /// Read the complete contents of `path`.
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// [`AssetReader`] backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetReader;

#[async_trait]
impl AssetReader for FsAssetReader {
    async fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Fingerprint every opted-in asset reference in `html`, reading assets from disk.
///
/// Returns `Ok(None)` for `None` input. Assets that cannot be read are left untouched; only a
/// missing asset root or a tokenizer failure fails the call.
pub async fn cache_bust(
    html: Option<&str>,
    asset_root: Option<&Path>,
    options: &PipelineOptions,
) -> Result<Option<String>, CacheBustError> {
    cache_bust_with_reader(html, asset_root, options, &FsAssetReader).await
}

/// Same as [`cache_bust`] with an explicit [`AssetReader`].
pub async fn cache_bust_with_reader<R>(
    html: Option<&str>,
    asset_root: Option<&Path>,
    options: &PipelineOptions,
    reader: &R,
) -> Result<Option<String>, CacheBustError>
where
    R: AssetReader + ?Sized,
{
    let asset_root = asset_root
        .filter(|root| !root.as_os_str().is_empty())
        .ok_or_else(|| CacheBustError::configuration(MISSING_ASSET_ROOT))?;

    let Some(html) = html else {
        return Ok(None);
    };

    let references = scan(html)?;
    if references.is_empty() {
        return Ok(Some(html.to_string()));
    }

    let replace_root = options.replace_root();
    let outcomes = join_all(
        references
            .iter()
            .map(|reference| fingerprint_reference(reference, asset_root, replace_root, reader)),
    )
    .await;

    let substitutions: Vec<Fingerprint> = outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            Ok(fingerprint) => Some(fingerprint),
            Err(err @ AssetError::External { .. }) => {
                debug!(%err, "leaving external asset untouched");
                None
            }
            Err(err) => {
                debug!(%err, "skipping asset");
                options.event_listeners.info(&err.notice());
                None
            }
        })
        .collect();

    debug!(
        references = references.len(),
        fingerprinted = substitutions.len(),
        "cache busted document"
    );
    Ok(Some(apply(html, &substitutions)))
}

async fn fingerprint_reference<R>(
    reference: &AssetReference,
    asset_root: &Path,
    replace_root: Option<&str>,
    reader: &R,
) -> Result<Fingerprint, AssetError>
where
    R: AssetReader + ?Sized,
{
    if is_external_reference(&reference.raw_url) {
        return Err(AssetError::External {
            url: reference.raw_url.clone(),
        });
    }

    let resolved = resolve(reference, asset_root);
    debug!(url = %reference.raw_url, kind = %reference.tag_kind, path = %resolved.file_path.display(), "reading asset");

    let contents = reader
        .read(&resolved.file_path)
        .await
        .map_err(|source| AssetError::from_io(&reference.raw_url, resolved.file_path.clone(), source))?;

    Ok(fingerprint(&reference.raw_url, &contents, replace_root))
}
