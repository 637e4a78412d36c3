//! Error types surfaced by the cache-busting pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a whole [`crate::cache_bust`] call.
#[derive(Debug, Error)]
pub enum CacheBustError {
    /// The pipeline was configured incorrectly (missing asset root, malformed listeners).
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The HTML tokenizer could not process the document at all.
    #[error("failed to tokenize html: {0}")]
    Parse(String),
}

impl CacheBustError {
    /// Shorthand for building a [`CacheBustError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Failure confined to a single asset reference.
///
/// These never leave the pipeline; they only decide that a reference contributes no
/// substitution.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The reference points at another host or an inline data URI.
    #[error("'{url}' is not a local asset")]
    External {
        /// Raw attribute value.
        url: String,
    },
    /// Nothing exists at the resolved path.
    #[error("'{name}' could not be found at {}", .path.display())]
    NotFound {
        /// Raw attribute value.
        name: String,
        /// Path searched on disk.
        path: PathBuf,
    },
    /// The file exists but reading it failed.
    #[error("failed to read '{name}' at {}: {source}", .path.display())]
    Unreadable {
        /// Raw attribute value.
        name: String,
        /// Path searched on disk.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl AssetError {
    /// Classify an I/O failure for the given reference.
    pub fn from_io(name: &str, path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                name: name.to_string(),
                path,
            }
        } else {
            Self::Unreadable {
                name: name.to_string(),
                path,
                source,
            }
        }
    }

    /// Human readable notice forwarded to the `info` listener.
    pub fn notice(&self) -> String {
        match self {
            Self::External { url } => {
                format!("Skipping matched asset '{url}' because it is not a local file.")
            }
            Self::NotFound { name, path } | Self::Unreadable { name, path, .. } => format!(
                "Skipping matched asset '{}' because it could not be found. Path searched: {}",
                name,
                path.display()
            ),
        }
    }
}
