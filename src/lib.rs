#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod options;
pub mod pipeline;
pub mod rewrite;
pub mod scanner;
pub mod substitute;

pub use error::{AssetError, CacheBustError};
pub use models::{AssetReference, FINGERPRINT_MARKER, Fingerprint, ResolvedAsset, TagKind};
pub use options::{EventListeners, InfoListener, PipelineOptions};
pub use pipeline::{AssetReader, FsAssetReader, cache_bust, cache_bust_with_reader};
