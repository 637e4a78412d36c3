//! Project configuration loader for cache-busting runs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::CacheBustError;
use crate::options::PipelineOptions;

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cachebust.config.json";

/// Discoverable configuration describing where assets live and where output goes.
///
/// `replaceAssetRoot` and `eventListeners` are kept untyped until
/// [`CacheBustConfig::pipeline_options`] validates them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheBustConfig {
    /// Directory against which asset URLs are resolved.
    pub asset_root: Option<String>,
    /// Directory receiving rewritten documents instead of overwriting the inputs.
    pub output: Option<String>,
    /// Root replacing the original one in rewritten URLs.
    pub replace_asset_root: Value,
    /// Listener configuration; only `null` values are accepted for `info`.
    pub event_listeners: Value,
}

impl CacheBustConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// A missing or unparsable file yields the defaults.
    pub fn discover(dir: &Path) -> Self {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if !candidate.exists() {
            return Self::default();
        }
        Self::from_path(&candidate).unwrap_or_else(|| {
            warn!(path = %candidate.display(), "ignoring unreadable configuration file");
            Self::default()
        })
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Asset root relative to `base`, if configured.
    pub fn asset_root_path(&self, base: &Path) -> Option<PathBuf> {
        self
            .asset_root
            .as_deref()
            .filter(|root| !root.trim().is_empty())
            .map(|root| base.join(root.trim()))
    }

    /// Validate the untyped sections and convert them into [`PipelineOptions`].
    pub fn pipeline_options(&self) -> Result<PipelineOptions, CacheBustError> {
        let mut raw = Map::new();
        raw.insert("replaceAssetRoot".into(), self.replace_asset_root.clone());
        raw.insert("eventListeners".into(), self.event_listeners.clone());
        PipelineOptions::from_value(&Value::Object(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn falls_back_to_defaults_without_file() {
        let dir = tempdir().unwrap();
        let config = CacheBustConfig::discover(dir.path());
        assert!(config.asset_root.is_none());
        assert!(config.pipeline_options().unwrap().replace_root().is_none());
    }

    #[test]
    fn falls_back_to_defaults_for_invalid_json() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
        let config = CacheBustConfig::discover(dir.path());
        assert!(config.output.is_none());
    }

    #[test]
    fn reads_camel_case_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(DEFAULT_CONFIG_FILE),
            r#"{ "assetRoot": "public", "output": "dist", "replaceAssetRoot": "https://cdn.example.com" }"#,
        )
        .unwrap();

        let config = CacheBustConfig::discover(dir.path());
        assert_eq!(config.asset_root_path(dir.path()), Some(dir.path().join("public")));
        assert_eq!(config.output.as_deref(), Some("dist"));
        assert_eq!(
            config.pipeline_options().unwrap().replace_root(),
            Some("https://cdn.example.com")
        );
    }

    #[test]
    fn ignores_non_string_replacement_root() {
        let config: CacheBustConfig =
            serde_json::from_str(r#"{ "replaceAssetRoot": ["http://localhost"] }"#).unwrap();
        assert!(config.pipeline_options().unwrap().replace_root().is_none());
    }

    #[test]
    fn rejects_info_listener_values() {
        let config: CacheBustConfig =
            serde_json::from_str(r#"{ "eventListeners": { "info": 1 } }"#).unwrap();
        assert!(matches!(
            config.pipeline_options(),
            Err(CacheBustError::Configuration(_))
        ));
    }
}
