//! Options controlling how a document is cache busted.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CacheBustError;

/// Callback receiving informational, non-fatal notices.
pub type InfoListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Optional listeners notified while the pipeline runs.
#[derive(Clone, Default)]
pub struct EventListeners {
    info: Option<InfoListener>,
}

impl EventListeners {
    /// Listeners with only an `info` callback installed.
    pub fn with_info(listener: impl Fn(&str) + Send + Sync + 'static) -> Self {
        Self {
            info: Some(Arc::new(listener)),
        }
    }

    /// Forward a notice to the `info` listener, if any.
    pub fn info(&self, message: &str) {
        if let Some(listener) = &self.info {
            listener(message);
        }
    }

    /// Returns `true` when an `info` listener is installed.
    pub fn has_info(&self) -> bool {
        self.info.is_some()
    }

    /// Validate listeners supplied through untyped configuration.
    ///
    /// Configuration documents cannot carry callables, so any non-null value under `info` is a
    /// misconfiguration and is rejected up front.
    pub fn from_value(value: &Value) -> Result<Self, CacheBustError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => match map.get("info") {
                None | Some(Value::Null) => Ok(Self::default()),
                Some(other) => Err(CacheBustError::configuration(format!(
                    "eventListeners.info must be a function, found {}",
                    json_type_name(other)
                ))),
            },
            other => Err(CacheBustError::configuration(format!(
                "eventListeners must be an object, found {}",
                json_type_name(other)
            ))),
        }
    }
}

impl fmt::Debug for EventListeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("info", &self.info.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Per-call configuration for [`crate::cache_bust`].
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Root that replaces the original one in rewritten URLs, e.g. `https://cdn.example.com`.
    pub replace_asset_root: Option<String>,
    /// Listeners notified about skipped assets.
    pub event_listeners: EventListeners,
}

impl PipelineOptions {
    /// Options with no root replacement and no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-anchor rewritten URLs on `root`.
    pub fn with_replace_asset_root(mut self, root: impl Into<String>) -> Self {
        self.replace_asset_root = Some(root.into());
        self
    }

    /// Install an `info` listener.
    pub fn with_info_listener(mut self, listener: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.event_listeners = EventListeners::with_info(listener);
        self
    }

    /// Build options from an untyped JSON object using the `replaceAssetRoot` and
    /// `eventListeners` keys.
    ///
    /// A `replaceAssetRoot` that is not a string is ignored.
    pub fn from_value(value: &Value) -> Result<Self, CacheBustError> {
        let replace_asset_root = value
            .get("replaceAssetRoot")
            .and_then(Value::as_str)
            .map(str::to_string);
        let event_listeners = value
            .get("eventListeners")
            .map(EventListeners::from_value)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            replace_asset_root,
            event_listeners,
        })
    }

    /// Replacement root when one is configured and non-empty.
    pub fn replace_root(&self) -> Option<&str> {
        self
            .replace_asset_root
            .as_deref()
            .filter(|root| !root.is_empty())
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
