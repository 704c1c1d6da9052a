//! Style record
//!
//! A style has exactly one field the store cares about, its display name
//! (`styleName` on the wire). Everything else is opaque passthrough data.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StyleError};

/// A named style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Display name. Lowercased, it is the uniqueness key.
    #[serde(rename = "styleName", default)]
    pub style_name: String,

    /// All other fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Style {
    /// Create a style with no extra fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            style_name: name.into(),
            extra: Map::new(),
        }
    }

    /// Attach an extra field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Get an extra field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Normalized key for this style
    pub fn key(&self) -> Result<String> {
        key_for(&self.style_name)
    }
}

/// Convert a human readable name into its case-insensitive key
///
/// Fails with `ArgumentMissing` if the name is empty.
pub fn key_for(name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(StyleError::ArgumentMissing("styleName"));
    }
    Ok(name.to_lowercase())
}
