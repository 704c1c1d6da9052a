//! Codec Module
//!
//! Encoding and decoding of styles.
//!
//! ## File Format
//! The backing file is a JSON array of style objects, pretty-printed with
//! two-space indentation:
//! ```text
//! [
//!   {
//!     "styleName": "Heading 1",
//!     "mode": 1,
//!     ...
//!   },
//!   ...
//! ]
//! ```
//!
//! ## Untyped Payloads
//! Collaborators that receive raw JSON (HTTP bodies, CLI arguments) go
//! through [`style_from_value`] and [`styles_from_value`] so that absent
//! and malformed input map onto the store's error taxonomy.

use serde_json::Value;

use crate::error::{Result, StyleError};
use crate::style::Style;

/// Encode styles for the backing file
pub fn encode(styles: &[Style]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec_pretty(styles)?)
}

/// Decode the backing file
///
/// Fails with `Serialization` unless the payload is an array of objects.
pub fn decode(bytes: &[u8]) -> Result<Vec<Style>> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Convert one untyped record into a style
///
/// `null` is a missing argument; anything that is not an object with a
/// string `styleName` (when present) is an invalid record. An empty name is
/// left for the table to reject.
pub fn style_from_value(value: Value) -> Result<Style> {
    match value {
        Value::Null => Err(StyleError::ArgumentMissing("style")),
        Value::Object(_) => serde_json::from_value(value)
            .map_err(|e| StyleError::InvalidRecord(format!("The \"style\" argument is invalid: {}", e))),
        _ => Err(StyleError::InvalidRecord(
            "The \"style\" argument must be an object.".to_string(),
        )),
    }
}

/// Convert an untyped bulk import payload into styles
///
/// Accepts an array of styles, or the legacy `{ key: style }` map. Map
/// entries keep their payload order, so later duplicates still win.
pub fn styles_from_value(value: Value) -> Result<Vec<Style>> {
    let items = match value {
        Value::Null => return Err(StyleError::ArgumentMissing("styles")),
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => return Err(invalid_batch()),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value::<Style>(item).map_err(|_| invalid_batch()),
            _ => Err(invalid_batch()),
        })
        .collect()
}

fn invalid_batch() -> StyleError {
    StyleError::InvalidRecord("One or more styles are invalid.".to_string())
}
