//! StyleTable implementation
//!
//! HashMap-backed table with a sorted key cache. Not internally
//! synchronized; the engine wraps it in a RwLock.

use std::collections::{BTreeMap, HashMap};

use crate::error::{Result, StyleError};
use crate::style::{key_for, Style};

/// In-memory store of all styles
#[derive(Debug, Default)]
pub struct StyleTable {
    /// Normalized key → style
    styles: HashMap<String, Style>,

    /// Keys of `styles`, ascending
    keys: Vec<String>,

    /// Bumped by every mutation
    revision: u64,
}

impl StyleTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a style by name (any case)
    ///
    /// Returns `Ok(None)` if no style has that name.
    pub fn get(&self, name: &str) -> Result<Option<&Style>> {
        let key = key_for(name)?;
        Ok(self.styles.get(&key))
    }

    /// Add or replace a style, returning its key
    pub fn set(&mut self, style: Style) -> Result<String> {
        if style.style_name.is_empty() {
            return Err(StyleError::InvalidRecord(
                "The \"style\" argument is missing required property \"styleName\".".to_string(),
            ));
        }
        let key = key_for(&style.style_name)?;
        self.styles.insert(key.clone(), style);
        self.touch();
        Ok(key)
    }

    /// Remove a style, returning whether anything was removed
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        let key = key_for(name)?;
        if self.styles.remove(&key).is_some() {
            self.touch();
            return Ok(true);
        }
        Ok(false)
    }

    /// Rename an existing style
    ///
    /// Identical names (including two empty ones) are a no-op and return
    /// `Ok(None)`. Otherwise returns the new key.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<Option<String>> {
        if old_name == new_name {
            return Ok(None);
        }

        let old_key = key_for(old_name)?;
        let new_key = key_for(new_name)?;

        if !self.styles.contains_key(&old_key) {
            return Err(StyleError::NotFound(old_name.to_string()));
        }

        // Case-only rename keeps the same slot
        if old_key != new_key && self.styles.contains_key(&new_key) {
            return Err(StyleError::Conflict(new_name.to_string()));
        }

        if let Some(mut style) = self.styles.remove(&old_key) {
            style.style_name = new_name.to_string();
            self.styles.insert(new_key.clone(), style);
        }
        self.touch();

        Ok(Some(new_key))
    }

    /// Merge a batch of styles into the table
    ///
    /// Every style is validated before anything changes. With `replace`,
    /// existing styles are dropped first. Later duplicates in `styles` win.
    pub fn merge(&mut self, styles: Vec<Style>, replace: bool) -> Result<()> {
        if styles.iter().any(|s| s.style_name.is_empty()) {
            return Err(StyleError::InvalidRecord(
                "One or more styles are invalid.".to_string(),
            ));
        }

        if replace {
            self.styles.clear();
        }
        for style in styles {
            let key = key_for(&style.style_name)?;
            self.styles.insert(key, style);
        }
        self.touch();

        Ok(())
    }

    /// Remove all styles
    pub fn clear(&mut self) {
        if !self.styles.is_empty() {
            self.styles.clear();
            self.touch();
        }
    }

    /// All styles in ascending key order
    pub fn list(&self) -> Vec<&Style> {
        self.keys
            .iter()
            .filter_map(|key| self.styles.get(key))
            .collect()
    }

    /// Legacy export format: key → style
    pub fn export_map(&self) -> BTreeMap<String, Style> {
        self.styles
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Sorted keys
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Current revision (dirty marker)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Rebuild sorted keys and advance the revision
    fn touch(&mut self) {
        let mut keys: Vec<String> = self.styles.keys().cloned().collect();
        keys.sort();
        self.keys = keys;
        self.revision += 1;
    }
}
