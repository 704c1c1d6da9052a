//! Engine Module
//!
//! Couples the in-memory style table with its backing file.
//!
//! ## Responsibilities
//! - Serve table operations behind a RwLock
//! - Load `styles.json` on `init`
//! - Save periodically from a background thread
//! - Final save on `flush`
//!
//! ## Lifecycle
//! ```text
//! new ──▶ init (load) ──▶ idle ◀──▶ saving ──▶ flush (stopped)
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use serde_json::Value;

use crate::codec;
use crate::config::Config;
use crate::error::{Result, StyleError};
use crate::saver::Saver;
use crate::style::Style;
use crate::table::StyleTable;

/// State shared with the background saver
struct Shared {
    /// Fully qualified backing file path
    path: PathBuf,

    /// The styles
    table: RwLock<StyleTable>,

    /// Revision last written (or deliberately skipped). Held for the whole
    /// save so two saves never interleave.
    saved: Mutex<u64>,

    /// Runs between encoding a snapshot and writing it
    #[cfg(test)]
    before_write: Mutex<Option<WriteHook>>,
}

#[cfg(test)]
type WriteHook = Box<dyn Fn(&RwLock<StyleTable>) + Send + Sync>;

/// The style store engine
///
/// ## Concurrency Model
///
/// - Table operations take the table lock for their whole duration, so
///   mutations never interleave.
/// - `save` snapshots `(revision, styles)` under a read lock and writes with
///   the lock released. Mutations made during the write bump the revision
///   past the captured one, so the follow-up pass picks them up.
/// - Lock order is always `saved` → `table`.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Table + persistence state
    shared: Arc<Shared>,

    /// Running background saver, if any
    saver: Mutex<Option<Saver>>,
}

impl Engine {
    /// Backing file name inside the data directory
    const STYLES_FILENAME: &'static str = "styles.json";

    /// Create an engine with an empty table. No I/O.
    pub fn new(config: Config) -> Self {
        let path = config.data_dir.join(Self::STYLES_FILENAME);
        Self {
            config,
            shared: Arc::new(Shared {
                path,
                table: RwLock::new(StyleTable::new()),
                saved: Mutex::new(0),
                #[cfg(test)]
                before_write: Mutex::new(None),
            }),
            saver: Mutex::new(None),
        }
    }

    /// Create an engine and `init` it with the configured save interval
    pub fn open(config: Config) -> Self {
        let save_seconds = config.save_seconds;
        let engine = Self::new(config);
        engine.init(save_seconds);
        engine
    }

    /// Open with a data directory and no background saving
    pub fn open_path(path: &Path) -> Self {
        let config = Config::builder().data_dir(path).save_seconds(0).build();
        Self::open(config)
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load styles from disk and start the background saver
    ///
    /// A missing or unreadable file leaves the table empty. Either way the
    /// loaded state counts as saved, so a bad file is only overwritten once
    /// something changes. `interval_seconds == 0` disables background saves.
    pub fn init(&self, interval_seconds: u64) {
        self.stop_saver();

        {
            let mut saved = self.shared.saved.lock();
            let mut table = self.shared.table.write();
            let path = &self.shared.path;

            table.clear();
            match self.shared.load() {
                Ok(styles) => match table.merge(styles, false) {
                    Ok(()) => {
                        tracing::info!("Loaded {} styles from {}", table.len(), path.display())
                    }
                    Err(e) => tracing::warn!("Failed to read \"{}\": {}", path.display(), e),
                },
                Err(StyleError::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
                    tracing::info!("No saved styles at {}, starting empty", path.display());
                }
                Err(e) => tracing::warn!("Failed to read \"{}\": {}", path.display(), e),
            }

            *saved = table.revision();
        }

        if interval_seconds > 0 {
            let shared = Arc::clone(&self.shared);
            match Saver::spawn(Duration::from_secs(interval_seconds), move || shared.save()) {
                Ok(saver) => {
                    tracing::debug!("Saving every {}s", interval_seconds);
                    *self.saver.lock() = Some(saver);
                }
                Err(e) => tracing::error!("Failed to start background saver: {}", e),
            }
        }
    }

    /// Stop background saving, then save once
    pub fn flush(&self) {
        self.stop_saver();
        self.shared.save();
    }

    /// Save to disk if anything changed since the last save
    ///
    /// Write failures are logged, not returned.
    pub fn save(&self) {
        self.shared.save();
    }

    /// Flush and shut down
    pub fn close(self) {
        self.flush();
    }

    /// Whether a background saver is running
    pub fn is_saving_scheduled(&self) -> bool {
        self.saver.lock().is_some()
    }

    fn stop_saver(&self) {
        let saver = self.saver.lock().take();
        if let Some(saver) = saver {
            saver.stop();
        }
    }

    // =========================================================================
    // Table Operations
    // =========================================================================

    /// Get a style by name (any case)
    pub fn get(&self, name: &str) -> Result<Option<Style>> {
        Ok(self.shared.table.read().get(name)?.cloned())
    }

    /// Add or replace a style, returning its key
    pub fn set(&self, style: Style) -> Result<String> {
        self.shared.table.write().set(style)
    }

    /// Add or replace a style given as raw JSON
    pub fn set_value(&self, value: Value) -> Result<String> {
        let style = codec::style_from_value(value)?;
        self.set(style)
    }

    /// Remove a style, returning whether it existed
    pub fn delete(&self, name: &str) -> Result<bool> {
        self.shared.table.write().delete(name)
    }

    /// Rename a style; `Ok(None)` when the names are identical
    pub fn rename(&self, old_name: &str, new_name: &str) -> Result<Option<String>> {
        self.shared.table.write().rename(old_name, new_name)
    }

    /// Merge a validated batch of styles
    pub fn merge(&self, styles: Vec<Style>, replace: bool) -> Result<()> {
        self.shared.table.write().merge(styles, replace)
    }

    /// Merge a raw JSON payload (array or legacy key map)
    pub fn import(&self, value: Value, replace: bool) -> Result<()> {
        let styles = codec::styles_from_value(value)?;
        self.merge(styles, replace)
    }

    /// Remove all styles
    pub fn clear(&self) {
        self.shared.table.write().clear();
    }

    /// All styles in ascending key order
    pub fn list(&self) -> Vec<Style> {
        self.shared.table.read().list().into_iter().cloned().collect()
    }

    /// Legacy export format: key → style
    pub fn export_map(&self) -> std::collections::BTreeMap<String, Style> {
        self.shared.table.read().export_map()
    }

    /// Number of styles
    pub fn len(&self) -> usize {
        self.shared.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.table.read().is_empty()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Current table revision
    pub fn revision(&self) -> u64 {
        self.shared.table.read().revision()
    }

    /// Revision last written to disk
    pub fn saved_revision(&self) -> u64 {
        *self.shared.saved.lock()
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop_saver();
    }
}

impl Shared {
    /// Read and decode the backing file
    fn load(&self) -> Result<Vec<Style>> {
        let bytes = fs::read(&self.path)?;
        codec::decode(&bytes)
    }

    /// Write snapshots until the file matches the current revision
    ///
    /// A failed write still marks the captured revision as saved; the next
    /// attempt waits for another mutation.
    fn save(&self) {
        let mut saved = self.saved.lock();

        loop {
            let (revision, styles) = {
                let table = self.table.read();
                if table.revision() == *saved {
                    return;
                }
                let styles: Vec<Style> = table.list().into_iter().cloned().collect();
                (table.revision(), styles)
            };

            match self.write(&styles) {
                Ok(()) => {
                    tracing::debug!(
                        "Saved {} styles to {} (revision {})",
                        styles.len(),
                        self.path.display(),
                        revision
                    );
                    *saved = revision;
                }
                Err(e) => {
                    tracing::error!("Failed to write \"{}\": {}", self.path.display(), e);
                    *saved = revision;
                    return;
                }
            }
        }
    }

    /// Replace the backing file with `styles`
    ///
    /// Writes a sibling `.tmp` file and renames it over the target, so the
    /// backing file is either the old contents or the new, never partial.
    fn write(&self, styles: &[Style]) -> Result<()> {
        let bytes = codec::encode(styles)?;
        self.run_before_write();

        let temp_path = self.path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            fs::write(&temp_path, &bytes)?;
            fs::rename(&temp_path, &self.path)?;
            Ok(())
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }

    #[cfg(test)]
    fn run_before_write(&self) {
        if let Some(hook) = self.before_write.lock().as_ref() {
            hook(&self.table);
        }
    }

    #[cfg(not(test))]
    fn run_before_write(&self) {}
}
