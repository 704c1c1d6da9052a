//! # stylestore
//!
//! A case-insensitive store of named styles with:
//! - Lookups, upserts, renames and bulk imports keyed by lowercased name
//! - Deterministic listing in ascending key order
//! - Periodic background saves to a single JSON file
//! - A final flush on shutdown
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Collaborators (HTTP, CLI)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │           (init / flush / background saver)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ StyleTable  │          │    Codec    │
//!   │  (RwLock)   │          │   (JSON)    │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │ styles.json │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod style;
pub mod table;
pub mod codec;
pub mod saver;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StyleError, Result};
pub use config::Config;
pub use engine::Engine;
pub use style::{key_for, Style};
pub use table::StyleTable;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of stylestore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
