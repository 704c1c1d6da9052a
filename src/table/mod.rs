//! Table Module
//!
//! In-memory collection of styles keyed by normalized name.
//!
//! ## Responsibilities
//! - Case-insensitive lookups, inserts, deletes and renames
//! - All-or-nothing bulk merge
//! - Deterministic (ascending key) listing
//! - Revision counter for dirty tracking by the engine
//!
//! ## Data Structure Choice
//! HashMap for the records plus a cached sorted key vector:
//! - Lookups by key stay O(1)
//! - `list()` is a walk over the cached keys, no sort per read
//! - Mutations re-sort, which is fine for small collections

mod styles;

pub use styles::StyleTable;
