//! Storage layer for RecipeBox.
//!
//! This module provides the persistence layer:
//! - An async key-value adapter boundary ([`KeyValueStore`])
//! - A SQLite-backed adapter for on-device durability
//! - An in-memory adapter for tests and demos
//! - The cached [`RecipeStore`] with legacy layout migration
//!
//! # Key layout
//!
//! Every recipe lives under its own key, `recipe_<id>`. The legacy layout kept
//! the whole collection as one JSON array under `recipes`; it is migrated on
//! first hydration and then deleted. Legacy elements that fail to decode are
//! parked as raw JSON under `recipes_unmigrated` instead of being dropped.
//!
//! # Submodules
//!
//! - [`adapter`] - Adapter trait and the in-memory implementation
//! - [`migrations`] - Legacy single-key to per-record migration
//! - [`recipe_store`] - Cached record store
//! - [`schema`] - SQLite schema for the key-value table
//! - [`sqlite`] - SQLite adapter implementation

pub mod adapter;
pub mod migrations;
pub mod recipe_store;
pub mod schema;
pub mod sqlite;

pub use adapter::{KeyValueStore, MemoryStore, StoreStats};
pub use migrations::MigrationState;
pub use recipe_store::RecipeStore;
pub use sqlite::SqliteKvStore;

/// Prefix of every per-record key.
pub const RECIPE_KEY_PREFIX: &str = "recipe_";

/// Key holding the superseded whole-collection JSON array.
pub const LEGACY_RECIPES_KEY: &str = "recipes";

/// Key holding legacy elements that could not be migrated, as a JSON array.
pub const LEGACY_BACKUP_KEY: &str = "recipes_unmigrated";

/// Key holding the per-installation user id.
pub const USER_ID_KEY: &str = "user_id";

/// Storage key for a recipe id.
#[must_use]
pub fn recipe_key(id: &str) -> String {
    format!("{RECIPE_KEY_PREFIX}{id}")
}

/// Recipe id encoded in a per-record key, if `key` is one.
#[must_use]
pub fn recipe_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(RECIPE_KEY_PREFIX).filter(|id| !id.is_empty())
}
