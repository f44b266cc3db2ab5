//! Legacy layout migration.
//!
//! The earlier application kept the entire collection as one JSON array
//! under [`LEGACY_RECIPES_KEY`]. The first hydration splits that array into
//! per-record keys and then removes the legacy key.
//!
//! The pass is idempotent. Writing the per-record keys twice is harmless,
//! and the legacy key is only removed after the batch write succeeded, so an
//! interrupted run is simply repeated on the next hydration.
//!
//! Elements are decoded one at a time. An element that is not a valid recipe
//! is skipped and its raw JSON is appended to [`LEGACY_BACKUP_KEY`] in the
//! same batch as the migrated records, so nothing from the blob is lost.

use crate::error::Result;
use crate::model::Recipe;
use crate::storage::adapter::KeyValueStore;
use crate::storage::{LEGACY_BACKUP_KEY, LEGACY_RECIPES_KEY, recipe_key};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Where the store is in the one-time layout migration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationState {
    /// No hydration has checked for the legacy key yet, or the last attempt failed.
    #[default]
    Unmigrated,
    /// A hydration pass is migrating right now.
    Migrating,
    /// The legacy key is gone (or never existed).
    Migrated,
}

impl MigrationState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unmigrated => "unmigrated",
            Self::Migrating => "migrating",
            Self::Migrated => "migrated",
        }
    }
}

/// Migrate the legacy collection blob, if present.
///
/// Returns `Ok(None)` when there is no legacy key, otherwise the decoded
/// (id-deduplicated) collection that is now stored per record. Elements that
/// do not decode are left out of the result and kept under
/// [`LEGACY_BACKUP_KEY`].
///
/// # Errors
///
/// Returns `Error::Json` if the blob is not a JSON array (the legacy key is
/// left in place) and any adapter error from the reads, batch write or
/// removal.
pub async fn migrate_legacy<S: KeyValueStore>(storage: &S) -> Result<Option<Vec<Recipe>>> {
    let Some(blob) = storage.get(LEGACY_RECIPES_KEY).await? else {
        debug!("No legacy recipe collection present");
        return Ok(None);
    };

    let (recipes, skipped) = decode_elements(serde_json::from_str::<Vec<Value>>(&blob)?);
    let recipes = dedupe_by_id(recipes);
    let mut pairs = encode_pairs(&recipes)?;

    info!(
        count = recipes.len(),
        skipped = skipped.len(),
        "Migrating legacy recipe collection"
    );
    if !skipped.is_empty() {
        let backup = merge_backup(storage.get(LEGACY_BACKUP_KEY).await?, skipped)?;
        pairs.push((LEGACY_BACKUP_KEY.to_string(), backup));
    }
    if !pairs.is_empty() {
        storage.multi_set(&pairs).await?;
    }
    storage
        .multi_remove(&[LEGACY_RECIPES_KEY.to_string()])
        .await?;
    info!(count = recipes.len(), "Legacy recipe collection migrated");

    Ok(Some(recipes))
}

/// Split legacy elements into decoded recipes and the raw values that failed.
fn decode_elements(elements: Vec<Value>) -> (Vec<Recipe>, Vec<Value>) {
    let mut recipes = Vec::with_capacity(elements.len());
    let mut skipped = Vec::new();

    for (index, element) in elements.into_iter().enumerate() {
        match serde_json::from_value::<Recipe>(element.clone()) {
            Ok(recipe) => recipes.push(recipe),
            Err(e) => {
                let id = element.get("id").and_then(Value::as_str).unwrap_or("?");
                warn!(index, id, error = %e, "Skipping undecodable legacy recipe");
                skipped.push(element);
            }
        }
    }

    (recipes, skipped)
}

/// Append `skipped` to whatever an earlier run left in the backup key.
///
/// A backup that is not an array is kept as one element rather than dropped.
fn merge_backup(existing: Option<String>, skipped: Vec<Value>) -> Result<String> {
    let mut all = match existing {
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(other) => vec![other],
            Err(_) => vec![Value::String(raw)],
        },
        None => Vec::new(),
    };
    all.extend(skipped);
    Ok(serde_json::to_string(&all)?)
}

/// Encode recipes as `(per-record key, JSON)` pairs for a batch write.
///
/// # Errors
///
/// Returns `Error::Json` if a recipe fails to serialize.
pub fn encode_pairs(recipes: &[Recipe]) -> Result<Vec<(String, String)>> {
    recipes
        .iter()
        .map(|r| Ok((recipe_key(&r.id), serde_json::to_string(r)?)))
        .collect()
}

/// Collapse repeated ids, keeping the first position and the last value.
#[must_use]
pub fn dedupe_by_id(recipes: Vec<Recipe>) -> Vec<Recipe> {
    let mut index: HashMap<String, usize> = HashMap::with_capacity(recipes.len());
    let mut out: Vec<Recipe> = Vec::with_capacity(recipes.len());

    for recipe in recipes {
        if let Some(&pos) = index.get(&recipe.id) {
            out[pos] = recipe;
        } else {
            index.insert(recipe.id.clone(), out.len());
            out.push(recipe);
        }
    }

    out
}
