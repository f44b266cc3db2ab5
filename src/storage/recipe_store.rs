//! Cached recipe store.
//!
//! [`RecipeStore`] owns the mapping from recipe id to its per-record key, the
//! in-memory cache and the version counter. It is built for a single-threaded
//! cooperative caller: operations take `&self`, may interleave at storage
//! calls, and never hold the cache lock across an await.
//!
//! # Cache contract
//!
//! - Reads hydrate the cache on first use (running the legacy migration if
//!   needed) and then serve from memory.
//! - Concurrent first readers wait on a hydration gate and reuse the result
//!   of whichever pass finished first.
//! - A hydration whose snapshot went stale while it was suspended (because
//!   `seed_all` or `reset_cache` ran) never overwrites the cache.
//!
//! # Write policy
//!
//! Writes update the cache first and persist the touched keys afterwards.
//! If persisting fails the error is returned and the cache stays ahead of
//! durable storage until a later successful write.
//!
//! `save` is the one write that does not need the collection: when hydration
//! fails it still writes the new key and leaves the cache unhydrated.
//! `update` and `delete` propagate the hydration error.

use crate::error::Result;
use crate::identity::IdentityProvider;
use crate::model::{Ingredient, Recipe, RecipeInput, RecipePatch};
use crate::query::calculate_total_time;
use crate::storage::adapter::KeyValueStore;
use crate::storage::migrations::{MigrationState, dedupe_by_id, encode_pairs, migrate_legacy};
use crate::storage::{LEGACY_RECIPES_KEY, recipe_id_from_key, recipe_key};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Immutable view of the cached collection.
pub type RecipeSnapshot = Arc<Vec<Recipe>>;

#[derive(Debug, Default)]
struct CacheState {
    recipes: Option<RecipeSnapshot>,
    /// Bumped whenever the cache is replaced or dropped wholesale.
    generation: u64,
    migration: MigrationState,
}

/// Cached, durable recipe collection over a [`KeyValueStore`].
#[derive(Debug)]
pub struct RecipeStore<S: KeyValueStore> {
    storage: S,
    identity: IdentityProvider,
    state: Mutex<CacheState>,
    hydration_gate: tokio::sync::Mutex<()>,
    version: AtomicU64,
}

impl<S: KeyValueStore> RecipeStore<S> {
    /// Create a store over `storage`. Nothing is read until the first operation.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            identity: IdentityProvider::new(),
            state: Mutex::new(CacheState::default()),
            hydration_gate: tokio::sync::Mutex::new(()),
            version: AtomicU64::new(0),
        }
    }

    /// The underlying adapter.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutation counter. Unchanged value means unchanged collection.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Progress of the legacy layout migration.
    pub fn migration_state(&self) -> MigrationState {
        self.state().migration
    }

    /// Whether the cache currently mirrors durable storage.
    pub fn is_hydrated(&self) -> bool {
        self.state().recipes.is_some()
    }

    /// The installation's user id (see [`IdentityProvider`]).
    pub async fn user_id(&self) -> String {
        self.identity.user_id(&self.storage).await
    }

    // ── Reads ─────────────────────────────────────────────────

    /// All recipes, hydrating on first use.
    ///
    /// A storage failure is logged and yields an empty collection; the cache
    /// stays unhydrated so the next call retries.
    pub async fn get_all(&self) -> RecipeSnapshot {
        match self.hydrate().await {
            Ok(recipes) => recipes,
            Err(e) => {
                warn!(error = %e, "Failed to load recipes, returning empty collection");
                Arc::new(Vec::new())
            }
        }
    }

    /// A single recipe, or `None` if no recipe has this id.
    pub async fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.get_all().await.iter().find(|r| r.id == id).cloned()
    }

    // ── Writes ────────────────────────────────────────────────

    /// Create a recipe from caller input.
    ///
    /// Assigns the recipe id, fresh ingredient ids, derived time, lifecycle
    /// timestamps and the user id, then persists only the new key.
    ///
    /// If the collection cannot be loaded the recipe is still written to its
    /// key. The cache stays unhydrated and picks the record up on the next
    /// successful read.
    ///
    /// # Errors
    ///
    /// Returns a storage error only if the write fails. On a write failure
    /// with a hydrated cache the recipe is already in the cache.
    pub async fn save(&self, input: RecipeInput) -> Result<Recipe> {
        let user_id = self.user_id().await;
        let now = Utc::now();

        let recipe = Recipe {
            id: Uuid::new_v4().to_string(),
            total_time: calculate_total_time(input.prep_time, input.cook_time),
            default_servings: input.servings,
            ingredients: reassign_ingredient_ids(input.ingredients),
            name: input.name,
            description: input.description,
            category: input.category,
            prep_time: input.prep_time,
            cook_time: input.cook_time,
            servings: input.servings,
            difficulty: input.difficulty,
            steps: input.steps,
            tags: input.tags,
            is_favorite: false,
            rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
            user_id,
            is_public: input.is_public,
        };
        let payload = serde_json::to_string(&recipe)?;

        if let Err(e) = self.with_cache(|recipes| recipes.push(recipe.clone())).await {
            warn!(
                id = %recipe.id,
                error = %e,
                "Recipe cache unavailable, writing to storage only"
            );
        }
        self.bump_version();

        self.persist("save", &recipe.id, &payload).await?;
        debug!(id = %recipe.id, "Saved recipe");
        Ok(recipe)
    }

    /// Merge `patch` over the stored recipe.
    ///
    /// Returns `Ok(None)` if no recipe has this id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if hydration or the write fails. On a write
    /// failure the merged recipe is already in the cache.
    pub async fn update(&self, id: &str, patch: RecipePatch) -> Result<Option<Recipe>> {
        let now = Utc::now();
        let updated = self
            .with_cache(|recipes| {
                recipes.iter_mut().find(|r| r.id == id).map(|existing| {
                    apply_patch(existing, &patch, now);
                    existing.clone()
                })
            })
            .await?;

        let Some(updated) = updated else {
            warn!(id, "Recipe not found for update");
            return Ok(None);
        };
        self.bump_version();

        let payload = serde_json::to_string(&updated)?;
        self.persist("update", &updated.id, &payload).await?;
        debug!(id, "Updated recipe");
        Ok(Some(updated))
    }

    /// Hard-delete a recipe. Returns `false` if no recipe has this id.
    ///
    /// # Errors
    ///
    /// Returns a storage error if hydration or the key removal fails. On a
    /// removal failure the recipe is already gone from the cache.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let removed = self
            .with_cache(|recipes| {
                let before = recipes.len();
                recipes.retain(|r| r.id != id);
                recipes.len() != before
            })
            .await?;

        if !removed {
            warn!(id, "Recipe not found for deletion");
            return Ok(false);
        }
        self.bump_version();

        if let Err(e) = self.storage.delete(&recipe_key(id)).await {
            error!(id, error = %e, "Failed to remove recipe key; cache is ahead of storage");
            return Err(e);
        }
        debug!(id, "Deleted recipe");
        Ok(true)
    }

    /// Replace the whole collection.
    ///
    /// Removes every per-record key and the legacy key, writes `recipes`
    /// per record and swaps the cache. Meant for bulk import and demo data.
    ///
    /// # Errors
    ///
    /// Returns a storage or encoding error. The cache is swapped before any
    /// storage call.
    pub async fn seed_all(&self, recipes: Vec<Recipe>) -> Result<()> {
        let recipes = dedupe_by_id(recipes);
        let pairs = encode_pairs(&recipes)?;
        let count = recipes.len();

        {
            let mut state = self.state();
            state.recipes = Some(Arc::new(recipes));
            state.generation += 1;
            state.migration = MigrationState::Migrated;
        }
        self.bump_version();

        let existing = self.storage.list_keys().await?;
        // Keys written by saves that ran after the swap belong to the new
        // collection and must survive.
        let keep: HashSet<String> = self
            .state()
            .recipes
            .as_ref()
            .map(|r| r.iter().map(|r| recipe_key(&r.id)).collect())
            .unwrap_or_default();
        let doomed: Vec<String> = existing
            .into_iter()
            .filter(|k| k == LEGACY_RECIPES_KEY || recipe_id_from_key(k).is_some())
            .filter(|k| !keep.contains(k))
            .collect();

        if !doomed.is_empty() {
            self.storage.multi_remove(&doomed).await?;
        }
        if !pairs.is_empty() {
            self.storage.multi_set(&pairs).await?;
        }

        info!(count, removed = doomed.len(), "Seeded recipe collection");
        Ok(())
    }

    /// Drop the cache. Durable storage is untouched; the next read rehydrates.
    pub fn reset_cache(&self) {
        let mut state = self.state();
        state.recipes = None;
        state.generation += 1;
        debug!("Recipe cache reset");
    }

    // ── Internals ─────────────────────────────────────────────

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump_version(&self) {
        self.version.fetch_add(1, Ordering::SeqCst);
    }

    fn cached(&self) -> Option<RecipeSnapshot> {
        self.state().recipes.clone()
    }

    /// Run `f` against the hydrated cache.
    ///
    /// Rehydrates if the cache was dropped between hydration and mutation.
    async fn with_cache<R>(&self, mut f: impl FnMut(&mut Vec<Recipe>) -> R) -> Result<R> {
        loop {
            self.hydrate().await?;
            let result = {
                let mut state = self.state();
                state.recipes.as_mut().map(|r| f(Arc::make_mut(r)))
            };
            if let Some(result) = result {
                return Ok(result);
            }
        }
    }

    async fn persist(&self, op: &'static str, id: &str, payload: &str) -> Result<()> {
        if let Err(e) = self.storage.set(&recipe_key(id), payload).await {
            error!(op, id, error = %e, "Failed to persist recipe; cache is ahead of storage");
            return Err(e);
        }
        Ok(())
    }

    /// Populate the cache once and return it.
    async fn hydrate(&self) -> Result<RecipeSnapshot> {
        if let Some(recipes) = self.cached() {
            return Ok(recipes);
        }

        let _gate = self.hydration_gate.lock().await;

        loop {
            let generation = {
                let state = self.state();
                if let Some(recipes) = &state.recipes {
                    debug!("Cache populated by a concurrent hydration");
                    return Ok(Arc::clone(recipes));
                }
                state.generation
            };

            let loaded = self.load().await?;

            let mut state = self.state();
            if let Some(recipes) = &state.recipes {
                return Ok(Arc::clone(recipes));
            }
            if state.generation == generation {
                let recipes = Arc::new(loaded);
                state.recipes = Some(Arc::clone(&recipes));
                debug!(count = recipes.len(), "Recipe cache hydrated");
                return Ok(recipes);
            }
            debug!("Cache invalidated during hydration, reloading");
        }
    }

    /// Read the collection from durable storage, migrating the legacy layout.
    async fn load(&self) -> Result<Vec<Recipe>> {
        let mut recipes = Vec::new();

        let pending = {
            let mut state = self.state();
            if state.migration == MigrationState::Migrated {
                false
            } else {
                state.migration = MigrationState::Migrating;
                true
            }
        };

        if pending {
            match migrate_legacy(&self.storage).await {
                Ok(migrated) => {
                    recipes = migrated.unwrap_or_default();
                    self.state().migration = MigrationState::Migrated;
                }
                Err(e) if e.is_storage_failure() => {
                    self.state().migration = MigrationState::Unmigrated;
                    return Err(e);
                }
                Err(e) => {
                    error!(error = %e, "Legacy recipe collection is unreadable, leaving it in place");
                    self.state().migration = MigrationState::Unmigrated;
                }
            }
        }

        let known: HashSet<String> = recipes.iter().map(|r| recipe_key(&r.id)).collect();
        let keys: Vec<String> = self
            .storage
            .list_keys()
            .await?
            .into_iter()
            .filter(|k| recipe_id_from_key(k).is_some() && !known.contains(k))
            .collect();

        if !keys.is_empty() {
            for (key, value) in self.storage.multi_get(&keys).await? {
                let Some(value) = value else { continue };
                match serde_json::from_str::<Recipe>(&value) {
                    Ok(recipe) => recipes.push(recipe),
                    Err(e) => warn!(key = %key, error = %e, "Skipping undecodable recipe"),
                }
            }
        }

        Ok(recipes)
    }
}

/// Give every ingredient a fresh id, discarding whatever it carried.
fn reassign_ingredient_ids(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    ingredients
        .into_iter()
        .map(|ingredient| Ingredient {
            id: Uuid::new_v4().to_string(),
            ..ingredient
        })
        .collect()
}

fn apply_patch(recipe: &mut Recipe, patch: &RecipePatch, now: DateTime<Utc>) {
    if let Some(name) = &patch.name {
        recipe.name.clone_from(name);
    }
    if let Some(description) = &patch.description {
        recipe.description.clone_from(description);
    }
    if let Some(category) = patch.category {
        recipe.category = category;
    }
    if let Some(prep_time) = patch.prep_time {
        recipe.prep_time = prep_time;
    }
    if let Some(cook_time) = patch.cook_time {
        recipe.cook_time = cook_time;
    }
    if let Some(servings) = patch.servings {
        recipe.servings = servings;
    }
    if let Some(difficulty) = patch.difficulty {
        recipe.difficulty = difficulty;
    }
    if let Some(ingredients) = &patch.ingredients {
        recipe.ingredients = reassign_ingredient_ids(ingredients.clone());
    }
    if let Some(steps) = &patch.steps {
        recipe.steps.clone_from(steps);
    }
    if let Some(tags) = &patch.tags {
        recipe.tags.clone_from(tags);
    }
    if let Some(is_public) = patch.is_public {
        recipe.is_public = is_public;
    }
    if let Some(is_favorite) = patch.is_favorite {
        recipe.is_favorite = is_favorite;
    }
    if let Some(rating) = patch.rating {
        recipe.rating = rating;
    }
    if let Some(review_count) = patch.review_count {
        recipe.review_count = review_count;
    }

    if patch.touches_time() {
        recipe.total_time = calculate_total_time(recipe.prep_time, recipe.cook_time);
    }
    recipe.updated_at = now.max(recipe.created_at);
}
