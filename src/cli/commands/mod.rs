//! Command implementations.

pub mod completions;
pub mod insights;
pub mod recipe;
pub mod seed;
pub mod version;
pub mod whoami;

use crate::config::resolve_db_path;
use crate::error::{Error, Result};
use crate::storage::{RecipeStore, SqliteKvStore};
use std::future::Future;
use std::path::PathBuf;
use tracing::debug;

/// Open the record store backed by the resolved database.
///
/// The database file and its parent directories are created on first use.
pub(crate) fn open_store(db_path: Option<&PathBuf>) -> Result<RecipeStore<SqliteKvStore>> {
    let db_path = resolve_db_path(db_path.map(PathBuf::as_path)).ok_or_else(|| {
        Error::Config("Could not determine database location (no home directory)".to_string())
    })?;
    debug!(path = %db_path.display(), "Opening recipe database");

    let storage = SqliteKvStore::open(&db_path)?;
    Ok(RecipeStore::new(storage))
}

/// Drive an async command body to completion on the calling thread.
///
/// Commands issue one storage call at a time, so a current-thread runtime is
/// enough and no worker threads are spawned.
pub(crate) fn block_on<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;

    rt.block_on(future)
}
