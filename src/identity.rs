//! Per-installation user identity.
//!
//! A UUID is generated on first use and stored under [`USER_ID_KEY`]. If the
//! storage boundary fails, callers still get an identifier: a
//! `temp-user-<uuid>` value that is not persisted.

use crate::error::Result;
use crate::storage::{KeyValueStore, USER_ID_KEY};
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use uuid::Uuid;

/// Prefix of the non-persisted fallback identifier.
pub const TEMP_USER_PREFIX: &str = "temp-user-";

/// Lazily resolved, cached user id.
///
/// Concurrent first callers share one get-or-create pass. Failures are not
/// cached, so the next call tries storage again.
#[derive(Debug, Default)]
pub struct IdentityProvider {
    user_id: OnceCell<String>,
}

impl IdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the user id, creating and persisting it on first use.
    pub async fn user_id<S: KeyValueStore>(&self, storage: &S) -> String {
        match self
            .user_id
            .get_or_try_init(|| load_or_create_user_id(storage))
            .await
        {
            Ok(id) => id.clone(),
            Err(e) => {
                warn!(error = %e, "Failed to get or create user id, using temporary id");
                temporary_user_id()
            }
        }
    }
}

/// Uncached get-or-create against `storage`.
///
/// # Errors
///
/// Returns the adapter error if the read or the write fails.
pub async fn load_or_create_user_id<S: KeyValueStore>(storage: &S) -> Result<String> {
    if let Some(existing) = storage.get(USER_ID_KEY).await? {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }

    let id = Uuid::new_v4().to_string();
    storage.set(USER_ID_KEY, &id).await?;
    debug!(user_id = %id, "Created user id");
    Ok(id)
}

fn temporary_user_id() -> String {
    format!("{TEMP_USER_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_creates_and_persists_once() {
        let store = MemoryStore::new();
        let identity = IdentityProvider::new();

        let first = identity.user_id(&store).await;
        let second = identity.user_id(&store).await;

        assert_eq!(first, second);
        assert_eq!(store.peek(USER_ID_KEY), Some(first.clone()));
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(store.stats().writes, 1);
    }

    #[tokio::test]
    async fn test_returns_existing_id() {
        let store = MemoryStore::with_entries([(USER_ID_KEY, "existing-user")]);
        assert_eq!(
            load_or_create_user_id(&store).await.unwrap(),
            "existing-user"
        );
        assert_eq!(store.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_calls_agree() {
        let store = MemoryStore::new();
        let identity = IdentityProvider::new();

        let (a, b) = tokio::join!(identity.user_id(&store), identity.user_id(&store));
        assert_eq!(a, b);
        assert_eq!(store.stats().writes, 1);
    }

    #[tokio::test]
    async fn test_storage_failure_falls_back_to_temporary_id() {
        let store = MemoryStore::new();
        store.set_fail_reads(true);
        let identity = IdentityProvider::new();

        let id = identity.user_id(&store).await;
        assert!(id.starts_with(TEMP_USER_PREFIX));
        assert!(store.peek(USER_ID_KEY).is_none());

        // Not cached: a recovered store yields a real, persisted id.
        store.set_fail_reads(false);
        let real = identity.user_id(&store).await;
        assert!(!real.starts_with(TEMP_USER_PREFIX));
        assert_eq!(store.peek(USER_ID_KEY), Some(real));
    }
}
