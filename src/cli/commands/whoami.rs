//! Whoami command implementation.

use super::{block_on, open_store};
use crate::error::Result;
use crate::identity::TEMP_USER_PREFIX;
use std::path::PathBuf;

/// Print the per-installation user id, creating it on first use.
pub fn execute(db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let user_id = block_on(async { Ok(store.user_id().await) })?;
    let temporary = user_id.starts_with(TEMP_USER_PREFIX);

    if json {
        let output = serde_json::json!({
            "user_id": user_id,
            "temporary": temporary,
        });
        println!("{output}");
    } else if temporary {
        println!("{user_id} (temporary, storage unavailable)");
    } else {
        println!("{user_id}");
    }

    Ok(())
}
