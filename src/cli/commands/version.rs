//! Version command implementation.
//!
//! Besides the crate version this reports the on-disk format the binary
//! reads and writes, so a database copied between machines can be checked
//! against the binary that will open it.

use crate::error::Result;
use crate::storage::schema::CURRENT_SCHEMA_VERSION;
use crate::storage::{LEGACY_RECIPES_KEY, RECIPE_KEY_PREFIX};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Serialize)]
struct VersionInfo {
    name: &'static str,
    version: &'static str,
    build: &'static str,
    schema_version: i32,
    record_key_prefix: &'static str,
    legacy_key: &'static str,
}

impl VersionInfo {
    fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            build: if cfg!(debug_assertions) { "dev" } else { "release" },
            schema_version: CURRENT_SCHEMA_VERSION,
            record_key_prefix: RECIPE_KEY_PREFIX,
            legacy_key: LEGACY_RECIPES_KEY,
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "rb {} ({})", self.version, self.build)?;
        write!(
            f,
            "storage: schema v{}, records under {}<id>, migrates '{}'",
            self.schema_version, self.record_key_prefix, self.legacy_key
        )
    }
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let info = VersionInfo::current();
    if json {
        println!("{}", serde_json::to_string(&info)?);
    } else {
        println!("{info}");
    }
    Ok(())
}
