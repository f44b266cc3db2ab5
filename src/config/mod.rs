//! Configuration management.
//!
//! RecipeBox keeps a single on-device database. This module decides where it
//! lives.

use std::path::{Path, PathBuf};

/// Name of the database file inside the data directories.
const DB_FILE_NAME: &str = "recipes.db";

/// Get the global RecipeBox directory location (`~/.recipebox/`).
#[must_use]
pub fn global_recipebox_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".recipebox"))
}

/// Check if test mode is enabled.
///
/// Test mode is enabled by setting `RB_TEST_DB=1` (or any non-empty value
/// other than `0`/`false`). This redirects all database operations to an
/// isolated test database.
#[must_use]
pub fn is_test_mode() -> bool {
    std::env::var("RB_TEST_DB").is_ok_and(|v| is_truthy(&v))
}

fn is_truthy(v: &str) -> bool {
    !v.is_empty() && v != "0" && !v.eq_ignore_ascii_case("false")
}

/// Get the test database path (`~/.recipebox/test/recipes.db`).
#[must_use]
pub fn test_db_path() -> Option<PathBuf> {
    global_recipebox_dir().map(|dir| dir.join("test").join(DB_FILE_NAME))
}

/// Resolve the database path.
///
/// Priority:
/// 1. If `explicit_path` is provided, use it directly
/// 2. `RB_TEST_DB` environment variable → uses test database
/// 3. `RECIPEBOX_DB` environment variable
/// 4. Global location: `~/.recipebox/data/recipes.db`
///
/// Returns `None` only when no home directory can be determined.
#[must_use]
pub fn resolve_db_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if is_test_mode() {
        return test_db_path();
    }

    if let Ok(db_path) = std::env::var("RECIPEBOX_DB") {
        if !db_path.trim().is_empty() {
            return Some(PathBuf::from(db_path));
        }
    }

    global_recipebox_dir().map(|dir| dir.join("data").join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let explicit = Path::new("/tmp/elsewhere/recipes.db");
        assert_eq!(resolve_db_path(Some(explicit)), Some(explicit.to_path_buf()));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy(""));
        assert!(!is_truthy("0"));
        assert!(!is_truthy("FALSE"));
    }

    #[test]
    fn test_default_paths_under_home() {
        if let Some(dir) = global_recipebox_dir() {
            assert_eq!(test_db_path(), Some(dir.join("test").join("recipes.db")));
        }
    }
}
