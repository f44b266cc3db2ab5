//! Seed command implementation.

use super::{block_on, open_store};
use crate::error::{Error, Result};
use crate::model::Recipe;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Replace the whole collection with the recipes in `file`.
///
/// The file holds a JSON array in the stored wire format (the same shape as
/// the legacy collection blob). Every existing recipe is removed.
pub fn execute(file: &Path, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let recipes = read_recipes(file)?;
    let count = recipes.len();
    info!(file = %file.display(), count, "Seeding recipe collection");

    let store = open_store(db_path)?;
    block_on(store.seed_all(recipes))?;

    if json {
        let output = serde_json::json!({
            "seeded": count,
            "version": store.version(),
        });
        println!("{output}");
    } else {
        println!("{} {count} recipes", "Seeded".green().bold());
    }

    Ok(())
}

fn read_recipes(file: &Path) -> Result<Vec<Recipe>> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        Error::InvalidArgument(format!("cannot read seed file {}: {e}", file.display()))
    })?;
    let recipes: Vec<Recipe> = serde_json::from_str(&text)?;
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_recipes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"r1","name":"Soup","description":"","category":"soup","prepTime":5,
               "cookTime":10,"totalTime":15,"servings":2,"defaultServings":2,"difficulty":"easy",
               "ingredients":[],"steps":[],"tags":[],"isFavorite":false,"rating":0,
               "reviewCount":0,"createdAt":"2024-01-01T00:00:00Z",
               "updatedAt":"2024-01-01T00:00:00Z","userId":"u","isPublic":false}}]"#
        )
        .unwrap();

        let recipes = read_recipes(file.path()).unwrap();
        assert_eq!(recipes.len(), 1);
        assert_eq!(recipes[0].total_time, 15);
    }

    #[test]
    fn test_missing_file() {
        let err = read_recipes(Path::new("/nonexistent/recipes.json")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
