//! Share, suggest and stats command implementations.

use super::{block_on, open_store};
use crate::error::{Error, Result};
use crate::model::Recipe;
use crate::query::{
    RatingStats, calculate_rating_stats, format_duration, generate_recipe_share_text,
    get_recipe_suggestions,
};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct ShareOutput<'a> {
    id: &'a str,
    text: String,
}

#[derive(Serialize)]
struct SuggestOutput {
    recipes: Vec<Recipe>,
    count: usize,
}

#[derive(Serialize)]
struct StatsOutput {
    #[serde(flatten)]
    stats: RatingStats,
    recipes: usize,
    version: u64,
    migration: &'static str,
}

/// Execute `rb share`.
pub fn share(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let recipe = block_on(async { Ok(store.get_by_id(id).await) })?
        .ok_or_else(|| Error::RecipeNotFound { id: id.to_string() })?;
    let text = generate_recipe_share_text(&recipe);

    if json {
        println!("{}", serde_json::to_string(&ShareOutput { id, text })?);
    } else {
        println!("{text}");
    }

    Ok(())
}

/// Execute `rb suggest`.
pub fn suggest(count: usize, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let all = block_on(async { Ok(store.get_all().await) })?;
    let recipes = get_recipe_suggestions(&all, count);

    if json {
        let output = SuggestOutput {
            count: recipes.len(),
            recipes,
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if recipes.is_empty() {
        println!("No recipes to suggest. Add one with `rb add`.");
    } else {
        println!("{}", "How about...".cyan().bold());
        for r in &recipes {
            println!(
                "  {} {} ({}) {}",
                r.category.icon(),
                r.name.bold(),
                format_duration(r.total_time),
                format!("[{}]", r.id).dimmed()
            );
        }
    }

    Ok(())
}

/// Execute `rb stats`.
///
/// Without explicit ratings, summarizes the stored ratings of every rated
/// recipe, rounded to whole stars.
pub fn stats(ratings: &[i32], db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    let all = block_on(async { Ok(store.get_all().await) })?;

    let ratings = if ratings.is_empty() {
        stored_ratings(&all)
    } else {
        ratings.to_vec()
    };
    let stats = calculate_rating_stats(&ratings);

    if json {
        let output = StatsOutput {
            stats,
            recipes: all.len(),
            version: store.version(),
            migration: store.migration_state().as_str(),
        };
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }

    println!("{}", "Rating Stats".cyan().bold());
    println!("  Recipes: {}", all.len());
    println!("  Ratings: {}", stats.count);
    println!("  Average: {:.1}", stats.average);
    for (star, tally) in stats.distribution.iter().rev() {
        let bar = "█".repeat(usize::try_from(*tally).unwrap_or(usize::MAX).min(40));
        println!("  {star}★ {tally:>4} {}", bar.yellow());
    }

    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn stored_ratings(recipes: &[Recipe]) -> Vec<i32> {
    recipes
        .iter()
        .filter(|r| r.rating > 0.0)
        .map(|r| r.rating.round() as i32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::migrations::tests::stored_recipe;

    #[test]
    fn test_stored_ratings_skips_unrated() {
        let mut a = stored_recipe("a", "A");
        a.rating = 4.6;
        let b = stored_recipe("b", "B");
        let mut c = stored_recipe("c", "C");
        c.rating = 2.4;

        assert_eq!(stored_ratings(&[a, b, c]), vec![5, 2]);
    }
}
