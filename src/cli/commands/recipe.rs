//! Recipe command implementations (add, show, list, update, delete).

use super::{block_on, open_store};
use crate::cli::{AddArgs, ListArgs, UpdateArgs};
use crate::error::{Error, Result};
use crate::model::{Category, Difficulty, Recipe, RecipeInput, RecipePatch};
use crate::query::{
    RecipeFilter, SortMode, extract_ingredients_from_text, format_duration, scale_ingredients,
};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

/// Output for recipe list.
#[derive(Serialize)]
struct ListOutput<'a> {
    recipes: &'a [Recipe],
    count: usize,
}

/// Execute `rb add`.
pub fn add(args: &AddArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let input = RecipeInput {
        name: args.name.clone(),
        description: args.description.clone(),
        category: args.category.parse::<Category>()?,
        prep_time: args.prep,
        cook_time: args.cook,
        servings: validate_servings(args.servings)?,
        difficulty: args.difficulty.parse::<Difficulty>()?,
        ingredients: extract_ingredients_from_text(&args.ingredients.join("\n")),
        steps: args.steps.clone(),
        tags: args.tags.clone(),
        is_public: args.public,
    };

    let store = open_store(db_path)?;
    let recipe = block_on(store.save(input))?;

    if crate::is_silent() {
        println!("{}", recipe.id);
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&recipe)?);
    } else {
        println!(
            "{} {} {}",
            "Added".green().bold(),
            recipe.name.bold(),
            format!("[{}]", recipe.id).dimmed()
        );
    }

    Ok(())
}

/// Execute `rb show`.
pub fn show(
    id: &str,
    servings: Option<u32>,
    db_path: Option<&PathBuf>,
    json: bool,
) -> Result<()> {
    let store = open_store(db_path)?;
    let mut recipe = block_on(async { Ok(store.get_by_id(id).await) })?
        .ok_or_else(|| Error::RecipeNotFound { id: id.to_string() })?;

    if let Some(target) = servings {
        let target = validate_servings(target)?;
        recipe.ingredients = scale_ingredients(&recipe.ingredients, target, recipe.default_servings);
        recipe.servings = target;
    }

    if json {
        println!("{}", serde_json::to_string(&recipe)?);
        return Ok(());
    }

    print_recipe(&recipe);
    Ok(())
}

/// Execute `rb list`.
pub fn list(args: &ListArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let filter = RecipeFilter {
        search: args.search.clone(),
        ingredients: args.ingredients.clone(),
        category: Category::parse_filter(&args.category)?,
        difficulty: Difficulty::parse_filter(&args.difficulty)?,
        max_time: args.max_time,
        sort: parse_sort(&args.sort)?,
    };

    let store = open_store(db_path)?;
    let all = block_on(async { Ok(store.get_all().await) })?;
    let mut recipes = filter.apply(&all);
    if let Some(limit) = args.limit {
        recipes.truncate(limit);
    }

    if crate::is_csv() {
        println!("id,name,category,difficulty,total_time,servings,rating");
        for r in &recipes {
            println!(
                "{},{},{},{},{},{},{}",
                r.id,
                crate::csv_escape(&r.name),
                r.category,
                r.difficulty,
                r.total_time,
                r.servings,
                r.rating
            );
        }
    } else if json {
        let output = ListOutput {
            recipes: &recipes,
            count: recipes.len(),
        };
        println!("{}", serde_json::to_string(&output)?);
    } else if recipes.is_empty() {
        println!("No recipes found.");
    } else {
        println!("Recipes ({} found):", recipes.len());
        println!();
        for r in &recipes {
            let favorite = if r.is_favorite { " ★" } else { "" };
            println!(
                "{} {}{} {}",
                r.category.icon(),
                r.name.bold(),
                favorite.yellow(),
                format!("[{}]", r.id).dimmed()
            );
            println!(
                "  {} · {} · {}",
                r.category.display_name(),
                r.difficulty.display_name(),
                format_duration(r.total_time)
            );
        }
    }

    Ok(())
}

/// Execute `rb update`.
pub fn update(args: &UpdateArgs, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let patch = RecipePatch {
        name: args.name.clone(),
        description: args.description.clone(),
        category: args.category.as_deref().map(str::parse::<Category>).transpose()?,
        prep_time: args.prep,
        cook_time: args.cook,
        servings: args.servings.map(validate_servings).transpose()?,
        difficulty: args
            .difficulty
            .as_deref()
            .map(str::parse::<Difficulty>)
            .transpose()?,
        ingredients: non_empty(&args.ingredients)
            .map(|lines| extract_ingredients_from_text(&lines.join("\n"))),
        steps: non_empty(&args.steps).map(<[String]>::to_vec),
        tags: non_empty(&args.tags).map(<[String]>::to_vec),
        is_public: args.public,
        is_favorite: args.favorite,
        rating: args.rating.map(validate_rating).transpose()?,
        review_count: None,
    };

    let store = open_store(db_path)?;
    let recipe = block_on(store.update(&args.id, patch))?.ok_or_else(|| Error::RecipeNotFound {
        id: args.id.clone(),
    })?;

    if crate::is_silent() {
        println!("{}", recipe.id);
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&recipe)?);
    } else {
        println!(
            "{} {} {}",
            "Updated".green().bold(),
            recipe.name.bold(),
            format!("[{}]", recipe.id).dimmed()
        );
    }

    Ok(())
}

/// Execute `rb delete`.
pub fn delete(id: &str, db_path: Option<&PathBuf>, json: bool) -> Result<()> {
    let store = open_store(db_path)?;
    if !block_on(store.delete(id))? {
        return Err(Error::RecipeNotFound { id: id.to_string() });
    }

    if crate::is_silent() {
        println!("{id}");
        return Ok(());
    }

    if json {
        let output = serde_json::json!({
            "id": id,
            "deleted": true
        });
        println!("{output}");
    } else {
        println!("Deleted recipe: {id}");
    }

    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    println!("{} {}", recipe.category.icon(), recipe.name.bold());
    if !recipe.description.is_empty() {
        println!("{}", recipe.description);
    }
    println!();
    println!(
        "{} {} · {} · {} servings",
        "Time:".cyan().bold(),
        format_duration(recipe.total_time),
        recipe.difficulty.display_name(),
        recipe.servings
    );
    if recipe.review_count > 0 || recipe.rating > 0.0 {
        println!(
            "{} {:.1} ({} reviews)",
            "Rating:".cyan().bold(),
            recipe.rating,
            recipe.review_count
        );
    }
    if !recipe.tags.is_empty() {
        println!("{} {}", "Tags:".cyan().bold(), recipe.tags.join(", "));
    }

    if !recipe.ingredients.is_empty() {
        println!();
        println!("{}", "Ingredients".cyan().bold());
        for ing in &recipe.ingredients {
            println!("  • {} {} {}", ing.amount, ing.unit, ing.name);
        }
    }

    if !recipe.steps.is_empty() {
        println!();
        println!("{}", "Steps".cyan().bold());
        for (i, step) in recipe.steps.iter().enumerate() {
            println!("  {}. {step}", i + 1);
        }
    }
}

fn parse_sort(s: &str) -> Result<SortMode> {
    let mode = SortMode::from(s);
    if mode == SortMode::Original && !s.trim().eq_ignore_ascii_case(SortMode::Original.as_str()) {
        return Err(Error::InvalidArgument(format!("unknown sort mode '{s}'")));
    }
    Ok(mode)
}

fn validate_servings(servings: u32) -> Result<u32> {
    if servings == 0 {
        return Err(Error::InvalidArgument(
            "servings must be at least 1".to_string(),
        ));
    }
    Ok(servings)
}

fn validate_rating(rating: f64) -> Result<f64> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(Error::InvalidArgument(format!(
            "rating must be between 0 and 5, got {rating}"
        )));
    }
    Ok(rating)
}

fn non_empty(values: &[String]) -> Option<&[String]> {
    (!values.is_empty()).then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("rating").unwrap(), SortMode::Rating);
        assert_eq!(parse_sort("original").unwrap(), SortMode::Original);
        let err = parse_sort("popular").unwrap_err();
        assert!(err.hint().unwrap().contains("newest"));
    }

    #[test]
    fn test_validation() {
        assert!(validate_servings(0).is_err());
        assert_eq!(validate_servings(2).unwrap(), 2);
        assert!(validate_rating(5.5).is_err());
        assert!(validate_rating(f64::NAN).is_err());
        assert!(validate_rating(4.5).is_ok());
    }
}
