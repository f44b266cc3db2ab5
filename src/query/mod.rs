//! Query engine over materialized recipes.
//!
//! Everything here is a pure function of its inputs: nothing touches
//! storage and no input collection is mutated. Callers pass the snapshot
//! returned by [`RecipeStore::get_all`](crate::storage::RecipeStore::get_all).
//!
//! # Submodules
//!
//! - [`filter`] - Time, category and difficulty filters; name and ingredient search
//! - [`sort`] - Sort modes
//! - [`stats`] - Rating statistics and random suggestions
//! - [`text`] - Duration formatting, share text, scaling, ingredient parsing

pub mod filter;
pub mod sort;
pub mod stats;
pub mod text;

pub use filter::{
    filter_by_category, filter_by_difficulty, filter_by_max_time, search_by_ingredients,
    search_by_name,
};
pub use sort::{SortMode, sort_recipes};
pub use stats::{RatingStats, calculate_rating_stats, get_recipe_suggestions};
pub use text::{
    calculate_total_time, extract_ingredients_from_text, format_duration,
    generate_recipe_share_text, round_to_decimals, scale_ingredients,
};

use crate::model::{Category, Difficulty, Recipe};

/// Combined list query.
///
/// Stages run in a fixed order: name search, ingredient search, category,
/// difficulty, max time, sort. Unset stages pass their input through.
#[derive(Debug, Clone, Default)]
pub struct RecipeFilter {
    pub search: Option<String>,
    pub ingredients: Vec<String>,
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    /// Maximum total time in minutes; `0` means no limit.
    pub max_time: u32,
    pub sort: SortMode,
}

impl RecipeFilter {
    /// Apply every stage to `recipes`.
    #[must_use]
    pub fn apply(&self, recipes: &[Recipe]) -> Vec<Recipe> {
        let mut out = match &self.search {
            Some(query) => search_by_name(recipes, query),
            None => recipes.to_vec(),
        };
        out = search_by_ingredients(&out, &self.ingredients);
        out = filter_by_category(&out, self.category);
        out = filter_by_difficulty(&out, self.difficulty);
        out = filter_by_max_time(&out, self.max_time);
        sort_recipes(&out, self.sort)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Category, Difficulty, Ingredient, Recipe};
    use chrono::{Duration, TimeZone, Utc};

    /// Recipe with the given name, ingredient names and total time.
    ///
    /// `created_at` is offset by `total_time` minutes from a fixed instant so
    /// ordering tests have distinct timestamps.
    pub(crate) fn recipe(id: &str, name: &str, ingredients: &[&str], total_time: u32) -> Recipe {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
            + Duration::minutes(i64::from(total_time));
        Recipe {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            category: Category::MainCourse,
            prep_time: total_time,
            cook_time: 0,
            total_time,
            servings: 2,
            default_servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: ingredients
                .iter()
                .enumerate()
                .map(|(i, n)| Ingredient {
                    id: format!("{id}-{i}"),
                    name: (*n).to_string(),
                    amount: 1.0,
                    unit: "g".to_string(),
                })
                .collect(),
            steps: vec![],
            tags: vec![],
            is_favorite: false,
            rating: 0.0,
            review_count: 0,
            created_at: created,
            updated_at: created,
            user_id: "u".to_string(),
            is_public: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::recipe;
    use super::*;

    #[test]
    fn test_filter_pipeline() {
        let mut soup = recipe("1", "Tomato Soup", &["Tomato", "Onion"], 40);
        soup.category = Category::Soup;
        let mut salad = recipe("2", "Tomato Salad", &["Tomato", "Basil"], 10);
        salad.category = Category::Salad;
        let quick_soup = {
            let mut r = recipe("3", "Quick Tomato Soup", &["Tomato"], 15);
            r.category = Category::Soup;
            r
        };
        let recipes = vec![soup, salad, quick_soup];

        let filter = RecipeFilter {
            search: Some("tomato".to_string()),
            ingredients: vec!["tom".to_string()],
            category: Some(Category::Soup),
            max_time: 45,
            sort: SortMode::Quick,
            ..RecipeFilter::default()
        };
        let ids: Vec<String> = filter.apply(&recipes).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn test_default_filter_is_identity() {
        let recipes = vec![recipe("1", "B", &[], 5), recipe("2", "A", &[], 1)];
        assert_eq!(RecipeFilter::default().apply(&recipes), recipes);
    }
}
