//! Rating statistics and random suggestions.

use super::text::round_to_decimals;
use crate::model::Recipe;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of a list of ratings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingStats {
    /// Mean of every input value, rounded to one decimal.
    pub average: f64,
    /// Number of input values, including out-of-range ones.
    pub count: usize,
    /// Tally per star value `1..=5`; empty when there were no ratings.
    pub distribution: BTreeMap<u8, u32>,
}

/// Compute [`RatingStats`] for `ratings`.
///
/// `average` and `count` cover every value. Values outside `1..=5` are left
/// out of `distribution` only.
#[must_use]
pub fn calculate_rating_stats(ratings: &[i32]) -> RatingStats {
    if ratings.is_empty() {
        return RatingStats {
            average: 0.0,
            count: 0,
            distribution: BTreeMap::new(),
        };
    }

    let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    #[allow(clippy::cast_precision_loss)]
    let average = sum as f64 / ratings.len() as f64;

    let mut distribution: BTreeMap<u8, u32> = (1..=5).map(|star| (star, 0)).collect();
    for &rating in ratings {
        if let Ok(star) = u8::try_from(rating) {
            if let Some(tally) = distribution.get_mut(&star) {
                *tally += 1;
            }
        }
    }

    RatingStats {
        average: round_to_decimals(average, 1),
        count: ratings.len(),
        distribution,
    }
}

/// Up to `n` distinct recipes in random order.
///
/// When `n` is at least the input length the whole input comes back, shuffled.
#[must_use]
pub fn get_recipe_suggestions(recipes: &[Recipe], n: usize) -> Vec<Recipe> {
    let mut out = recipes.to_vec();
    out.shuffle(&mut rand::rng());
    out.truncate(n);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::recipe;
    use std::collections::HashSet;

    #[test]
    fn test_rating_stats() {
        let stats = calculate_rating_stats(&[5, 4, 5, 3]);
        assert!((stats.average - 4.3).abs() < f64::EPSILON);
        assert_eq!(stats.count, 4);
        assert_eq!(
            stats.distribution,
            BTreeMap::from([(1, 0), (2, 0), (3, 1), (4, 1), (5, 2)])
        );
    }

    #[test]
    fn test_rating_stats_ignores_out_of_range_in_distribution() {
        let stats = calculate_rating_stats(&[5, 6, 0, 1, 5]);
        assert_eq!(stats.count, 5);
        // (5 + 6 + 0 + 1 + 5) / 5 = 3.4
        assert!((stats.average - 3.4).abs() < f64::EPSILON);
        assert_eq!(
            stats.distribution,
            BTreeMap::from([(1, 1), (2, 0), (3, 0), (4, 0), (5, 2)])
        );

        let negative = calculate_rating_stats(&[-1, 2]);
        assert_eq!(negative.distribution[&2], 1);
        assert_eq!(negative.distribution.values().sum::<u32>(), 1);
    }

    #[test]
    fn test_rating_stats_empty() {
        let stats = calculate_rating_stats(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.average.abs() < f64::EPSILON);
        assert!(stats.distribution.is_empty());
    }

    fn ten_recipes() -> Vec<Recipe> {
        (0..10)
            .map(|i| recipe(&i.to_string(), &format!("Recipe {i}"), &[], i))
            .collect()
    }

    #[test]
    fn test_suggestions_without_replacement() {
        let recipes = ten_recipes();
        let picked = get_recipe_suggestions(&recipes, 3);
        assert_eq!(picked.len(), 3);
        let unique: HashSet<&str> = picked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn test_suggestions_more_than_available() {
        let recipes = ten_recipes();
        let picked = get_recipe_suggestions(&recipes, 15);
        let picked_ids: HashSet<&str> = picked.iter().map(|r| r.id.as_str()).collect();
        let all_ids: HashSet<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(picked.len(), 10);
        assert_eq!(picked_ids, all_ids);
    }

    #[test]
    fn test_suggestions_zero() {
        assert!(get_recipe_suggestions(&ten_recipes(), 0).is_empty());
        assert!(get_recipe_suggestions(&[], 3).is_empty());
    }
}
