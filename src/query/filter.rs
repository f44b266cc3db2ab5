//! Filters and substring search.

use crate::model::{Category, Difficulty, Recipe};
use regex::{Regex, RegexBuilder};

/// Recipes whose stored `total_time` is at most `max_minutes`.
///
/// `0` means no limit and returns the input unchanged.
#[must_use]
pub fn filter_by_max_time(recipes: &[Recipe], max_minutes: u32) -> Vec<Recipe> {
    if max_minutes == 0 {
        return recipes.to_vec();
    }

    recipes
        .iter()
        .filter(|r| r.total_time <= max_minutes)
        .cloned()
        .collect()
}

/// Recipes where every term matches at least one ingredient name.
///
/// Matching is case-insensitive substring containment on the trimmed term.
/// Terms are literal text; pattern metacharacters such as `(` or `*` only
/// match themselves.
#[must_use]
pub fn search_by_ingredients<S: AsRef<str>>(recipes: &[Recipe], terms: &[S]) -> Vec<Recipe> {
    if terms.is_empty() {
        return recipes.to_vec();
    }

    let matchers: Vec<TermMatcher> = terms.iter().map(|t| TermMatcher::new(t.as_ref())).collect();

    recipes
        .iter()
        .filter(|recipe| {
            matchers.iter().all(|m| {
                recipe
                    .ingredients
                    .iter()
                    .any(|ingredient| m.is_match(&ingredient.name))
            })
        })
        .cloned()
        .collect()
}

/// Recipes whose name, description or any tag contains `query`.
///
/// Case-insensitive; a blank query returns the input unchanged.
#[must_use]
pub fn search_by_name(recipes: &[Recipe], query: &str) -> Vec<Recipe> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return recipes.to_vec();
    }

    recipes
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
                || r.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Exact category match; `None` means no filter.
#[must_use]
pub fn filter_by_category(recipes: &[Recipe], category: Option<Category>) -> Vec<Recipe> {
    match category {
        None => recipes.to_vec(),
        Some(c) => recipes.iter().filter(|r| r.category == c).cloned().collect(),
    }
}

/// Exact difficulty match; `None` means no filter.
#[must_use]
pub fn filter_by_difficulty(recipes: &[Recipe], difficulty: Option<Difficulty>) -> Vec<Recipe> {
    match difficulty {
        None => recipes.to_vec(),
        Some(d) => recipes
            .iter()
            .filter(|r| r.difficulty == d)
            .cloned()
            .collect(),
    }
}

/// Compiled, literal, case-insensitive search term.
enum TermMatcher {
    Pattern(Regex),
    /// Lowercased needle, used if the escaped pattern exceeds regex size limits.
    Plain(String),
}

impl TermMatcher {
    fn new(term: &str) -> Self {
        let term = term.trim();
        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Self::Pattern(re),
            Err(_) => Self::Plain(term.to_lowercase()),
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Self::Pattern(re) => re.is_match(haystack),
            Self::Plain(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }
}
