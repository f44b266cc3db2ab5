//! Data models for RecipeBox.
//!
//! - Recipe / Ingredient
//! - RecipeInput / RecipePatch (write inputs)
//! - Category / Difficulty vocabularies

pub mod recipe;

pub use recipe::{
    Category, DEFAULT_SERVINGS, Difficulty, FILTER_ALL, Ingredient, Recipe, RecipeInput,
    RecipePatch,
};
