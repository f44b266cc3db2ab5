//! Recipe model for RecipeBox.
//!
//! Recipes are the unit of storage and identity. The wire form is camelCase
//! JSON with RFC 3339 timestamps, which is also the shape of the legacy
//! single-key collection blob, so both decode through the same types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Baseline servings used when a caller does not supply one for scaling.
pub const DEFAULT_SERVINGS: u32 = 4;

/// Sentinel accepted by category/difficulty filters meaning "no filter".
pub const FILTER_ALL: &str = "all";

/// A recipe in RecipeBox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Unique identifier (UUID v4), immutable after creation
    pub id: String,

    pub name: String,

    pub description: String,

    pub category: Category,

    /// Preparation time in minutes
    pub prep_time: u32,

    /// Cooking time in minutes
    pub cook_time: u32,

    /// Always `prep_time + cook_time`; never taken from caller input
    pub total_time: u32,

    pub servings: u32,

    /// Servings at creation time; the baseline for ingredient scaling
    pub default_servings: u32,

    pub difficulty: Difficulty,

    pub ingredients: Vec<Ingredient>,

    pub steps: Vec<String>,

    pub tags: Vec<String>,

    #[serde(default)]
    pub is_favorite: bool,

    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub review_count: u32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Installation identity at creation time
    pub user_id: String,

    #[serde(default)]
    pub is_public: bool,
}

/// A single ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Regenerated on every save/update; any incoming value is discarded.
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

impl Ingredient {
    /// Create an ingredient without an id (the store assigns one).
    pub fn new(name: impl Into<String>, amount: f64, unit: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            amount,
            unit: unit.into(),
        }
    }
}

/// Caller-supplied fields for creating a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeInput {
    pub name: String,
    pub description: String,
    pub category: Category,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// Partial update. `None` fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub prep_time: Option<u32>,
    pub cook_time: Option<u32>,
    pub servings: Option<u32>,
    pub difficulty: Option<Difficulty>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub is_public: Option<bool>,
    pub is_favorite: Option<bool>,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
}

impl RecipePatch {
    /// Whether the patch touches either time input.
    #[must_use]
    pub fn touches_time(&self) -> bool {
        self.prep_time.is_some() || self.cook_time.is_some()
    }
}

// ── Vocabularies ──────────────────────────────────────────────

/// Recipe category. Unknown wire values decode as [`Category::Other`].
///
/// The unknown value itself is not kept: a record loaded with `"brunch"` is
/// written back as `"other"` the next time it is saved, updated or seeded.
/// The vocabulary is closed, so only data written by something other than
/// this crate can carry such a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Appetizer,
    Soup,
    Salad,
    MainCourse,
    SideDish,
    Dessert,
    Drink,
    Snack,
    Breakfast,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Self; 10] = [
        Self::Appetizer,
        Self::Soup,
        Self::Salad,
        Self::MainCourse,
        Self::SideDish,
        Self::Dessert,
        Self::Drink,
        Self::Snack,
        Self::Breakfast,
        Self::Other,
    ];

    /// Wire id, e.g. `main-course`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Appetizer => "appetizer",
            Self::Soup => "soup",
            Self::Salad => "salad",
            Self::MainCourse => "main-course",
            Self::SideDish => "side-dish",
            Self::Dessert => "dessert",
            Self::Drink => "drink",
            Self::Snack => "snack",
            Self::Breakfast => "breakfast",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Appetizer => "Appetizers",
            Self::Soup => "Soups",
            Self::Salad => "Salads",
            Self::MainCourse => "Main Courses",
            Self::SideDish => "Side Dishes",
            Self::Dessert => "Desserts",
            Self::Drink => "Drinks",
            Self::Snack => "Snacks",
            Self::Breakfast => "Breakfast",
            Self::Other => "Other",
        }
    }

    #[must_use]
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Appetizer => "🥗",
            Self::Soup => "🍲",
            Self::Salad => "🥬",
            Self::MainCourse => "🍝",
            Self::SideDish => "🍚",
            Self::Dessert => "🍰",
            Self::Drink => "🍹",
            Self::Snack => "🍪",
            Self::Breakfast => "🍳",
            Self::Other => "🍽️",
        }
    }

    /// Parse a filter argument: `all` or empty means no filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown category id.
    pub fn parse_filter(s: &str) -> Result<Option<Self>> {
        parse_filter(s)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown category '{s}'")))
    }
}

/// Recipe difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse a filter argument: `all` or empty means no filter.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an unknown difficulty.
    pub fn parse_filter(s: &str) -> Result<Option<Self>> {
        parse_filter(s)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(Error::InvalidArgument(format!("unknown difficulty '{s}'"))),
        }
    }
}

fn parse_filter<T: FromStr<Err = Error>>(s: &str) -> Result<Option<T>> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FILTER_ALL) {
        Ok(None)
    } else {
        trimmed.parse().map(Some)
    }
}
