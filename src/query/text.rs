//! Text rendering and arithmetic helpers.

use crate::model::{Ingredient, Recipe};
use regex::Regex;
use std::sync::LazyLock;

/// `<amount> [unit] <name>`; the unit is only taken when whitespace follows it.
static INGREDIENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+(?:\.[0-9]*)?)\s*(?:(\w+)\s+)?(.+)$")
        .expect("failed to compile ingredient line regex")
});

/// `prep + cook`, saturating.
#[must_use]
pub const fn calculate_total_time(prep_time: u32, cook_time: u32) -> u32 {
    prep_time.saturating_add(cook_time)
}

/// Round half-up to `places` decimals.
#[must_use]
pub fn round_to_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor + 0.5).floor() / factor
}

/// German short form used in share text: `45 Min.`, `2 Std.`, `1 Std. 30 Min.`.
#[must_use]
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} Min.");
    }

    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest == 0 {
        format!("{hours} Std.")
    } else {
        format!("{hours} Std. {rest} Min.")
    }
}

/// Plain-text rendering of a recipe for sharing.
///
/// Ingredient and step sections are left out entirely when empty. The
/// duration line uses the stored `total_time`.
#[must_use]
pub fn generate_recipe_share_text(recipe: &Recipe) -> String {
    let mut lines: Vec<String> = vec![
        format!("🍽️ {}", recipe.name),
        String::new(),
        recipe.description.clone(),
        String::new(),
        format!("⏱️ Zubereitung: {}", format_duration(recipe.total_time)),
        format!("👥 Portionen: {}", recipe.servings),
    ];

    if !recipe.ingredients.is_empty() {
        lines.push(String::new());
        lines.push("📝 Zutaten:".to_string());
        for ing in &recipe.ingredients {
            lines.push(format!("• {} {} {}", ing.amount, ing.unit, ing.name));
        }
    }

    if !recipe.steps.is_empty() {
        lines.push(String::new());
        lines.push("👨‍🍳 Zubereitung:".to_string());
        for (i, step) in recipe.steps.iter().enumerate() {
            lines.push(format!("{}. {step}", i + 1));
        }
    }

    lines.push(String::new());
    lines.push("Guten Appetit! 🍴".to_string());
    lines.join("\n")
}

/// Scale amounts from `default_servings` to `target_servings`, two decimals.
///
/// A `default_servings` of `0` returns the ingredients unchanged.
#[must_use]
pub fn scale_ingredients(
    ingredients: &[Ingredient],
    target_servings: u32,
    default_servings: u32,
) -> Vec<Ingredient> {
    if default_servings == 0 {
        return ingredients.to_vec();
    }

    let factor = f64::from(target_servings) / f64::from(default_servings);
    ingredients
        .iter()
        .map(|ing| Ingredient {
            amount: round_to_decimals(ing.amount * factor, 2),
            ..ing.clone()
        })
        .collect()
}

/// Parse one ingredient per non-blank line, e.g. `200 g Mehl`.
///
/// Lines that do not start with a number become `amount = 0`, `unit = ""`
/// with the whole trimmed line as the name. Returned ingredients have no id.
#[must_use]
pub fn extract_ingredients_from_text(text: &str) -> Vec<Ingredient> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_ingredient_line)
        .collect()
}

fn parse_ingredient_line(line: &str) -> Ingredient {
    let Some(caps) = INGREDIENT_LINE.captures(line) else {
        return Ingredient::new(line, 0.0, "");
    };

    let amount = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0);
    let unit = caps.get(2).map_or("", |m| m.as_str());
    let name = caps.get(3).map_or(line, |m| m.as_str().trim());
    Ingredient::new(name, amount, unit)
}
