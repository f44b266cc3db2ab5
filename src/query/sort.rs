//! Sort modes.

use crate::model::Recipe;
use std::fmt;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Ordering applied by [`sort_recipes`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Most recently created first.
    Newest,
    Oldest,
    /// Highest rating first.
    Rating,
    /// Alphabetical by name.
    Name,
    /// Shortest total time first.
    Quick,
    /// Input order, for any mode name that is not recognized.
    #[default]
    Original,
}

impl SortMode {
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::Oldest,
        Self::Rating,
        Self::Name,
        Self::Quick,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Rating => "rating",
            Self::Name => "name",
            Self::Quick => "quick",
            Self::Original => "original",
        }
    }
}

impl From<&str> for SortMode {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "newest" => Self::Newest,
            "oldest" => Self::Oldest,
            "rating" => Self::Rating,
            "name" => Self::Name,
            "quick" => Self::Quick,
            _ => Self::Original,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Return a sorted copy of `recipes`.
///
/// The sort is stable, so recipes that compare equal keep their input order.
#[must_use]
pub fn sort_recipes(recipes: &[Recipe], mode: SortMode) -> Vec<Recipe> {
    let mut out = recipes.to_vec();
    match mode {
        SortMode::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortMode::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortMode::Rating => out.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortMode::Name => out.sort_by_cached_key(|r| (collation_key(&r.name), r.name.clone())),
        SortMode::Quick => out.sort_by_key(|r| r.total_time),
        SortMode::Original => {}
    }
    out
}

/// Primary-strength sort key: accents and case are ignored, `ß` folds to `ss`.
///
/// `Äpfel` sorts with `Apfel`, ahead of `Birnen`. Callers break ties on the
/// exact text.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .fold(String::with_capacity(name.len()), |mut key, c| {
            if c == 'ß' {
                key.push_str("ss");
            } else {
                key.push(c);
            }
            key
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::fixtures::recipe;

    fn ids(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_from_str() {
        assert_eq!(SortMode::from("newest"), SortMode::Newest);
        assert_eq!(SortMode::from(" Quick "), SortMode::Quick);
        assert_eq!(SortMode::from("popular"), SortMode::Original);
        for mode in SortMode::ALL {
            assert_eq!(SortMode::from(mode.as_str()), mode);
        }
    }

    #[test]
    fn test_time_ordering() {
        // Fixture created_at grows with total_time.
        let recipes = vec![
            recipe("mid", "B", &[], 20),
            recipe("old", "C", &[], 5),
            recipe("new", "A", &[], 60),
        ];
        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Newest)), vec!["new", "mid", "old"]);
        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Oldest)), vec!["old", "mid", "new"]);
        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Quick)), vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_rating_is_stable() {
        let mut a = recipe("a", "A", &[], 10);
        a.rating = 4.0;
        let mut b = recipe("b", "B", &[], 11);
        b.rating = 5.0;
        let mut c = recipe("c", "C", &[], 12);
        c.rating = 4.0;
        let recipes = vec![a, b, c];

        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Rating)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_name_folds_umlauts() {
        let recipes = vec![
            recipe("z", "Zwiebelkuchen", &[], 1),
            recipe("ae", "Äpfelstrudel", &[], 2),
            recipe("b", "Birnenkompott", &[], 3),
            recipe("a", "Apfelmus", &[], 4),
            recipe("s", "Süßspeise", &[], 5),
            recipe("e", "éclair", &[], 6),
        ];
        assert_eq!(
            ids(&sort_recipes(&recipes, SortMode::Name)),
            vec!["a", "ae", "b", "e", "s", "z"]
        );
    }

    #[test]
    fn test_collation_key() {
        assert_eq!(collation_key("Äpfel"), "apfel");
        assert_eq!(collation_key("Straße"), "strasse");
        assert_eq!(collation_key("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn test_name_ties_break_on_exact_text() {
        let recipes = vec![recipe("2", "Äpfel", &[], 1), recipe("1", "Apfel", &[], 2)];
        // Both fold to "apfel"; the exact text decides.
        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Name)), vec!["1", "2"]);
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let recipes = vec![
            recipe("1", "banana bread", &[], 1),
            recipe("2", "Apple pie", &[], 2),
            recipe("3", "Cherry cake", &[], 3),
        ];
        assert_eq!(ids(&sort_recipes(&recipes, SortMode::Name)), vec!["2", "1", "3"]);
    }

    #[test]
    fn test_input_is_untouched() {
        let recipes = vec![recipe("b", "B", &[], 2), recipe("a", "A", &[], 1)];
        let before = recipes.clone();
        let sorted = sort_recipes(&recipes, SortMode::Name);
        assert_eq!(recipes, before);
        assert_eq!(ids(&sorted), vec!["a", "b"]);
        assert_eq!(sort_recipes(&recipes, SortMode::Original), recipes);
    }
}
