//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// RecipeBox - local-first recipe storage
#[derive(Parser, Debug)]
#[command(name = "rb", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.recipebox/data/recipes.db)
    #[arg(long, global = true, env = "RB_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the recipe ID (for scripting)
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// Add a recipe
    Add(AddArgs),

    /// Show a recipe
    Show {
        /// Recipe ID
        id: String,

        /// Scale ingredient amounts to this many servings
        #[arg(long)]
        servings: Option<u32>,
    },

    /// List, search and filter recipes
    List(ListArgs),

    /// Update a recipe
    Update(UpdateArgs),

    /// Delete a recipe
    Delete {
        /// Recipe ID
        id: String,
    },

    /// Replace the whole collection with recipes from a JSON file
    Seed {
        /// JSON file holding an array of recipes
        file: PathBuf,
    },

    /// Print a recipe as shareable text
    Share {
        /// Recipe ID
        id: String,
    },

    /// Suggest random recipes
    Suggest {
        /// Number of suggestions
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },

    /// Rating statistics
    Stats {
        /// Ratings to summarize (default: stored recipe ratings)
        #[arg(allow_negative_numbers = true)]
        ratings: Vec<i32>,
    },

    /// Print this installation's user ID
    Whoami,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Recipe Commands
// ============================================================================

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Recipe name
    pub name: String,

    /// Short description
    #[arg(long, short, default_value = "")]
    pub description: String,

    /// Category (appetizer, soup, salad, main-course, side-dish, dessert, drink, snack, breakfast, other)
    #[arg(long, short, default_value = "main-course")]
    pub category: String,

    /// Preparation time in minutes
    #[arg(long, default_value_t = 0)]
    pub prep: u32,

    /// Cooking time in minutes
    #[arg(long, default_value_t = 0)]
    pub cook: u32,

    /// Number of servings
    #[arg(long, short, default_value_t = crate::model::DEFAULT_SERVINGS)]
    pub servings: u32,

    /// Difficulty (easy, medium, hard)
    #[arg(long, default_value = "easy")]
    pub difficulty: String,

    /// Ingredient line, e.g. "200 g Mehl" (repeatable)
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,

    /// Preparation step (repeatable, in order)
    #[arg(long = "step")]
    pub steps: Vec<String>,

    /// Tag (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Mark the recipe as public
    #[arg(long)]
    pub public: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Search name, description and tags
    #[arg(long, short)]
    pub search: Option<String>,

    /// Require an ingredient containing this text (repeatable, all must match)
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,

    /// Category filter (`all` for none)
    #[arg(long, short, default_value = "all")]
    pub category: String,

    /// Difficulty filter (`all` for none)
    #[arg(long, default_value = "all")]
    pub difficulty: String,

    /// Maximum total time in minutes (0 = no limit)
    #[arg(long, default_value_t = 0)]
    pub max_time: u32,

    /// Sort order (newest, oldest, rating, name, quick)
    #[arg(long, default_value = "newest")]
    pub sort: String,

    /// Maximum number of recipes to show
    #[arg(long, short)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Recipe ID
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New description
    #[arg(long, short)]
    pub description: Option<String>,

    /// New category
    #[arg(long, short)]
    pub category: Option<String>,

    /// New preparation time in minutes
    #[arg(long)]
    pub prep: Option<u32>,

    /// New cooking time in minutes
    #[arg(long)]
    pub cook: Option<u32>,

    /// New number of servings
    #[arg(long, short)]
    pub servings: Option<u32>,

    /// New difficulty
    #[arg(long)]
    pub difficulty: Option<String>,

    /// Replace ingredients (repeatable)
    #[arg(long = "ingredient", short = 'i')]
    pub ingredients: Vec<String>,

    /// Replace steps (repeatable)
    #[arg(long = "step")]
    pub steps: Vec<String>,

    /// Replace tags (repeatable)
    #[arg(long = "tag", short = 't')]
    pub tags: Vec<String>,

    /// Mark or unmark as favorite
    #[arg(long)]
    pub favorite: Option<bool>,

    /// Set the rating
    #[arg(long)]
    pub rating: Option<f64>,

    /// Mark or unmark as public
    #[arg(long)]
    pub public: Option<bool>,
}
