//! RecipeBox - local-first recipe storage
//!
//! This crate provides the core functionality for the `rb` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Recipe, Ingredient, vocabularies)
//! - [`storage`] - Key-value adapters and the cached record store
//! - [`query`] - Pure search, filter, sort and statistics functions
//! - [`identity`] - Per-installation user id
//! - [`config`] - Database path resolution
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod model;
pub mod query;
pub mod storage;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, mutating commands print only the recipe id instead of full
/// output. Avoids threading a `silent` bool through every handler signature.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
