//! Error types for RecipeBox.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=storage, 3=not_found, 4=validation, etc.)
//! - Retryability flags
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Business-rule misses (unknown recipe id on update/delete) are returned by
//! the store as `None` / `false`. Only the CLI lifts them into
//! [`Error::RecipeNotFound`].

use thiserror::Error;

/// Result type alias for RecipeBox operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Storage (exit 2)
    StorageFailure,
    DatabaseError,

    // Not Found (exit 3)
    RecipeNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::StorageFailure => "STORAGE_FAILURE",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::RecipeNotFound => "RECIPE_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::StorageFailure | Self::DatabaseError => 2,
            Self::RecipeNotFound => 3,
            Self::InvalidArgument => 4,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }

    /// Whether retrying the same call may succeed.
    ///
    /// True for storage failures (the adapter may recover) and for input
    /// errors that can be corrected by the caller.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StorageFailure | Self::DatabaseError | Self::InvalidArgument
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in RecipeBox operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Recipe not found: {id}")]
    RecipeNotFound { id: String },

    #[error("Storage failure during {op}: {message}")]
    Storage { op: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a storage failure for the named adapter operation.
    pub fn storage(op: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            op,
            message: message.into(),
        }
    }

    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::RecipeNotFound { .. } => ErrorCode::RecipeNotFound,
            Self::Storage { .. } => ErrorCode::StorageFailure,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Whether this error came from the durable storage boundary.
    #[must_use]
    pub const fn is_storage_failure(&self) -> bool {
        matches!(self, Self::Storage { .. } | Self::Database(_))
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::RecipeNotFound { id } => Some(format!(
                "No recipe with ID '{id}'. Use `rb list` to see available recipes."
            )),

            Self::Storage { .. } | Self::Database(_) => Some(
                "The in-memory view may be ahead of the database until the next successful write.\n  \
                 Check the database path with `rb --db <path>` or run with -v for details."
                    .to_string(),
            ),

            Self::InvalidArgument(msg) => {
                if msg.contains("category") {
                    Some(
                        "Valid categories: appetizer, soup, salad, main-course, side-dish, \
                         dessert, drink, snack, breakfast, other (or `all`)"
                            .to_string(),
                    )
                } else if msg.contains("difficulty") {
                    Some("Valid difficulties: easy, medium, hard (or `all`)".to_string())
                } else if msg.contains("sort") {
                    Some("Valid sort modes: newest, oldest, rating, name, quick".to_string())
                } else {
                    None
                }
            }

            Self::Io(_) | Self::Json(_) | Self::Config(_) | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_exit_3() {
        let err = Error::RecipeNotFound {
            id: "abc".to_string(),
        };
        assert_eq!(err.error_code(), ErrorCode::RecipeNotFound);
        assert_eq!(err.exit_code(), 3);
        assert!(!err.error_code().is_retryable());
        assert!(err.hint().unwrap().contains("rb list"));
    }

    #[test]
    fn test_storage_failure_is_retryable() {
        let err = Error::storage("set", "disk full");
        assert!(err.is_storage_failure());
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "Storage failure during set: disk full");
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::InvalidArgument("unknown category 'pizza'".to_string());
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "INVALID_ARGUMENT");
        assert_eq!(json["error"]["exit_code"], 4);
        assert!(json["error"]["hint"].as_str().unwrap().contains("main-course"));
    }
}
