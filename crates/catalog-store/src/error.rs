//! Error types for the catalog-store crate.
//!
//! Every variant except `Io` is a validation failure raised while a
//! catalog file is being loaded. Queries never fail: unknown genres,
//! unknown users and non-positive limits just produce empty results.

use thiserror::Error;

/// Errors that can occur while loading the movies or ratings catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be opened or read (including invalid UTF-8)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A non-blank line did not split into exactly three `|` fields
    #[error("{file} line {line} malformed: {raw}")]
    MalformedLine {
        file: &'static str,
        line: usize,
        raw: String,
    },

    /// The same movie name appeared twice in one movies file
    #[error("Duplicate movie at line {line}: {name}")]
    DuplicateMovie { name: String, line: usize },

    /// The rating field is not a number
    #[error("Invalid rating at line {line}: {value}")]
    InvalidRating { line: usize, value: String },

    /// The rating parsed but falls outside [0, 5]
    #[error("Rating out of range [0,5] at line {line}: {value}")]
    RatingOutOfRange { line: usize, value: f64 },

    /// The same (user, movie) pair appeared twice in one ratings file
    #[error("Duplicate rating for {movie_name} by {user_id} at line {line}")]
    DuplicateRating {
        user_id: String,
        movie_name: String,
        line: usize,
    },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
