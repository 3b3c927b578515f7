//! Core domain types for the movie catalog.
//!
//! Movies are keyed by name; the `id` column of the movies file is kept
//! for display only. Ratings refer to movies by name as well.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Type Aliases
// =============================================================================

/// Free-form user identifier from the ratings file (e.g. "u1")
pub type UserId = String;

/// Movie name, the unique key of the catalog
pub type MovieName = String;

// =============================================================================
// Records
// =============================================================================

/// A movie from the movies file (`genre|id|name`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Informational only, never used by queries
    pub id: String,
    pub name: MovieName,
    /// Matched exactly (case-sensitive) by genre queries
    pub genre: String,
}

/// A single user-to-movie score from the ratings file (`movie|rating|user`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_name: MovieName,
    /// Always within [0.0, 5.0]
    pub value: f64,
}

// =============================================================================
// Query Results
// =============================================================================

/// One row of a ranked result.
///
/// For movie rankings `name` is the movie name and `count` the number of
/// ratings; for genre rankings `name` is the genre and `count` the number of
/// rated movies that contributed to the average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub name: String,
    pub average: f64,
    pub count: usize,
}

/// The genre a user rates highest, with its mean of per-movie averages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenrePreference {
    pub genre: String,
    pub average: f64,
}

// =============================================================================
// CatalogStore - the in-memory catalog
// =============================================================================

/// Owns the loaded movies and ratings and answers the ranking queries.
///
/// `load_movies` replaces the movie tables; `load_ratings` replaces both
/// rating tables. Ratings are only retained for movies present at the time
/// the ratings file is loaded, so movies should be loaded first.
#[derive(Debug, Default)]
pub struct CatalogStore {
    // Movie tables, always replaced together
    pub(crate) movies: HashMap<MovieName, Movie>,
    /// Movie names in file order
    pub(crate) catalog_order: Vec<MovieName>,
    /// Movie names per genre, in file order
    pub(crate) genre_index: HashMap<String, Vec<MovieName>>,

    // Rating tables, always replaced together
    pub(crate) movie_ratings: HashMap<MovieName, Vec<Rating>>,
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
}

impl CatalogStore {
    /// Creates a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a movie by name
    pub fn get_movie(&self, name: &str) -> Option<&Movie> {
        self.movies.get(name)
    }

    /// All movies in the order they appeared in the movies file
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.catalog_order
            .iter()
            .filter_map(|name| self.movies.get(name))
    }

    /// Ratings retained for a movie, in file order
    pub fn get_movie_ratings(&self, name: &str) -> &[Rating] {
        self.movie_ratings
            .get(name)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Ratings retained for a user, in file order
    pub fn get_user_ratings(&self, user_id: &str) -> &[Rating] {
        self.user_ratings
            .get(user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Movie names in a genre (exact match), in file order
    pub fn get_movies_by_genre(&self, genre: &str) -> &[MovieName] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Every genre in the catalog, sorted
    pub fn genres(&self) -> Vec<&str> {
        let mut genres: Vec<&str> = self.genre_index.keys().map(String::as_str).collect();
        genres.sort_unstable();
        genres
    }

    /// (movies, retained ratings, users with retained ratings)
    pub fn counts(&self) -> (usize, usize, usize) {
        let total_ratings = self.movie_ratings.values().map(|v| v.len()).sum();
        (self.movies.len(), total_ratings, self.user_ratings.len())
    }
}
