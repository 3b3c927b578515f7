//! # Catalog Store Crate
//!
//! Loads a pipe-delimited movies catalog and a ratings file into memory and
//! answers aggregate queries over them.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Movie, Rating, RankedEntry, CatalogStore)
//! - **parser**: Line parsing and file-level validation
//! - **index**: Loading parsed files into the store
//! - **ranking**: Top movies, top genres, preferred genre, recommendations
//! - **error**: Error types for loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog_store::CatalogStore;
//!
//! let mut store = CatalogStore::new();
//! store.load_movies("data/movies.txt")?;
//! store.load_ratings("data/ratings.txt")?;
//!
//! for row in store.top_movies(3) {
//!     println!("{} {:.2} ({})", row.name, row.average, row.count);
//! }
//! if let Some(pref) = store.user_preferred_genre("u1") {
//!     println!("u1 prefers {}", pref.genre);
//! }
//! ```
//!
//! Loads replace state wholesale: `load_movies` replaces the catalog and
//! `load_ratings` replaces every rating. Ratings only stick to movies that
//! are loaded at that moment, so load movies first.

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod ranking;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result};
pub use types::{
    // Type aliases
    MovieName,
    UserId,
    // Core types
    CatalogStore,
    GenrePreference,
    Movie,
    RankedEntry,
    Rating,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_creation() {
        let store = CatalogStore::new();
        let (movies, ratings, users) = store.counts();

        assert_eq!(movies, 0);
        assert_eq!(ratings, 0);
        assert_eq!(users, 0);
    }

    #[test]
    fn test_empty_queries() {
        let store = CatalogStore::new();

        assert!(store.get_movie("Heat").is_none());
        assert!(store.get_user_ratings("u1").is_empty());
        assert!(store.get_movie_ratings("Heat").is_empty());
        assert!(store.get_movies_by_genre("Action").is_empty());
        assert!(store.top_movies(10).is_empty());
        assert!(store.top_genres(10).is_empty());
    }
}
