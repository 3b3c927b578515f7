//! Loading the catalog files into a `CatalogStore`.
//!
//! Each load parses the whole file first and only then swaps the freshly
//! built tables into the store, so a failed load leaves the previous
//! tables untouched.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

impl CatalogStore {
    /// Load a movies file (`genre|id|name` per line), replacing every
    /// previously loaded movie.
    ///
    /// Ratings already loaded are kept as they are; reload the ratings
    /// file after changing the movie set.
    pub fn load_movies(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Loading movies from {}", path.display());
        let file = File::open(path)?;
        self.load_movies_from_reader(BufReader::new(file))
    }

    /// Same as [`CatalogStore::load_movies`] but reads from any buffered reader
    pub fn load_movies_from_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let movies = parser::parse_movies(reader)?;

        let mut by_name = HashMap::with_capacity(movies.len());
        let mut catalog_order = Vec::with_capacity(movies.len());
        let mut genre_index: HashMap<String, Vec<MovieName>> = HashMap::new();

        for movie in movies {
            catalog_order.push(movie.name.clone());
            genre_index
                .entry(movie.genre.clone())
                .or_default()
                .push(movie.name.clone());
            by_name.insert(movie.name.clone(), movie);
        }

        self.movies = by_name;
        self.catalog_order = catalog_order;
        self.genre_index = genre_index;

        info!(
            "Loaded {} movies across {} genres",
            self.movies.len(),
            self.genre_index.len()
        );
        Ok(())
    }

    /// Load a ratings file (`movie_name|rating|user_id` per line), replacing
    /// every previously loaded rating.
    ///
    /// Ratings for movies that are not in the current catalog are accepted
    /// and discarded.
    pub fn load_ratings(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Loading ratings from {}", path.display());
        let file = File::open(path)?;
        self.load_ratings_from_reader(BufReader::new(file))
    }

    /// Same as [`CatalogStore::load_ratings`] but reads from any buffered reader
    pub fn load_ratings_from_reader<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let ratings = parser::parse_ratings(reader)?;
        let total = ratings.len();

        let mut movie_ratings: HashMap<MovieName, Vec<Rating>> = HashMap::new();
        let mut user_ratings: HashMap<UserId, Vec<Rating>> = HashMap::new();
        let mut dropped = 0usize;

        for rating in ratings {
            if !self.movies.contains_key(&rating.movie_name) {
                debug!(
                    "Dropping rating by {} for unknown movie {}",
                    rating.user_id, rating.movie_name
                );
                dropped += 1;
                continue;
            }
            user_ratings
                .entry(rating.user_id.clone())
                .or_default()
                .push(rating.clone());
            movie_ratings
                .entry(rating.movie_name.clone())
                .or_default()
                .push(rating);
        }

        self.movie_ratings = movie_ratings;
        self.user_ratings = user_ratings;

        info!(
            "Loaded {} ratings from {} users ({} dropped for unknown movies)",
            total - dropped,
            self.user_ratings.len(),
            dropped
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    const MOVIES: &str = "Action|m001|Heat\nDrama|m002|Ran\nAction|m003|Ronin\n";

    fn loaded_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        store.load_movies_from_reader(MOVIES.as_bytes()).unwrap();
        store
    }

    #[test]
    fn test_load_movies_builds_indices() {
        let store = loaded_store();

        assert_eq!(store.counts(), (3, 0, 0));
        assert_eq!(store.get_movie("Ran").unwrap().genre, "Drama");
        assert_eq!(store.get_movies_by_genre("Action"), ["Heat", "Ronin"]);
        assert!(store.get_movies_by_genre("action").is_empty());
        assert_eq!(store.genres(), vec!["Action", "Drama"]);

        let names: Vec<&str> = store.movies().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Heat", "Ran", "Ronin"]);
    }

    #[test]
    fn test_unknown_movie_ratings_are_dropped() {
        let mut store = loaded_store();
        store
            .load_ratings_from_reader("Heat|4.0|u1\nAlien|5.0|u1\nRan|3.0|u2\n".as_bytes())
            .unwrap();

        assert_eq!(store.counts(), (3, 2, 2));
        assert_eq!(store.get_user_ratings("u1").len(), 1);
        assert!(store.get_movie_ratings("Alien").is_empty());
    }

    #[test]
    fn test_ratings_before_movies_retain_nothing() {
        let mut store = CatalogStore::new();
        store.load_ratings_from_reader("Heat|4.0|u1".as_bytes()).unwrap();
        assert_eq!(store.counts(), (0, 0, 0));
    }

    #[test]
    fn test_failed_movie_load_keeps_previous_catalog() {
        let mut store = loaded_store();
        let err = store
            .load_movies_from_reader("Comedy|m9|Airplane\nComedy|m9|Airplane".as_bytes())
            .unwrap_err();

        assert!(matches!(err, CatalogError::DuplicateMovie { .. }));
        assert_eq!(store.counts().0, 3);
        assert!(store.get_movie("Airplane").is_none());
    }

    #[test]
    fn test_failed_rating_load_keeps_previous_ratings() {
        let mut store = loaded_store();
        store.load_ratings_from_reader("Heat|4.0|u1".as_bytes()).unwrap();

        let err = store
            .load_ratings_from_reader("Ran|3.0|u2\nRonin|9|u2".as_bytes())
            .unwrap_err();

        assert!(matches!(err, CatalogError::RatingOutOfRange { line: 2, .. }));
        assert_eq!(store.get_user_ratings("u1").len(), 1);
        assert!(store.get_user_ratings("u2").is_empty());
    }

    #[test]
    fn test_reload_replaces_ratings() {
        let mut store = loaded_store();
        store.load_ratings_from_reader("Heat|4.0|u1".as_bytes()).unwrap();
        store.load_ratings_from_reader("Ran|2.0|u2".as_bytes()).unwrap();

        assert!(store.get_user_ratings("u1").is_empty());
        assert_eq!(store.get_movie_ratings("Ran").len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut store = CatalogStore::new();
        let err = store.load_movies("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
