//! Aggregate queries over a loaded `CatalogStore`.
//!
//! Every ranking sorts descending by the tuple `(average, count, name)`:
//! highest average first, then most ratings, then the name that sorts
//! *last* alphabetically. Movies without ratings never appear.

use crate::types::*;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl CatalogStore {
    /// Arithmetic mean of a movie's retained ratings, `None` when it has none
    pub fn average_rating(&self, name: &str) -> Option<f64> {
        mean(self.get_movie_ratings(name).iter().map(|r| r.value))
    }

    /// The `n` best-rated movies in the catalog
    pub fn top_movies(&self, n: usize) -> Vec<RankedEntry> {
        let rows = self.rank_movies(&self.catalog_order, |_| true);
        top_n(rows, n)
    }

    /// The `n` best-rated movies whose genre equals `genre` exactly
    pub fn top_movies_in_genre(&self, genre: &str, n: usize) -> Vec<RankedEntry> {
        let rows = self.rank_movies(self.get_movies_by_genre(genre), |_| true);
        top_n(rows, n)
    }

    /// The `n` best genres by the mean of their rated movies' averages.
    ///
    /// Each rated movie counts once regardless of how many ratings it has;
    /// `count` is the number of rated movies in the genre.
    pub fn top_genres(&self, n: usize) -> Vec<RankedEntry> {
        let mut genre_averages: HashMap<&str, Vec<f64>> = HashMap::new();
        for movie in self.movies() {
            if let Some(avg) = self.average_rating(&movie.name) {
                genre_averages.entry(&movie.genre).or_default().push(avg);
            }
        }

        let rows = genre_averages
            .into_iter()
            .filter_map(|(genre, averages)| {
                Some(RankedEntry {
                    name: genre.to_string(),
                    average: mean(averages.iter().copied())?,
                    count: averages.len(),
                })
            })
            .collect();
        top_n(rows, n)
    }

    /// The genre with the highest mean of per-movie averages among the
    /// movies this user rated. Ties go to the genre name sorting last.
    pub fn user_preferred_genre(&self, user_id: &str) -> Option<GenrePreference> {
        let mut genre_averages: HashMap<&str, Vec<f64>> = HashMap::new();
        for rating in self.get_user_ratings(user_id) {
            let Some(movie) = self.get_movie(&rating.movie_name) else {
                continue;
            };
            let Some(avg) = self.average_rating(&movie.name) else {
                continue;
            };
            genre_averages.entry(&movie.genre).or_default().push(avg);
        }

        genre_averages
            .into_iter()
            .filter_map(|(genre, averages)| {
                Some(GenrePreference {
                    genre: genre.to_string(),
                    average: mean(averages.into_iter())?,
                })
            })
            .max_by(|a, b| {
                a.average
                    .total_cmp(&b.average)
                    .then_with(|| a.genre.cmp(&b.genre))
            })
    }

    /// Up to `k` movies from the user's preferred genre that the user has
    /// not rated yet, ranked like [`CatalogStore::top_movies`].
    pub fn recommend_for_user(&self, user_id: &str, k: usize) -> Vec<RankedEntry> {
        let Some(preference) = self.user_preferred_genre(user_id) else {
            debug!("No preferred genre for user {}", user_id);
            return Vec::new();
        };

        let rated: HashSet<&str> = self
            .get_user_ratings(user_id)
            .iter()
            .map(|r| r.movie_name.as_str())
            .collect();

        let rows = self.rank_movies(self.get_movies_by_genre(&preference.genre), |name| {
            !rated.contains(name)
        });
        debug!(
            "{} unrated candidates in {} for user {}",
            rows.len(),
            preference.genre,
            user_id
        );
        top_n(rows, k)
    }

    /// Compute `(name, average, count)` for every rated movie in `names`
    /// that passes `keep`, in the order of `names`.
    fn rank_movies<F>(&self, names: &[MovieName], keep: F) -> Vec<RankedEntry>
    where
        F: Fn(&str) -> bool + Sync,
    {
        names
            .par_iter()
            .filter(|name| keep(name.as_str()))
            .filter_map(|name| {
                let ratings = self.get_movie_ratings(name);
                Some(RankedEntry {
                    name: name.clone(),
                    average: self.average_rating(name)?,
                    count: ratings.len(),
                })
            })
            .collect()
    }
}

/// Descending `(average, count, name)` order
fn by_rank_desc(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.average
        .total_cmp(&a.average)
        .then_with(|| b.count.cmp(&a.count))
        .then_with(|| b.name.cmp(&a.name))
}

/// Sort rows by rank and keep the first `n`
fn top_n(mut rows: Vec<RankedEntry>, n: usize) -> Vec<RankedEntry> {
    rows.sort_by(by_rank_desc);
    rows.truncate(n);
    rows
}

/// Arithmetic mean, `None` for an empty sequence
fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(movies: &str, ratings: &str) -> CatalogStore {
        let mut store = CatalogStore::new();
        store.load_movies_from_reader(movies.as_bytes()).unwrap();
        store.load_ratings_from_reader(ratings.as_bytes()).unwrap();
        store
    }

    fn names(rows: &[RankedEntry]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean([1.0, 2.0, 4.5].into_iter()), Some(2.5));
        assert_eq!(mean(std::iter::empty()), None);
    }

    #[test]
    fn test_ties_break_by_count_then_name_descending() {
        let s = store(
            "G|1|Alpha\nG|2|Bravo\nG|3|Charlie\nG|4|Delta\n",
            "Alpha|4|u1\nAlpha|4|u2\nBravo|4|u1\nCharlie|4|u1\nDelta|3|u1\n",
        );

        let rows = s.top_movies(10);
        assert_eq!(names(&rows), vec!["Alpha", "Charlie", "Bravo", "Delta"]);
        assert_eq!(rows[0].count, 2);
    }

    #[test]
    fn test_unrated_movies_excluded_and_zero_limit_is_empty() {
        let s = store("G|1|Alpha\nG|2|Bravo\n", "Alpha|2.5|u1\n");

        assert_eq!(names(&s.top_movies(10)), vec!["Alpha"]);
        assert!(s.top_movies(0).is_empty());
        assert_eq!(s.average_rating("Bravo"), None);
    }

    #[test]
    fn test_genre_average_weights_movies_equally() {
        // Alpha averages 5.0 over three ratings, Bravo 1.0 over one.
        let s = store(
            "G|1|Alpha\nG|2|Bravo\nH|3|Charlie\n",
            "Alpha|5|u1\nAlpha|5|u2\nAlpha|5|u3\nBravo|1|u1\nCharlie|2.5|u1\n",
        );

        let rows = s.top_genres(10);
        assert_eq!(rows[0].name, "G");
        assert_eq!(rows[0].average, 3.0);
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].name, "H");
    }

    #[test]
    fn test_genre_without_rated_movies_is_excluded() {
        let s = store("G|1|Alpha\nH|2|Bravo\n", "Alpha|3|u1\n");
        assert_eq!(names(&s.top_genres(10)), vec!["G"]);
    }

    #[test]
    fn test_unknown_genre_and_user_yield_nothing() {
        let s = store("G|1|Alpha\n", "Alpha|3|u1\n");

        assert!(s.top_movies_in_genre("g", 5).is_empty());
        assert!(s.user_preferred_genre("nobody").is_none());
        assert!(s.recommend_for_user("nobody", 5).is_empty());
    }

    #[test]
    fn test_preferred_genre_tie_goes_to_later_name() {
        let s = store("Action|1|Alpha\nDrama|2|Bravo\n", "Alpha|4|u1\nBravo|4|u1\n");

        let pref = s.user_preferred_genre("u1").unwrap();
        assert_eq!(pref.genre, "Drama");
        assert_eq!(pref.average, 4.0);
    }

    #[test]
    fn test_recommendations_skip_rated_movies() {
        let s = store(
            "G|1|Alpha\nG|2|Bravo\nG|3|Charlie\nH|4|Delta\n",
            "Alpha|5|u1\nBravo|3|u2\nCharlie|4|u2\nDelta|5|u2\n",
        );

        let recs = s.recommend_for_user("u1", 5);
        assert_eq!(names(&recs), vec!["Charlie", "Bravo"]);
        assert!(s.recommend_for_user("u1", 0).is_empty());
    }
}
