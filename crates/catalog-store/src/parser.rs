//! Parser for the pipe-delimited catalog files.
//!
//! - movies:  `genre|id|name`
//! - ratings: `movie_name|rating|user_id`
//!
//! Lines are numbered from 1, blank lines are skipped and every field is
//! trimmed. Validation that only needs the file itself (field counts,
//! rating values, duplicates) happens here; filtering against the loaded
//! catalog happens in `index`.

use crate::error::{CatalogError, Result};
use crate::types::{Movie, Rating};
use std::collections::HashSet;
use std::io::BufRead;

/// Number of `|`-separated fields on every line of both files
const FIELD_COUNT: usize = 3;

/// Inclusive bounds of a valid rating
const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 5.0;

/// Split a trimmed line into exactly three trimmed fields
fn split_fields<'a>(file: &'static str, line_no: usize, line: &'a str) -> Result<[&'a str; 3]> {
    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [a, b, c] => Ok([*a, *b, *c]),
        _ => Err(CatalogError::MalformedLine {
            file,
            line: line_no,
            raw: line.to_string(),
        }),
    }
}

/// Walk the non-blank lines of a reader, passing (line number, trimmed line)
fn for_each_line<R, F>(reader: R, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<()>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        f(idx + 1, trimmed)?;
    }
    Ok(())
}

/// Parse a movies file, rejecting repeated names.
///
/// Movies are returned in file order.
pub fn parse_movies<R: BufRead>(reader: R) -> Result<Vec<Movie>> {
    let mut movies = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for_each_line(reader, |line_no, line| {
        let [genre, id, name] = split_fields("movies", line_no, line)?;

        if !seen.insert(name.to_string()) {
            return Err(CatalogError::DuplicateMovie {
                name: name.to_string(),
                line: line_no,
            });
        }

        movies.push(Movie {
            id: id.to_string(),
            name: name.to_string(),
            genre: genre.to_string(),
        });
        Ok(())
    })?;

    Ok(movies)
}

/// Parse a ratings file.
///
/// Each `(user_id, movie_name)` pair may appear only once per file, whether
/// or not the movie is in any catalog. Ratings are returned in file order.
pub fn parse_ratings<R: BufRead>(reader: R) -> Result<Vec<Rating>> {
    let mut ratings = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for_each_line(reader, |line_no, line| {
        let [movie_name, rating_str, user_id] = split_fields("ratings", line_no, line)?;
        let value = parse_rating_value(line_no, rating_str)?;

        if !seen.insert((user_id.to_string(), movie_name.to_string())) {
            return Err(CatalogError::DuplicateRating {
                user_id: user_id.to_string(),
                movie_name: movie_name.to_string(),
                line: line_no,
            });
        }

        ratings.push(Rating {
            user_id: user_id.to_string(),
            movie_name: movie_name.to_string(),
            value,
        });
        Ok(())
    })?;

    Ok(ratings)
}

/// Parse a rating field and check it lies within [0, 5]
///
/// NaN fails the range check.
fn parse_rating_value(line_no: usize, s: &str) -> Result<f64> {
    let value: f64 = s.parse().map_err(|_| CatalogError::InvalidRating {
        line: line_no,
        value: s.to_string(),
    })?;

    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(CatalogError::RatingOutOfRange {
            line: line_no,
            value,
        });
    }
    Ok(value)
}
