//! Benchmarks for the ranking queries
//!
//! Run with: cargo bench --package catalog-store
//!
//! Builds a synthetic catalog in memory so no data files are needed.

use catalog_store::CatalogStore;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const GENRES: [&str; 6] = ["Action", "Comedy", "Drama", "Horror", "Romance", "Sci-Fi"];

fn build_store(movies: usize, users: usize) -> CatalogStore {
    let mut movie_lines = String::new();
    for i in 0..movies {
        movie_lines.push_str(&format!("{}|m{i}|Movie {i}\n", GENRES[i % GENRES.len()]));
    }

    let mut rating_lines = String::new();
    for u in 0..users {
        // Each user rates every seventh movie, offset by user
        for m in (u % 7..movies).step_by(7) {
            let value = ((u + m) % 11) as f64 / 2.0;
            rating_lines.push_str(&format!("Movie {m}|{value}|u{u}\n"));
        }
    }

    let mut store = CatalogStore::new();
    store
        .load_movies_from_reader(movie_lines.as_bytes())
        .expect("Failed to load synthetic movies");
    store
        .load_ratings_from_reader(rating_lines.as_bytes())
        .expect("Failed to load synthetic ratings");
    store
}

fn bench_top_movies(c: &mut Criterion) {
    let store = build_store(2_000, 500);

    c.bench_function("top_movies", |b| {
        b.iter(|| black_box(store.top_movies(black_box(20))))
    });
}

fn bench_top_genres(c: &mut Criterion) {
    let store = build_store(2_000, 500);

    c.bench_function("top_genres", |b| {
        b.iter(|| black_box(store.top_genres(black_box(5))))
    });
}

fn bench_recommend(c: &mut Criterion) {
    let store = build_store(2_000, 500);

    c.bench_function("recommend_for_user", |b| {
        b.iter(|| black_box(store.recommend_for_user(black_box("u1"), black_box(10))))
    });
}

criterion_group!(benches, bench_top_movies, bench_top_genres, bench_recommend);
criterion_main!(benches);
