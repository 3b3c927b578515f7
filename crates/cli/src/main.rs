use anyhow::{Context, Result};
use catalog_store::{CatalogStore, GenrePreference, RankedEntry};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Width of the name column for movie rows
const MOVIE_COLUMN: usize = 40;
/// Width of the name column for genre rows
const GENRE_COLUMN: usize = 15;

/// movie-recs - Genre-based movie rankings and recommendations
#[derive(Parser)]
#[command(name = "movie-recs")]
#[command(about = "Rank movies and genres from a ratings catalog", long_about = None)]
struct Cli {
    /// Movies file (`genre|id|name` per line), loaded first
    #[arg(short, long, global = true)]
    movies: Option<PathBuf>,

    /// Ratings file (`movie|rating|user` per line), loaded after movies
    #[arg(short, long, global = true)]
    ratings: Option<PathBuf>,

    /// Print results as JSON instead of table rows
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Top N movies overall
    TopMovies {
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        n: i64,
    },

    /// Top N movies in a genre (exact, case-sensitive match)
    TopInGenre {
        #[arg(long)]
        genre: String,

        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        n: i64,
    },

    /// Top N genres by mean of per-movie averages
    TopGenres {
        #[arg(long, default_value = "10", allow_negative_numbers = true)]
        n: i64,
    },

    /// Show a user's preferred genre
    PreferredGenre {
        #[arg(long)]
        user: String,
    },

    /// Recommend unrated movies from a user's preferred genre
    Recommend {
        #[arg(long)]
        user: String,

        /// Number of recommendations to return
        #[arg(long, default_value = "3", allow_negative_numbers = true)]
        k: i64,
    },

    /// Show catalog counts
    Stats,

    /// Numbered menu that reads choices from stdin
    Interactive,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable with --json
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut store = CatalogStore::new();
    if let Some(path) = &cli.movies {
        load_movies(&mut store, path)?;
    }
    if let Some(path) = &cli.ratings {
        load_ratings(&mut store, path)?;
    }

    let json = cli.json;
    match cli.command {
        Commands::TopMovies { n } => {
            print_movie_rows(&store.top_movies(limit(n)), json)?;
        }
        Commands::TopInGenre { genre, n } => {
            print_movie_rows(&store.top_movies_in_genre(&genre, limit(n)), json)?;
        }
        Commands::TopGenres { n } => {
            print_genre_rows(&store.top_genres(limit(n)), json)?;
        }
        Commands::PreferredGenre { user } => {
            print_preference(store.user_preferred_genre(&user).as_ref(), json)?;
        }
        Commands::Recommend { user, k } => {
            print_movie_rows(&store.recommend_for_user(&user, limit(k)), json)?;
        }
        Commands::Stats => handle_stats(&store, json)?,
        Commands::Interactive => handle_interactive(&mut store, json)?,
    }

    Ok(())
}

/// Negative limits behave like zero
fn limit(n: i64) -> usize {
    usize::try_from(n).unwrap_or(0)
}

fn load_movies(store: &mut CatalogStore, path: &Path) -> Result<()> {
    store
        .load_movies(path)
        .with_context(|| format!("Failed to load movies from {}", path.display()))?;
    info!("Movies loaded from {}", path.display());
    Ok(())
}

fn load_ratings(store: &mut CatalogStore, path: &Path) -> Result<()> {
    store
        .load_ratings(path)
        .with_context(|| format!("Failed to load ratings from {}", path.display()))?;
    info!("Ratings loaded from {}", path.display());
    Ok(())
}

/// Handle the 'stats' command
fn handle_stats(store: &CatalogStore, json: bool) -> Result<()> {
    let (movies, ratings, users) = store.counts();
    let genres = store.genres();

    if json {
        let value = serde_json::json!({
            "movies": movies,
            "ratings": ratings,
            "users": users,
            "genres": genres,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Catalog:".bold().blue());
    println!("{}Movies: {}", "• ".green(), movies);
    println!("{}Ratings: {}", "• ".green(), ratings);
    println!("{}Users: {}", "• ".green(), users);
    println!("{}Genres: {}", "• ".green(), genres.join(", "));
    Ok(())
}

/// Handle the 'interactive' command
///
/// Mirrors the numbered menu: load errors and bad input are reported and
/// the loop continues; EOF or choice 8 quits.
fn handle_interactive(store: &mut CatalogStore, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    loop {
        println!();
        println!("{}", "Movie Recommender - Menu".bold().blue());
        println!("1) Load movies file");
        println!("2) Load ratings file");
        println!("3) Top N movies (overall)");
        println!("4) Top N movies in a genre");
        println!("5) Top N genres");
        println!("6) User's preferred genre");
        println!("7) Recommend movies for a user");
        println!("8) Quit");

        let Some(choice) = prompt(&mut input, "Choice: ")? else {
            return Ok(());
        };

        let outcome = match choice.as_str() {
            "1" => match prompt(&mut input, "Enter path to movies file: ")? {
                Some(path) => load_movies(store, Path::new(&path))
                    .map(|()| println!("Loaded {} movies.", store.counts().0)),
                None => return Ok(()),
            },
            "2" => match prompt(&mut input, "Enter path to ratings file: ")? {
                Some(path) => {
                    load_ratings(store, Path::new(&path)).map(|()| println!("Ratings loaded."))
                }
                None => return Ok(()),
            },
            "3" => match prompt_limit(&mut input, "N = ", 10)? {
                Some(n) => print_movie_rows(&store.top_movies(n), json),
                None => Ok(()),
            },
            "4" => {
                let Some(genre) = prompt(&mut input, "Genre = ")? else {
                    return Ok(());
                };
                match prompt_limit(&mut input, "N = ", 10)? {
                    Some(n) => print_movie_rows(&store.top_movies_in_genre(&genre, n), json),
                    None => Ok(()),
                }
            }
            "5" => match prompt_limit(&mut input, "N = ", 10)? {
                Some(n) => print_genre_rows(&store.top_genres(n), json),
                None => Ok(()),
            },
            "6" => match prompt(&mut input, "User ID = ")? {
                Some(user) => print_preference(store.user_preferred_genre(&user).as_ref(), json),
                None => return Ok(()),
            },
            "7" => {
                let Some(user) = prompt(&mut input, "User ID = ")? else {
                    return Ok(());
                };
                match prompt_limit(&mut input, "How many? ", 3)? {
                    Some(k) => print_movie_rows(&store.recommend_for_user(&user, k), json),
                    None => Ok(()),
                }
            }
            "8" => return Ok(()),
            _ => {
                println!("Invalid choice.");
                Ok(())
            }
        };

        if let Err(err) = outcome {
            println!("{} {:#}", "Error:".red(), err);
        }
    }
}

/// Print a prompt and read one trimmed line, `None` on EOF
fn prompt<B: BufRead>(input: &mut io::Lines<B>, label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    match input.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Read a limit, falling back to `default` on blank input.
///
/// Returns `None` (after telling the user) when the input is not a number.
fn prompt_limit<B: BufRead>(
    input: &mut io::Lines<B>,
    label: &str,
    default: usize,
) -> Result<Option<usize>> {
    let Some(raw) = prompt(input, label)? else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(Some(default));
    }
    match raw.parse::<i64>() {
        Ok(n) => Ok(Some(limit(n))),
        Err(_) => {
            println!("Invalid number: {raw}");
            Ok(None)
        }
    }
}

/// Pad or truncate a name to a fixed column width
fn column(name: &str, width: usize) -> String {
    let truncated: String = name.chars().take(width).collect();
    format!("{truncated:<width$}")
}

fn print_movie_rows(rows: &[RankedEntry], json: bool) -> Result<()> {
    print_rows(rows, MOVIE_COLUMN, json)
}

fn print_genre_rows(rows: &[RankedEntry], json: bool) -> Result<()> {
    print_rows(rows, GENRE_COLUMN, json)
}

fn print_rows(rows: &[RankedEntry], width: usize, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }
    for row in rows {
        println!("{} {:4.2} ({})", column(&row.name, width), row.average, row.count);
    }
    Ok(())
}

fn print_preference(pref: Option<&GenrePreference>, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&pref)?);
        return Ok(());
    }
    match pref {
        Some(p) => println!("{} ({:.2})", p.genre, p.average),
        None => println!("(no data)"),
    }
    Ok(())
}
