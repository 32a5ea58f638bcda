//! moviedb-library demo
//!
//! Wires an in-memory collections repository to a `LibraryState`, drives a
//! few feed updates through it and prints every state change.

use std::sync::Arc;

use {
    anyhow::{Context, Result},
    tokio::time::{Duration, timeout},
    tracing::info,
    tracing_subscriber::EnvFilter,
};

use moviedb_library::{
    CollectionError, CollectionResult,
    CollectionType::{Favourite, Watchlist},
    InMemoryCollectionsRepository, LibraryState, LibraryStateEvent, Movie,
    config::{get_config_path, load_settings},
};

/// How long to wait for further state changes before exiting.
const IDLE_TIMEOUT_MS: u64 = 250;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = get_config_path();
    let settings = load_settings(&config_path)
        .with_context(|| format!("Failed to load settings from {}", config_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let account_id = settings.demo_account_id;
    let repository = Arc::new(InMemoryCollectionsRepository::new());
    repository.set_collection(
        account_id,
        Favourite,
        vec![Movie::new(603, "The Matrix"), Movie::new(680, "Pulp Fiction")],
    );
    repository.set_collection(account_id, Watchlist, vec![Movie::new(27205, "Inception")]);

    let state = LibraryState::with_settings(repository.clone(), &settings)
        .context("Failed to create library state")?;
    let mut events = state.subscribe();

    info!(account_id, "Loading library collections");
    state.load_favourites(account_id);
    state.load_watchlist(account_id);
    state.force_refresh(account_id, Watchlist);
    repository.emit(
        account_id,
        Favourite,
        Err(CollectionError::timeout("fetch favourites")),
    );

    while let Ok(Ok(event)) =
        timeout(Duration::from_millis(IDLE_TIMEOUT_MS), events.recv()).await
    {
        match event {
            LibraryStateEvent::FavouritesChanged(result) => print_result("favourites", &result),
            LibraryStateEvent::WatchlistChanged(result) => print_result("watchlist", &result),
            LibraryStateEvent::MessagePosted => {
                if let Some(message) = state.take_message() {
                    println!("message: {message}");
                }
            }
        }
    }

    state.clear();
    Ok(())
}

fn print_result(name: &str, result: &CollectionResult<Movie>) {
    match result {
        CollectionResult::Loading => println!("{name}: loading"),
        CollectionResult::Success(movies) => {
            let titles: Vec<&str> = movies.iter().map(|movie| movie.title.as_str()).collect();
            println!("{name}: {}", titles.join(", "));
        }
        CollectionResult::Failure(kind) => println!("{name}: {}", kind.user_message()),
    }
}
