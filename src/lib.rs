//! moviedb-library - observable state for a movie library screen.
//!
//! Follows an account's favourites and watchlist collections through an
//! injected repository, keeps the latest result of each, and turns feed
//! failures into one-shot messages for the user.

pub mod config;
pub mod error;
pub mod library;
pub mod state;

// Re-export key types for convenience
pub use {
    config::{SettingsError, StateSettings},
    error::{CollectionError, ErrorReporter, FailureKind, LibraryStateError},
    library::{
        CollectionFeed, CollectionResult, CollectionType, CollectionsRepository,
        InMemoryCollectionsRepository, Movie,
    },
    state::{LibraryState, LibraryStateEvent},
};
