//! Observable library state with background feed subscriptions.
//!
//! This module provides the state behind the library screen and the
//! subscription bag that releases its background work.


pub mod library_state;
pub mod subscriptions;

pub use {
    library_state::{LibraryState, LibraryStateEvent},
    subscriptions::Subscriptions,
};
