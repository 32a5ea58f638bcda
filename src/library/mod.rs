//! Movie collections and the repository that supplies them.
//!
//! This module defines the collection data models, the repository contract
//! consumed by the library state, and an in-memory repository.

pub mod memory;
pub mod models;
pub mod repository;

pub use memory::InMemoryCollectionsRepository;
pub use models::{CollectionResult, CollectionType, Movie};
pub use repository::{CollectionFeed, CollectionsRepository, FeedItem};
