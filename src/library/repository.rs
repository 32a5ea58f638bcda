//! Contract for the collections repository.
//!
//! The repository owns fetching, caching and refreshing of account
//! collections. The library state only subscribes to its feeds and forwards
//! refresh requests.

use {async_channel::Receiver, async_trait::async_trait};

use crate::{
    error::domain::CollectionError,
    library::models::{CollectionResult, CollectionType, Movie},
};

/// A single item delivered on a collection feed.
pub type FeedItem = Result<CollectionResult<Movie>, CollectionError>;

/// A long-lived stream of collection updates.
///
/// The feed ends when the producer drops its sender. An `Err` item is
/// terminal for the consumer.
pub type CollectionFeed = Receiver<FeedItem>;

/// Source of account collections.
#[async_trait]
pub trait CollectionsRepository: Send + Sync {
    /// Opens a new feed for the given collection.
    ///
    /// Each call yields an independent subscription. Implementations must
    /// not block; items are produced asynchronously.
    ///
    /// # Arguments
    ///
    /// * `account_id` - Account owning the collection.
    /// * `collection` - Which collection to follow.
    fn collection_feed(&self, account_id: i64, collection: CollectionType) -> CollectionFeed;

    /// Re-fetches a collection, bypassing any cache.
    ///
    /// The refreshed contents are delivered through open feeds.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError` if the refresh could not be performed.
    async fn force_refresh_collection(
        &self,
        account_id: i64,
        collection: CollectionType,
    ) -> Result<(), CollectionError>;
}
