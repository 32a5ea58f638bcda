//! In-memory collections repository.
//!
//! Feeds are plain channels whose items are pushed by the owner of the
//! repository. Used by the demo binary and by tests.

use std::{
    collections::HashMap,
    io::{Error as IoError, ErrorKind::NotConnected},
};

use {
    anyhow::anyhow,
    async_channel::{Sender, unbounded},
    async_trait::async_trait,
    parking_lot::Mutex,
    tracing::debug,
};

use crate::{
    error::domain::{CollectionError, FailureKind},
    library::{
        models::{CollectionResult, CollectionType, Movie},
        repository::{CollectionFeed, CollectionsRepository, FeedItem},
    },
};

type CollectionKey = (i64, CollectionType);

/// Channel-backed repository driven by its owner.
#[derive(Debug, Default)]
pub struct InMemoryCollectionsRepository {
    /// Live feed senders per collection.
    feeds: Mutex<HashMap<CollectionKey, Vec<Sender<FeedItem>>>>,
    /// Stored collection contents.
    snapshots: Mutex<HashMap<CollectionKey, Vec<Movie>>>,
    /// Every refresh request received, in order.
    refreshes: Mutex<Vec<CollectionKey>>,
    /// Failure class returned by refreshes, if set.
    refresh_failure: Mutex<Option<FailureKind>>,
}

impl InMemoryCollectionsRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the contents of a collection.
    ///
    /// New feeds for the collection start with this snapshot, and refreshes
    /// re-deliver it. Open feeds are not notified.
    pub fn set_collection(&self, account_id: i64, collection: CollectionType, movies: Vec<Movie>) {
        self.snapshots
            .lock()
            .insert((account_id, collection), movies);
    }

    /// Pushes an item to every open feed for a collection.
    ///
    /// Closed feeds are pruned.
    ///
    /// # Returns
    ///
    /// The number of feeds the item was delivered to.
    pub fn emit(&self, account_id: i64, collection: CollectionType, item: FeedItem) -> usize {
        let mut feeds = self.feeds.lock();
        let Some(senders) = feeds.get_mut(&(account_id, collection)) else {
            return 0;
        };
        senders.retain(|sender| !sender.is_closed());

        // Errors can't be cloned, so only the last live feed receives the
        // original; the others get an equivalent error of the same class.
        let count = senders.len();
        let mut item = Some(item);
        let mut delivered = 0;
        for (index, sender) in senders.iter().enumerate() {
            let next = if index + 1 == count {
                item.take()
            } else {
                item.as_ref().map(duplicate_item)
            };
            if let Some(next) = next
                && sender.try_send(next).is_ok()
            {
                delivered += 1;
            }
        }
        debug!(
            account_id,
            ?collection,
            delivered,
            "Emitted item to collection feeds"
        );
        delivered
    }

    /// Makes every subsequent refresh fail with the given class.
    ///
    /// Pass `None` to let refreshes succeed again.
    pub fn fail_refreshes_with(&self, kind: Option<FailureKind>) {
        *self.refresh_failure.lock() = kind;
    }

    /// Returns the refresh requests received so far.
    pub fn refresh_requests(&self) -> Vec<(i64, CollectionType)> {
        self.refreshes.lock().clone()
    }

    /// Returns the number of open feeds for a collection.
    pub fn open_feeds(&self, account_id: i64, collection: CollectionType) -> usize {
        self.feeds
            .lock()
            .get(&(account_id, collection))
            .map_or(0, |senders| {
                senders.iter().filter(|sender| !sender.is_closed()).count()
            })
    }
}

#[async_trait]
impl CollectionsRepository for InMemoryCollectionsRepository {
    fn collection_feed(&self, account_id: i64, collection: CollectionType) -> CollectionFeed {
        let (sender, receiver) = unbounded();

        if let Some(movies) = self.snapshots.lock().get(&(account_id, collection)) {
            let _ = sender.try_send(Ok(CollectionResult::Success(movies.clone())));
        }

        self.feeds
            .lock()
            .entry((account_id, collection))
            .or_default()
            .push(sender);

        debug!(account_id, ?collection, "Opened collection feed");
        receiver
    }

    async fn force_refresh_collection(
        &self,
        account_id: i64,
        collection: CollectionType,
    ) -> Result<(), CollectionError> {
        self.refreshes.lock().push((account_id, collection));

        if let Some(kind) = *self.refresh_failure.lock() {
            return Err(error_for(kind));
        }

        let snapshot = self.snapshots.lock().get(&(account_id, collection)).cloned();
        if let Some(movies) = snapshot {
            self.emit(account_id, collection, Ok(CollectionResult::Loading));
            self.emit(account_id, collection, Ok(CollectionResult::Success(movies)));
        }
        Ok(())
    }
}

/// Builds a representative error for a failure class.
fn error_for(kind: FailureKind) -> CollectionError {
    match kind {
        FailureKind::Connectivity => IoError::new(NotConnected, "network unreachable").into(),
        FailureKind::Timeout => CollectionError::timeout("force refresh"),
        FailureKind::Other => anyhow!("refresh rejected").into(),
    }
}

fn duplicate_item(item: &FeedItem) -> FeedItem {
    match item {
        Ok(result) => Ok(result.clone()),
        Err(error) => Err(match error {
            CollectionError::Network(io) => IoError::new(io.kind(), io.to_string()).into(),
            CollectionError::Timeout { operation } => CollectionError::timeout(operation.clone()),
            other => match other.kind() {
                FailureKind::Other => anyhow!("{other}").into(),
                kind => error_for(kind),
            },
        }),
    }
}
