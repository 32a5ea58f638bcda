//! Observable state for the library screen.
//!
//! `LibraryState` follows the favourites and watchlist feeds of a
//! collections repository on background tasks, stores the latest result of
//! each, and turns feed failures into one-shot user messages.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use {
    parking_lot::RwLock,
    tokio::{
        runtime::Handle,
        sync::broadcast::{Receiver, Sender, channel},
    },
    tracing::{debug, warn},
};

use crate::{
    config::settings::StateSettings,
    error::{domain::LibraryStateError, operational::ErrorReporter},
    library::{
        models::{CollectionResult, CollectionType, Movie},
        repository::{CollectionFeed, CollectionsRepository},
    },
    state::subscriptions::Subscriptions,
};

/// Library state change events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryStateEvent {
    /// The favourites result changed.
    FavouritesChanged(CollectionResult<Movie>),
    /// The watchlist result changed.
    WatchlistChanged(CollectionResult<Movie>),
    /// A new message is waiting; read it with [`LibraryState::take_message`].
    MessagePosted,
}

#[derive(Debug, Default)]
struct Cells {
    favourites: Option<CollectionResult<Movie>>,
    watchlist: Option<CollectionResult<Movie>>,
    message: Option<String>,
    cleared: bool,
}

/// State shared with the background subscriptions.
#[derive(Debug)]
struct Shared {
    cells: RwLock<Cells>,
    state_tx: Sender<LibraryStateEvent>,
}

impl Shared {
    /// Stores a collection result and notifies subscribers.
    ///
    /// Returns `false` once the state has been cleared.
    fn apply(&self, collection: CollectionType, result: CollectionResult<Movie>) -> bool {
        let mut cells = self.cells.write();
        if cells.cleared {
            return false;
        }
        let event = match collection {
            CollectionType::Favourite => {
                cells.favourites = Some(result.clone());
                LibraryStateEvent::FavouritesChanged(result)
            }
            CollectionType::Watchlist => {
                cells.watchlist = Some(result.clone());
                LibraryStateEvent::WatchlistChanged(result)
            }
        };
        drop(cells);

        let _ = self.state_tx.send(event);
        true
    }

    /// Replaces the pending message and notifies subscribers.
    fn post_message(&self, message: &str) {
        let mut cells = self.cells.write();
        if cells.cleared {
            return;
        }
        cells.message = Some(message.to_string());
        drop(cells);

        let _ = self.state_tx.send(LibraryStateEvent::MessagePosted);
    }
}

/// Favourites, watchlist and message cells for one library screen.
///
/// Created alongside the owning screen and cleared when the screen goes
/// away, either explicitly through [`LibraryState::clear`] or on drop.
pub struct LibraryState {
    /// Cells and event channel shared with background tasks.
    shared: Arc<Shared>,
    /// Source of collection feeds.
    repository: Arc<dyn CollectionsRepository>,
    /// Runtime that background work is spawned on.
    runtime: Handle,
    /// Active feed and refresh tasks.
    subscriptions: Subscriptions,
}

impl Debug for LibraryState {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("LibraryState")
            .field("shared", &self.shared)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl LibraryState {
    /// Creates a library state on the current tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `repository` - Collections repository to subscribe to.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `LibraryState` or a `LibraryStateError`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryStateError::NoRuntime` outside a tokio runtime.
    pub fn new(repository: Arc<dyn CollectionsRepository>) -> Result<Self, LibraryStateError> {
        Self::with_settings(repository, &StateSettings::default())
    }

    /// Creates a library state on the current tokio runtime using `settings`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryStateError::NoRuntime` outside a tokio runtime.
    pub fn with_settings(
        repository: Arc<dyn CollectionsRepository>,
        settings: &StateSettings,
    ) -> Result<Self, LibraryStateError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(
            repository,
            runtime,
            settings.event_capacity,
        ))
    }

    /// Creates a library state that runs background work on `runtime`.
    ///
    /// # Arguments
    ///
    /// * `repository` - Collections repository to subscribe to.
    /// * `runtime` - Runtime for feed and refresh tasks.
    /// * `event_capacity` - Capacity of the change event channel.
    pub fn with_runtime(
        repository: Arc<dyn CollectionsRepository>,
        runtime: Handle,
        event_capacity: usize,
    ) -> Self {
        let (state_tx, _) = channel(event_capacity.max(1));

        Self {
            shared: Arc::new(Shared {
                cells: RwLock::new(Cells::default()),
                state_tx,
            }),
            repository,
            runtime,
            subscriptions: Subscriptions::new(),
        }
    }

    /// Starts following the favourites feed for an account.
    ///
    /// Every item the feed delivers overwrites the favourites cell. Earlier
    /// subscriptions stay active.
    pub fn load_favourites(&self, account_id: i64) {
        self.load(account_id, CollectionType::Favourite);
    }

    /// Starts following the watchlist feed for an account.
    ///
    /// Every item the feed delivers overwrites the watchlist cell. Earlier
    /// subscriptions stay active.
    pub fn load_watchlist(&self, account_id: i64) {
        self.load(account_id, CollectionType::Watchlist);
    }

    /// Asks the repository to re-fetch a collection.
    ///
    /// The refreshed contents arrive through the open feeds. Failures are
    /// logged only.
    pub fn force_refresh(&self, account_id: i64, collection: CollectionType) {
        if self.is_cleared() {
            warn!(account_id, ?collection, "Ignoring refresh on cleared library state");
            return;
        }

        let repository = Arc::clone(&self.repository);
        let handle = self.runtime.spawn(async move {
            match repository
                .force_refresh_collection(account_id, collection)
                .await
            {
                Ok(()) => debug!(account_id, ?collection, "Collection refreshed"),
                Err(e) => ErrorReporter::warn("force-refresh-collection", &e),
            }
        });
        self.subscriptions.add(handle);
    }

    fn load(&self, account_id: i64, collection: CollectionType) {
        if self.is_cleared() {
            warn!(account_id, ?collection, "Ignoring load on cleared library state");
            return;
        }

        let feed = self.repository.collection_feed(account_id, collection);
        let shared = Arc::clone(&self.shared);
        let handle = self.runtime.spawn(async move {
            Self::follow_feed(feed, shared, collection).await;
        });
        self.subscriptions.add(handle);
        debug!(account_id, ?collection, "Subscribed to collection feed");
    }

    /// Applies feed items in order until the feed closes, fails, or the
    /// state is cleared.
    async fn follow_feed(feed: CollectionFeed, shared: Arc<Shared>, collection: CollectionType) {
        let caller = match collection {
            CollectionType::Favourite => "get-favourite-movies",
            CollectionType::Watchlist => "get-watchlist-movies",
        };

        while let Ok(item) = feed.recv().await {
            match item {
                Ok(result) => {
                    if !shared.apply(collection, result) {
                        break;
                    }
                }
                Err(e) => {
                    let message = ErrorReporter::report(caller, &e);
                    shared.post_message(message);
                    break;
                }
            }
        }
        debug!(?collection, "Collection feed subscription ended");
    }

    /// Gets the latest favourites result, if any was delivered.
    pub fn favourites(&self) -> Option<CollectionResult<Movie>> {
        self.shared.cells.read().favourites.clone()
    }

    /// Gets the latest watchlist result, if any was delivered.
    pub fn watchlist(&self) -> Option<CollectionResult<Movie>> {
        self.shared.cells.read().watchlist.clone()
    }

    /// Takes the pending message, leaving the cell empty.
    ///
    /// A message is returned at most once.
    pub fn take_message(&self) -> Option<String> {
        self.shared.cells.write().message.take()
    }

    /// Subscribes to library state changes.
    pub fn subscribe(&self) -> Receiver<LibraryStateEvent> {
        self.shared.state_tx.subscribe()
    }

    /// Returns `true` once the state has been cleared.
    pub fn is_cleared(&self) -> bool {
        self.shared.cells.read().cleared
    }

    /// Returns the number of feed and refresh tasks still running.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.active()
    }

    /// Releases every subscription.
    ///
    /// No cell changes after this returns. Calling it again has no effect.
    pub fn clear(&self) {
        {
            let mut cells = self.shared.cells.write();
            if cells.cleared {
                return;
            }
            cells.cleared = true;
        }
        let released = self.subscriptions.dispose();
        debug!(released, "Library state cleared");
    }
}

impl Drop for LibraryState {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        library::{
            InMemoryCollectionsRepository,
            models::{CollectionResult, CollectionType::Favourite},
        },
        state::library_state::{LibraryState, LibraryStateEvent, Shared},
    };

    #[test]
    fn test_new_outside_runtime_fails() {
        let repository = Arc::new(InMemoryCollectionsRepository::new());
        assert!(LibraryState::new(repository).is_err());
    }

    #[tokio::test]
    async fn test_initial_state_is_empty() {
        let state = LibraryState::new(Arc::new(InMemoryCollectionsRepository::new())).unwrap();
        assert!(state.favourites().is_none());
        assert!(state.watchlist().is_none());
        assert!(state.take_message().is_none());
        assert!(!state.is_cleared());
        assert_eq!(state.active_subscriptions(), 0);
    }

    #[tokio::test]
    async fn test_zero_event_capacity_is_clamped() {
        let state = LibraryState::with_runtime(
            Arc::new(InMemoryCollectionsRepository::new()),
            tokio::runtime::Handle::current(),
            0,
        );
        let _receiver = state.subscribe();
    }

    #[tokio::test]
    async fn test_cleared_shared_rejects_writes() {
        let state = LibraryState::new(Arc::new(InMemoryCollectionsRepository::new())).unwrap();
        let shared: Arc<Shared> = Arc::clone(&state.shared);
        let mut events = state.subscribe();

        assert!(shared.apply(Favourite, CollectionResult::Loading));
        assert_eq!(
            events.try_recv().unwrap(),
            LibraryStateEvent::FavouritesChanged(CollectionResult::Loading)
        );

        state.clear();
        assert!(!shared.apply(Favourite, CollectionResult::Success(vec![])));
        shared.post_message("late");
        assert!(state.take_message().is_none());
        assert_eq!(state.favourites(), Some(CollectionResult::Loading));
    }
}
