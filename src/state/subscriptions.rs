//! Owned bag of background subscriptions.
//!
//! Every task spawned on behalf of the library state is registered here and
//! aborted together when the bag is disposed.

use {parking_lot::Mutex, tokio::task::JoinHandle, tracing::debug};

#[derive(Debug, Default)]
struct Inner {
    /// Handles of registered tasks.
    tasks: Vec<JoinHandle<()>>,
    /// Whether the bag has been disposed.
    disposed: bool,
}

/// Collection of task handles released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    inner: Mutex<Inner>,
}

impl Subscriptions {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a task.
    ///
    /// Finished tasks are pruned. A task added after disposal is aborted
    /// immediately.
    ///
    /// # Returns
    ///
    /// `true` if the task was kept, `false` if it was aborted.
    pub fn add(&self, handle: JoinHandle<()>) -> bool {
        let mut inner = self.inner.lock();
        if inner.disposed {
            handle.abort();
            return false;
        }
        inner.tasks.retain(|task| !task.is_finished());
        inner.tasks.push(handle);
        true
    }

    /// Returns the number of tasks still running.
    pub fn active(&self) -> usize {
        self.inner
            .lock()
            .tasks
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }

    /// Returns `true` once the bag has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.lock().disposed
    }

    /// Aborts every registered task.
    ///
    /// Safe to call more than once.
    ///
    /// # Returns
    ///
    /// The number of tasks aborted by this call.
    pub fn dispose(&self) -> usize {
        let mut inner = self.inner.lock();
        inner.disposed = true;
        let tasks = std::mem::take(&mut inner.tasks);
        drop(inner);

        let count = tasks.len();
        for task in tasks {
            task.abort();
        }
        if count > 0 {
            debug!("Disposed {} subscriptions", count);
        }
        count
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        self.dispose();
    }
}
