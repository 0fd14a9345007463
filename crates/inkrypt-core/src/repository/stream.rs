//! Live decrypted views over a store collection.

use std::sync::Arc;

use tokio::task;

use crate::error::Result;
use crate::storage::ChangeFeed;

type Snapshot<T> = Arc<dyn Fn() -> Result<Vec<T>> + Send + Sync>;

/// A sequence of decrypted snapshots of one collection.
///
/// The first call to [`next`](Self::next) yields the current snapshot
/// immediately. Each later call waits for the store to report a change and
/// yields a fresh snapshot. Several writes between two calls are seen as one
/// emission reflecting all of them.
///
/// Snapshots are read and decrypted on tokio's blocking pool, never on the
/// task awaiting `next`.
pub struct DecryptedStream<T> {
    feed: ChangeFeed,
    snapshot: Snapshot<T>,
    started: bool,
}

impl<T: Send + 'static> DecryptedStream<T> {
    pub(crate) fn new<F>(feed: ChangeFeed, snapshot: F) -> Self
    where
        F: Fn() -> Result<Vec<T>> + Send + Sync + 'static,
    {
        Self {
            feed,
            snapshot: Arc::new(snapshot),
            started: false,
        }
    }

    /// Wait for the next emission.
    ///
    /// The stream keeps its store alive, so it keeps emitting for as long as
    /// it is held. `None` means the change feed closed or the runtime is
    /// shutting down and cancelled the snapshot.
    pub async fn next(&mut self) -> Option<Result<Vec<T>>> {
        if self.started {
            self.feed.changed().await.ok()?;
        } else {
            self.started = true;
            self.feed.borrow_and_update();
        }

        let snapshot = Arc::clone(&self.snapshot);
        match task::spawn_blocking(move || snapshot()).await {
            Ok(result) => Some(result),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => {
                tracing::debug!(error = %e, "Snapshot task cancelled");
                None
            }
        }
    }
}

impl<T> std::fmt::Debug for DecryptedStream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptedStream")
            .field("version", &*self.feed.borrow())
            .field("started", &self.started)
            .finish()
    }
}
