// ── Reactive snapshot streams ──
//
// Subscription handle over a `watch` channel that carries whole snapshots.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A subscription to a published snapshot.
///
/// Offers the snapshot seen at creation, the latest one, and change
/// notification through [`changed`](Self::changed) or a `Stream`.
pub struct SnapshotStream<T: Send + Sync + 'static> {
    current: Arc<T>,
    receiver: watch::Receiver<Arc<T>>,
}

impl<T: Send + Sync + 'static> SnapshotStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Snapshot captured at creation time or at the last `changed()`.
    pub fn current(&self) -> &Arc<T> {
        &self.current
    }

    pub fn latest(&self) -> Arc<T> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next publication. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    pub fn into_stream(self) -> SnapshotWatchStream<T> {
        SnapshotWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter yielding each published snapshot.
pub struct SnapshotWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Arc<T>>,
}

impl<T: Send + Sync + 'static> Stream for SnapshotWatchStream<T> {
    type Item = Arc<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Arc<T> is Unpin, so WatchStream<Arc<T>> is too.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
