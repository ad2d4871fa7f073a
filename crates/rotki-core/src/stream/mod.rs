// ── Reactive cell streams ──
//
// Subscription types for consuming state changes from the stores.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// Read side of a [`StateCell`](crate::StateCell) or status map.
///
/// Holds the value seen at subscription time; `changed()` waits for the
/// next write and `into_stream()` turns the subscription into a `Stream`.
pub struct CellStream<T: Send + Sync + 'static> {
    current: Arc<T>,
    receiver: watch::Receiver<Arc<T>>,
}

impl<T: Send + Sync + 'static> CellStream<T> {
    pub(crate) fn new(receiver: watch::Receiver<Arc<T>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// Value as of subscribing or the last `changed()`.
    pub fn current(&self) -> &Arc<T> {
        &self.current
    }

    /// Value the cell holds right now.
    pub fn latest(&self) -> Arc<T> {
        self.receiver.borrow().clone()
    }

    /// Next written value, or `None` once the owning store is gone.
    pub async fn changed(&mut self) -> Option<Arc<T>> {
        self.receiver.changed().await.ok()?;
        let value = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&value);
        Some(value)
    }

    pub fn into_stream(self) -> CellWatchStream<T> {
        CellWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// Yields the current snapshot first, then one item per write to the cell.
pub struct CellWatchStream<T: Send + Sync + 'static> {
    inner: WatchStream<Arc<T>>,
}

impl<T: Send + Sync + 'static> Stream for CellWatchStream<T> {
    type Item = Arc<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        // Arc<T> is always Unpin.
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
