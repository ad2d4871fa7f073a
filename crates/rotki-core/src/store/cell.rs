use std::sync::Arc;

use tokio::sync::watch;

use crate::stream::CellStream;

/// A reactive value owned by a store.
///
/// Writes replace the whole value and wake every subscriber. Readers get
/// cheap `Arc` snapshots and never observe a partially written value.
pub struct StateCell<T> {
    tx: watch::Sender<Arc<T>>,
}

impl<T: Default + Send + Sync + 'static> StateCell<T> {
    pub fn new() -> Self {
        Self::with_value(T::default())
    }

    /// Restore the empty default.
    pub fn reset(&self) {
        self.set(T::default());
    }
}

impl<T: Send + Sync + 'static> StateCell<T> {
    pub fn with_value(value: T) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(value));
        Self { tx }
    }

    pub fn get(&self) -> Arc<T> {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(Arc::new(value));
    }

    pub fn subscribe(&self) -> CellStream<T> {
        CellStream::new(self.tx.subscribe())
    }
}

impl<T: Default + Send + Sync + 'static> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for StateCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StateCell").field(&*self.tx.borrow()).finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[test]
    fn reset_restores_default() {
        let cell: StateCell<Vec<u32>> = StateCell::new();
        cell.set(vec![1, 2]);
        assert_eq!(*cell.get(), vec![1, 2]);
        cell.reset();
        assert!(cell.get().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_writes() {
        let cell: StateCell<u32> = StateCell::new();
        let mut sub = cell.subscribe();
        assert_eq!(**sub.current(), 0);

        cell.set(7);
        assert_eq!(*sub.changed().await.unwrap(), 7);
        assert_eq!(**sub.current(), 7);
    }

    #[tokio::test]
    async fn stream_yields_current_then_updates() {
        let cell: StateCell<u32> = StateCell::with_value(1);
        let mut stream = cell.subscribe().into_stream();
        assert_eq!(*stream.next().await.unwrap(), 1);
        cell.set(2);
        assert_eq!(*stream.next().await.unwrap(), 2);
    }
}
