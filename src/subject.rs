//! Replay-latest value stream.
//!
//! DESIGN
//! ======
//! A `Subject` retains its current value and a list of observers. A new
//! observer receives the current value first, then every later value in
//! publish order. Each observer owns an unbounded queue, so a slow observer
//! never causes values to be dropped or coalesced. Closed observers are
//! pruned on the next publish.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc;

/// Shared handle to a replay-latest stream. Cloning shares the same stream.
#[derive(Clone)]
pub struct Subject<T> {
    inner: Arc<Mutex<SubjectInner<T>>>,
}

struct SubjectInner<T> {
    current: T,
    observers: Vec<mpsc::UnboundedSender<T>>,
}

impl<T: Clone> Subject<T> {
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self { inner: Arc::new(Mutex::new(SubjectInner { current: initial, observers: Vec::new() })) }
    }

    /// Replace the current value and push it to every live observer.
    pub fn next(&self, value: T) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.observers.retain(|tx| tx.send(value.clone()).is_ok());
        inner.current = value;
    }

    /// Clone of the current value.
    #[must_use]
    pub fn value(&self) -> T {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .current
            .clone()
    }

    /// Start observing. The current value is queued before anything else.
    #[must_use]
    pub fn subscribe(&self) -> Observer<T> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (tx, rx) = mpsc::unbounded_channel();
        // Receiver is alive, send cannot fail.
        let _ = tx.send(inner.current.clone());
        inner.observers.push(tx);
        Observer { rx }
    }

    /// Number of observers still attached.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn observer_count(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.observers.iter().filter(|tx| !tx.is_closed()).count()
    }
}

/// Receiving side of a [`Subject`]. Dropping it unsubscribes.
pub struct Observer<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Observer<T> {
    /// Wait for the next value. `None` once the subject is gone and drained.
    pub async fn recv(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Take the next queued value without waiting.
    pub fn try_recv(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Drain every queued value, oldest first.
    pub fn drain(&mut self) -> Vec<T> {
        let mut out = Vec::new();
        while let Ok(value) = self.rx.try_recv() {
            out.push(value);
        }
        out
    }
}

#[cfg(test)]
#[path = "subject_test.rs"]
mod tests;
