//! Cancellable "latest request wins" fetch helper.
//!
//! [`LatestFetch`] runs each request in its own task. Issuing a new request aborts
//! the one still in flight, and a superseded request never writes to the state,
//! even if its response was already on the way. Aborting is not an error.

use crate::domain::error::Result;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::AbortHandle;

/// Observable state of a [`LatestFetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Fetch slot where only the most recently issued request may land.
#[derive(Debug)]
pub struct LatestFetch<T> {
    state: Arc<Mutex<FetchState<T>>>,
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl<T> Default for LatestFetch<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(FetchState::default())),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(None),
        }
    }
}

impl<T: Clone + Send + 'static> LatestFetch<T> {
    /// Creates an idle slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> FetchState<T> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Runs `request`, aborting whatever request this slot still has in flight.
    ///
    /// Resolves once this request has landed or been superseded. Returns `true`
    /// when its outcome (success or failure) was written to the state.
    pub async fn fetch<F>(&self, request: F) -> bool
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.loading = true;
            state.error = None;
        }

        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);
        let handle = tokio::spawn(async move {
            let result = request.await;

            let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
            if latest.load(Ordering::SeqCst) != generation {
                tracing::trace!(generation, "discarding superseded response");
                return false;
            }

            state.loading = false;
            match result {
                Ok(data) => state.data = Some(data),
                Err(e) => state.error = Some(e.to_string()),
            }
            true
        });

        let previous = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle.abort_handle());
        if let Some(previous) = previous {
            previous.abort();
        }

        match handle.await {
            Ok(landed) => landed,
            Err(e) if e.is_cancelled() => {
                tracing::debug!(generation, "fetch aborted by a newer request");
                false
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "fetch task failed");
                false
            }
        }
    }

    /// Aborts the request in flight, if any, leaving the last landed data in place.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        self.state.lock().unwrap_or_else(PoisonError::into_inner).loading = false;
    }

    /// Aborts the request in flight and forgets the last landed data and error.
    pub fn reset(&self) {
        self.cancel();
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = FetchState::default();
    }
}

impl<T> Drop for LatestFetch<T> {
    fn drop(&mut self) {
        if let Some(handle) = self
            .in_flight
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InventoryError;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn newer_request_supersedes_older_one() {
        let fetcher = Arc::new(LatestFetch::<u32>::new());

        let slow = {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move {
                fetcher
                    .fetch(async {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        Ok(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(fetcher.snapshot().loading);

        let landed = fetcher.fetch(async { Ok(2) }).await;
        assert!(landed);
        assert!(!slow.await.unwrap());

        tokio::time::sleep(Duration::from_secs(10)).await;
        let state = fetcher.snapshot();
        assert_eq!(state.data, Some(2));
        assert!(!state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn failure_is_recorded_and_keeps_previous_data() {
        let fetcher = LatestFetch::<u32>::new();
        assert!(fetcher.fetch(async { Ok(7) }).await);
        assert!(
            fetcher
                .fetch(async { Err(InventoryError::Transport("offline".into())) })
                .await
        );

        let state = fetcher.snapshot();
        assert_eq!(state.data, Some(7));
        assert_eq!(state.error.as_deref(), Some("offline"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_late_write() {
        let fetcher = Arc::new(LatestFetch::<u32>::new());
        let pending = {
            let fetcher = Arc::clone(&fetcher);
            tokio::spawn(async move {
                fetcher
                    .fetch(async {
                        tokio::time::sleep(Duration::from_secs(1)).await;
                        Ok(3)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(1)).await;

        fetcher.cancel();
        assert!(!pending.await.unwrap());
        assert_eq!(fetcher.snapshot(), FetchState::default());
    }

    #[tokio::test]
    async fn reset_forgets_landed_data() {
        let fetcher = LatestFetch::<u32>::new();
        assert!(fetcher.fetch(async { Ok(9) }).await);

        fetcher.cancel();
        assert_eq!(fetcher.snapshot().data, Some(9));

        fetcher.reset();
        assert_eq!(fetcher.snapshot(), FetchState::default());
    }
}
